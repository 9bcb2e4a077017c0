//! Text functions

use super::FunctionArgs;
use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::FormulaValue;
use ahash::AHashSet;
use regex::Regex;

/// Separator used when a function joins several cells into one text
const JOIN_SEPARATOR: &str = ", ";

/// Apply `f` to a single text cell, passing anything else through unchanged
fn map_single_text(args: &FunctionArgs, f: impl Fn(&str) -> String) -> FormulaResult<FormulaValue> {
    match args.values.as_slice() {
        [FormulaValue::Text(s)] => Ok(FormulaValue::Text(f(s))),
        [other] => Ok(other.clone()),
        values => Err(FormulaError::Argument(format!(
            "expected a single cell, got {} values",
            values.len()
        ))),
    }
}

/// TRIM(cell)
pub fn fn_trim(args: &FunctionArgs) -> FormulaResult<FormulaValue> {
    map_single_text(args, |s| s.trim().to_string())
}

/// UPPER(cell)
pub fn fn_upper(args: &FunctionArgs) -> FormulaResult<FormulaValue> {
    map_single_text(args, str::to_uppercase)
}

/// LOWER(cell)
pub fn fn_lower(args: &FunctionArgs) -> FormulaResult<FormulaValue> {
    map_single_text(args, str::to_lowercase)
}

/// REMOVE_DUPLICATES(range)
///
/// Keeps the first occurrence of each distinct value. Empty cells count as the
/// empty string. A computed number and text that reads the same are distinct.
pub fn fn_remove_duplicates(args: &FunctionArgs) -> FormulaResult<FormulaValue> {
    let mut seen = AHashSet::new();
    let unique: Vec<String> = args
        .values
        .iter()
        .filter(|value| {
            let is_number = matches!(value, FormulaValue::Number(_));
            seen.insert((is_number, value.to_display_string()))
        })
        .map(FormulaValue::to_display_string)
        .collect();

    Ok(FormulaValue::Text(unique.join(JOIN_SEPARATOR)))
}

/// FIND_AND_REPLACE(range, pattern, replacement)
///
/// `pattern` is a regular expression replaced globally in every text cell; numbers
/// are kept as they are.
pub fn fn_find_and_replace(args: &FunctionArgs) -> FormulaResult<FormulaValue> {
    let pattern = args.literal(0);
    let replacement = args.literal(1);
    let regex = Regex::new(pattern)
        .map_err(|e| FormulaError::Evaluation(format!("Invalid pattern '{}': {}", pattern, e)))?;

    let replaced: Vec<String> = args
        .values
        .iter()
        .map(|value| match value {
            FormulaValue::Number(_) => value.to_display_string(),
            other => regex
                .replace_all(&other.to_display_string(), replacement)
                .into_owned(),
        })
        .collect();

    Ok(FormulaValue::Text(replaced.join(JOIN_SEPARATOR)))
}
