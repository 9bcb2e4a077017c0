//! Aggregate functions over a range
//!
//! SUM treats non-numeric cells as zero. AVERAGE, COUNT, MAX and MIN skip them.

use super::FunctionArgs;
use crate::error::{FormulaError, FormulaResult};
use crate::evaluator::FormulaValue;

/// SUM function
pub fn fn_sum(args: &FunctionArgs) -> FormulaResult<FormulaValue> {
    let sum: f64 = args
        .values
        .iter()
        .map(|value| value.as_number().unwrap_or(0.0))
        .sum();
    Ok(FormulaValue::Number(sum))
}

/// AVERAGE function
///
/// Rounded to two decimals and rendered with exactly two (`3.00`).
pub fn fn_average(args: &FunctionArgs) -> FormulaResult<FormulaValue> {
    let mut sum = 0.0;
    let mut count = 0;

    for n in args.numbers() {
        sum += n;
        count += 1;
    }

    if count == 0 {
        return Err(FormulaError::DivisionByZero);
    }

    // + 0.0 folds -0.0 into 0.0
    let rounded = (sum / count as f64 * 100.0).round() / 100.0 + 0.0;
    Ok(FormulaValue::Text(format!("{:.2}", rounded)))
}

/// COUNT function
pub fn fn_count(args: &FunctionArgs) -> FormulaResult<FormulaValue> {
    Ok(FormulaValue::Number(args.numbers().count() as f64))
}

/// MAX function
pub fn fn_max(args: &FunctionArgs) -> FormulaResult<FormulaValue> {
    args.numbers()
        .reduce(f64::max)
        .map(FormulaValue::Number)
        .ok_or_else(|| FormulaError::Evaluation("MAX of a range with no numbers".into()))
}

/// MIN function
pub fn fn_min(args: &FunctionArgs) -> FormulaResult<FormulaValue> {
    args.numbers()
        .reduce(f64::min)
        .map(FormulaValue::Number)
        .ok_or_else(|| FormulaError::Evaluation("MIN of a range with no numbers".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorToken;
    use pretty_assertions::assert_eq;

    fn args(values: Vec<FormulaValue>) -> FunctionArgs<'static> {
        FunctionArgs {
            values,
            literals: &[],
        }
    }

    fn text(s: &str) -> FormulaValue {
        FormulaValue::Text(s.to_string())
    }

    fn mixed() -> FunctionArgs<'static> {
        args(vec![
            text("4"),
            FormulaValue::Empty,
            text("abc"),
            FormulaValue::Number(-1.5),
            FormulaValue::Error(ErrorToken::Div0),
            text(" 10 "),
        ])
    }

    #[test]
    fn test_sum() {
        assert_eq!(fn_sum(&mixed()).unwrap(), FormulaValue::Number(12.5));
        assert_eq!(fn_sum(&args(vec![])).unwrap(), FormulaValue::Number(0.0));
    }

    #[test]
    fn test_average() {
        assert_eq!(fn_average(&mixed()).unwrap(), text("4.17"));
        assert_eq!(
            fn_average(&args(vec![text("1"), text("2")])).unwrap(),
            text("1.50")
        );
        assert_eq!(
            fn_average(&args(vec![text("-0.001")])).unwrap(),
            text("0.00")
        );
        assert_eq!(
            fn_average(&args(vec![text("x"), FormulaValue::Empty])).unwrap_err(),
            FormulaError::DivisionByZero
        );
    }

    #[test]
    fn test_count() {
        assert_eq!(fn_count(&mixed()).unwrap(), FormulaValue::Number(3.0));
        assert_eq!(fn_count(&args(vec![])).unwrap(), FormulaValue::Number(0.0));
    }

    #[test]
    fn test_max_min() {
        assert_eq!(fn_max(&mixed()).unwrap(), FormulaValue::Number(10.0));
        assert_eq!(fn_min(&mixed()).unwrap(), FormulaValue::Number(-1.5));
        assert!(fn_max(&args(vec![text("a")])).is_err());
        assert!(fn_min(&args(vec![FormulaValue::Empty])).is_err());
    }
}
