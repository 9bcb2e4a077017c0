//! Formula evaluator
//!
//! Turns raw cell content into a display value. Evaluation only reads the sheet;
//! derived values are never stored.

use crate::ast::{Formula, FormulaExpr, FunctionCall};
use crate::error::{ErrorToken, FormulaError, FormulaResult};
use crate::functions::{FunctionArgs, FunctionRegistry};
use crate::parser::parse_formula;
use gridbook_core::{CellAddress, CellRange, Sheet};
use serde::Deserialize;
use std::fmt;
use std::sync::OnceLock;

/// Global function registry (lazily initialized)
static FUNCTION_REGISTRY: OnceLock<FunctionRegistry> = OnceLock::new();

pub(crate) fn get_function_registry() -> &'static FunctionRegistry {
    FUNCTION_REGISTRY.get_or_init(FunctionRegistry::new)
}

/// Value types during formula evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaValue {
    /// Absent cell
    Empty,
    Number(f64),
    /// Plain cell content, or a function's text result
    Text(String),
    Error(ErrorToken),
}

impl FormulaValue {
    /// Numeric coercion
    ///
    /// Text is numeric iff its trimmed form parses as a finite number. Empty text,
    /// non-numeric text and errors are not numeric.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FormulaValue::Number(n) if n.is_finite() => Some(*n),
            FormulaValue::Text(s) => parse_number(s),
            _ => None,
        }
    }

    /// Force conversion to number for arithmetic
    pub fn to_number(&self) -> FormulaResult<f64> {
        self.as_number().ok_or_else(|| {
            FormulaError::Evaluation(format!("Cannot convert {:?} to number", self))
        })
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, FormulaValue::Empty)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FormulaValue::Error(_))
    }

    /// Text shown in the cell
    pub fn to_display_string(&self) -> String {
        match self {
            FormulaValue::Empty => String::new(),
            FormulaValue::Number(n) => format_number(*n),
            FormulaValue::Text(s) => s.clone(),
            FormulaValue::Error(token) => token.as_str().to_string(),
        }
    }
}

impl fmt::Display for FormulaValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_display_string())
    }
}

impl From<ErrorToken> for FormulaValue {
    fn from(token: ErrorToken) -> Self {
        FormulaValue::Error(token)
    }
}

fn parse_number(text: &str) -> Option<f64> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Render a number the way a spreadsheet shows it
///
/// Integral values print without a fractional part; everything else uses the
/// shortest form that reads back to the same value.
pub fn format_number(n: f64) -> String {
    if n == 0.0 {
        // Also covers -0.0
        "0".to_string()
    } else if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// Options that shape evaluation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EvaluationOptions {
    /// How many levels of formula-to-formula references are followed
    ///
    /// At the limit a referenced formula cell reads as its raw text, which is not
    /// numeric. This also bounds reference cycles.
    pub max_reference_depth: usize,
    /// Largest range a function may read; bigger ranges are an error
    pub max_range_cells: u64,
}

impl Default for EvaluationOptions {
    fn default() -> Self {
        Self {
            max_reference_depth: 1,
            max_range_cells: 1_000_000,
        }
    }
}

/// Context for formula evaluation
#[derive(Debug, Clone, Copy)]
pub struct EvaluationContext<'a> {
    /// Sheet that references resolve against
    pub sheet: &'a Sheet,
    pub options: &'a EvaluationOptions,
    /// Number of formula references followed to get here
    pub depth: usize,
}

impl<'a> EvaluationContext<'a> {
    /// Create a top-level evaluation context
    pub fn new(sheet: &'a Sheet, options: &'a EvaluationOptions) -> Self {
        Self {
            sheet,
            options,
            depth: 0,
        }
    }

    /// Context for evaluating a referenced formula cell
    pub fn nested(&self) -> Self {
        Self {
            depth: self.depth + 1,
            ..*self
        }
    }

    /// Resolve a single cell
    ///
    /// - absent -> [`FormulaValue::Empty`]
    /// - plain content -> the raw text
    /// - formula content -> evaluated below the depth limit, raw text at it
    pub fn resolve_cell(&self, addr: &CellAddress) -> FormulaValue {
        match self.sheet.read(addr) {
            None => FormulaValue::Empty,
            Some(raw) if raw.starts_with('=') && self.depth < self.options.max_reference_depth => {
                evaluate_raw(raw, &self.nested())
            }
            Some(raw) => FormulaValue::Text(raw.to_string()),
        }
    }

    /// Resolve every cell of a range in row-major order
    pub fn resolve_range(&self, range: &CellRange) -> Vec<FormulaValue> {
        range.cells().map(|addr| self.resolve_cell(&addr)).collect()
    }
}

/// Evaluate a parsed formula
pub fn evaluate(formula: &Formula, ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    match formula {
        Formula::Call(call) => evaluate_function(call, ctx),
        Formula::Arithmetic(expr) => evaluate_expr(expr, ctx).map(FormulaValue::Number),
    }
}

/// Evaluate raw cell content
///
/// Content that does not start with `=` is returned unchanged as text. Any parse or
/// evaluation failure becomes the matching error value.
pub fn evaluate_raw(raw: &str, ctx: &EvaluationContext) -> FormulaValue {
    if !raw.starts_with('=') {
        return FormulaValue::Text(raw.to_string());
    }

    match parse_formula(raw).and_then(|formula| evaluate(&formula, ctx)) {
        Ok(value) => value,
        Err(err) => {
            log::debug!("formula {:?} failed: {}", raw, err);
            FormulaValue::Error(err.token())
        }
    }
}

/// Display value of one cell
///
/// An absent cell displays as the empty string.
pub fn display_value(sheet: &Sheet, addr: &CellAddress, options: &EvaluationOptions) -> String {
    match sheet.read(addr) {
        None => String::new(),
        Some(raw) => evaluate_raw(raw, &EvaluationContext::new(sheet, options)).to_display_string(),
    }
}

/// Evaluate an arithmetic expression
///
/// References are replaced by their resolved value, which must be numeric. An
/// empty referenced cell is not numeric, so `=A1+1` fails while A1 is empty. Any
/// non-finite intermediate result (division by zero, overflow) is an error.
pub fn evaluate_expr(expr: &FormulaExpr, ctx: &EvaluationContext) -> FormulaResult<f64> {
    let value = match expr {
        FormulaExpr::Number(n) => *n,
        FormulaExpr::Reference(addr) => ctx.resolve_cell(addr).to_number().map_err(|_| {
            FormulaError::Evaluation(format!("{} does not hold a number", addr))
        })?,
        FormulaExpr::Negate(operand) => -evaluate_expr(operand, ctx)?,
        FormulaExpr::BinaryOp { op, left, right } => {
            let left = evaluate_expr(left, ctx)?;
            let right = evaluate_expr(right, ctx)?;
            op.apply(left, right)
        }
    };

    if value.is_finite() {
        Ok(value)
    } else {
        Err(FormulaError::Evaluation(format!(
            "Non-finite result {}",
            value
        )))
    }
}

/// Evaluate a function call
fn evaluate_function(call: &FunctionCall, ctx: &EvaluationContext) -> FormulaResult<FormulaValue> {
    let registry = get_function_registry();
    let name = call.name.as_str();

    let func = registry
        .get(name)
        .ok_or_else(|| FormulaError::UnknownFunction(name.to_string()))?;

    // Check argument count
    let argc = call.args.len();
    if argc < func.min_args {
        return Err(FormulaError::ArgumentCount {
            function: name.to_string(),
            expected: format!("at least {}", func.min_args),
            actual: argc,
        });
    }

    if let Some(max) = func.max_args {
        if argc > max {
            return Err(FormulaError::ArgumentCount {
                function: name.to_string(),
                expected: format!("at most {}", max),
                actual: argc,
            });
        }
    }

    // The first argument is always a range
    let range = CellRange::parse(&call.args[0])?;
    if range.cell_count() > ctx.options.max_range_cells {
        return Err(FormulaError::Argument(format!(
            "{} covers {} cells (limit {})",
            range,
            range.cell_count(),
            ctx.options.max_range_cells
        )));
    }
    if func.single_cell && range.cell_count() != 1 {
        return Err(FormulaError::Argument(format!(
            "{} expects a single cell, got {}",
            name, range
        )));
    }

    log::trace!("dispatch {}({})", name, call.args.join(", "));

    let args = FunctionArgs {
        values: ctx.resolve_range(&range),
        literals: &call.args[1..],
    };

    // Call the function
    (func.implementation)(&args)
}
