//! Formula syntax tree types

use gridbook_core::CellAddress;

/// A parsed formula (the text after `=`)
#[derive(Debug, Clone, PartialEq)]
pub enum Formula {
    /// `NAME(arg, arg, ...)` dispatched to the function registry
    Call(FunctionCall),
    /// Anything else, read as an arithmetic expression
    Arithmetic(FormulaExpr),
}

/// A function call with its raw, trimmed argument strings
///
/// Arguments are split on commas only; there is no nesting.
#[derive(Debug, Clone, PartialEq)]
pub struct FunctionCall {
    pub name: String,
    pub args: Vec<String>,
}

/// Arithmetic expression AST
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaExpr {
    /// Numeric literal
    Number(f64),
    /// Cell reference, replaced by the cell's value before evaluation
    Reference(CellAddress),
    /// Unary minus
    Negate(Box<FormulaExpr>),
    /// Binary operation
    BinaryOp {
        op: BinaryOperator,
        left: Box<FormulaExpr>,
        right: Box<FormulaExpr>,
    },
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl BinaryOperator {
    pub fn apply(self, left: f64, right: f64) -> f64 {
        match self {
            BinaryOperator::Add => left + right,
            BinaryOperator::Subtract => left - right,
            BinaryOperator::Multiply => left * right,
            BinaryOperator::Divide => left / right,
        }
    }
}

impl FormulaExpr {
    /// Cell references in evaluation order
    pub fn references(&self) -> Vec<CellAddress> {
        let mut refs = Vec::new();
        self.collect_references(&mut refs);
        refs
    }

    fn collect_references(&self, refs: &mut Vec<CellAddress>) {
        match self {
            FormulaExpr::Number(_) => {}
            FormulaExpr::Reference(addr) => refs.push(*addr),
            FormulaExpr::Negate(operand) => operand.collect_references(refs),
            FormulaExpr::BinaryOp { left, right, .. } => {
                left.collect_references(refs);
                right.collect_references(refs);
            }
        }
    }
}
