//! # gridbook-formula
//!
//! Formula parser and evaluator for gridbook.
//!
//! This crate provides:
//! - Formula parsing (text → function call or arithmetic AST)
//! - Formula evaluation against a [`Sheet`](gridbook_core::Sheet)
//! - The built-in function library (SUM, AVERAGE, COUNT, MAX, MIN, TRIM, UPPER,
//!   LOWER, REMOVE_DUPLICATES, FIND_AND_REPLACE)
//!
//! ## Example
//!
//! ```rust
//! use gridbook_core::{CellAddress, Sheet, SheetId};
//! use gridbook_formula::{display_value, EvaluationOptions};
//!
//! let mut sheet = Sheet::new(SheetId(1), "Sheet1");
//! sheet.commit_at("A1", "2").unwrap();
//! sheet.commit_at("A2", "4").unwrap();
//! sheet.commit_at("A3", "=AVERAGE(A1:A2)").unwrap();
//!
//! let addr = CellAddress::parse("A3").unwrap();
//! assert_eq!(display_value(&sheet, &addr, &EvaluationOptions::default()), "3.00");
//! ```

pub mod ast;
pub mod error;
pub mod evaluator;
pub mod functions;
pub mod parser;

pub use ast::{BinaryOperator, Formula, FormulaExpr, FunctionCall};
pub use error::{ErrorToken, FormulaError, FormulaResult};
pub use evaluator::{
    display_value, evaluate, evaluate_raw, format_number, EvaluationContext, EvaluationOptions,
    FormulaValue,
};
pub use functions::builtin_function_names;
pub use parser::parse_formula;
