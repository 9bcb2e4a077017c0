//! Session configuration

use gridbook_formula::EvaluationOptions;
use serde::Deserialize;

use crate::error::Result;

/// Options for a new [`Session`](crate::Session)
///
/// Missing fields take their defaults when loaded from JSON:
///
/// ```rust
/// use gridbook::SessionOptions;
///
/// let options = SessionOptions::from_json(r#"{ "maxUndoDepth": 50 }"#).unwrap();
/// assert_eq!(options.max_undo_depth, Some(50));
/// assert_eq!(options.initial_sheets, 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionOptions {
    /// Number of sheets a new session starts with (at least 1)
    pub initial_sheets: usize,
    /// Maximum undo entries kept (None = unlimited)
    pub max_undo_depth: Option<usize>,
    /// Formula evaluation settings
    pub evaluation: EvaluationOptions,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            initial_sheets: 1,
            max_undo_depth: None,
            evaluation: EvaluationOptions::default(),
        }
    }
}

impl SessionOptions {
    /// Parse options from JSON text
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
