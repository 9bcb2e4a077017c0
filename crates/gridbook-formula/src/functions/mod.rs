//! Built-in functions

pub mod math;
pub mod text;

use crate::error::FormulaResult;
use crate::evaluator::FormulaValue;
use ahash::AHashMap;

/// Arguments handed to a function implementation
#[derive(Debug)]
pub struct FunctionArgs<'a> {
    /// Resolved values of the first argument's range, row-major, not coerced
    pub values: Vec<FormulaValue>,
    /// Remaining arguments as trimmed literal text
    pub literals: &'a [String],
}

impl FunctionArgs<'_> {
    /// Literal argument by position (0 is the argument after the range)
    pub fn literal(&self, index: usize) -> &str {
        self.literals.get(index).map(String::as_str).unwrap_or("")
    }

    /// Values that coerce to numbers, in order
    pub fn numbers(&self) -> impl Iterator<Item = f64> + '_ {
        self.values.iter().filter_map(FormulaValue::as_number)
    }
}

/// Function implementation signature
pub type FunctionImpl = fn(&FunctionArgs) -> FormulaResult<FormulaValue>;

/// Function definition
pub struct FunctionDef {
    /// Function name (uppercase)
    pub name: &'static str,
    /// Minimum arguments
    pub min_args: usize,
    /// Maximum arguments (None = unlimited)
    pub max_args: Option<usize>,
    /// The range argument must name exactly one cell
    pub single_cell: bool,
    /// Implementation
    pub implementation: FunctionImpl,
}

/// Function registry
pub struct FunctionRegistry {
    functions: AHashMap<&'static str, FunctionDef>,
}

impl FunctionRegistry {
    /// Create a new registry with all built-in functions
    pub fn new() -> Self {
        let mut registry = Self {
            functions: AHashMap::new(),
        };

        registry.register_math_functions();
        registry.register_text_functions();

        registry
    }

    /// Look up a function by its exact name
    pub fn get(&self, name: &str) -> Option<&FunctionDef> {
        self.functions.get(name)
    }

    /// Register a function
    pub fn register(&mut self, def: FunctionDef) {
        self.functions.insert(def.name, def);
    }

    /// Names of all registered functions, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.functions.keys().copied().collect();
        names.sort_unstable();
        names
    }

    fn register_range_function(&mut self, name: &'static str, implementation: FunctionImpl) {
        self.register(FunctionDef {
            name,
            min_args: 1,
            max_args: Some(1),
            single_cell: false,
            implementation,
        });
    }

    fn register_math_functions(&mut self) {
        self.register_range_function("SUM", math::fn_sum);
        self.register_range_function("AVERAGE", math::fn_average);
        self.register_range_function("COUNT", math::fn_count);
        self.register_range_function("MAX", math::fn_max);
        self.register_range_function("MIN", math::fn_min);
    }

    fn register_text_functions(&mut self) {
        // TRIM, UPPER, LOWER take a single cell
        let cell_functions: [(&'static str, FunctionImpl); 3] = [
            ("TRIM", text::fn_trim),
            ("UPPER", text::fn_upper),
            ("LOWER", text::fn_lower),
        ];
        for (name, implementation) in cell_functions {
            self.register(FunctionDef {
                name,
                min_args: 1,
                max_args: Some(1),
                single_cell: true,
                implementation,
            });
        }

        self.register_range_function("REMOVE_DUPLICATES", text::fn_remove_duplicates);

        // FIND_AND_REPLACE(range, pattern, replacement)
        self.register(FunctionDef {
            name: "FIND_AND_REPLACE",
            min_args: 3,
            max_args: Some(3),
            single_cell: false,
            implementation: text::fn_find_and_replace,
        });
    }
}

impl Default for FunctionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Names of the built-in functions, sorted
pub fn builtin_function_names() -> Vec<&'static str> {
    crate::evaluator::get_function_registry().names()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_registry_contents() {
        assert_eq!(
            builtin_function_names(),
            vec![
                "AVERAGE",
                "COUNT",
                "FIND_AND_REPLACE",
                "LOWER",
                "MAX",
                "MIN",
                "REMOVE_DUPLICATES",
                "SUM",
                "TRIM",
                "UPPER"
            ]
        );
    }

    #[test]
    fn test_lookup_is_exact() {
        let registry = FunctionRegistry::new();
        assert!(registry.get("SUM").is_some());
        assert!(registry.get("sum").is_none());
        assert!(registry.get("SUMIF").is_none());

        let upper = registry.get("UPPER").unwrap();
        assert!(upper.single_cell);
        let replace = registry.get("FIND_AND_REPLACE").unwrap();
        assert_eq!((replace.min_args, replace.max_args), (3, Some(3)));
    }
}
