/// Errors raised when a dataset violates its shape contract
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DatasetError {
    /// Two dimensions that must agree do not
    #[error("shape mismatch: {what} has {actual} rows/entries, expected {expected}")]
    ShapeMismatch {
        /// Which field disagrees
        what: String,
        /// Expected count
        expected: usize,
        /// Actual count
        actual: usize,
    },

    /// A metadata column name appears more than once
    #[error("duplicate column: {0}")]
    DuplicateColumn(String),

    /// A categorical code points past the category list
    #[error("column '{column}' uses category code {code} but has {n_categories} categories")]
    InvalidCategory {
        /// Column name
        column: String,
        /// Offending code
        code: usize,
        /// Number of categories
        n_categories: usize,
    },
}

impl DatasetError {
    pub(crate) fn mismatch(what: impl Into<String>, expected: usize, actual: usize) -> Self {
        Self::ShapeMismatch {
            what: what.into(),
            expected,
            actual,
        }
    }
}
