use super::error::DatasetError;

/// Values of a single metadata column
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValues {
    /// Signed integers
    Integer(Vec<i64>),
    /// Floating point values, `NaN` marks a missing value
    Float(Vec<f64>),
    /// Free text
    Text(Vec<String>),
    /// Booleans
    Boolean(Vec<bool>),
    /// Categorical values stored as codes into `categories`; `None` is missing
    Categorical {
        /// Category labels
        categories: Vec<String>,
        /// Per-row category index
        codes: Vec<Option<usize>>,
    },
}

impl ColumnValues {
    /// Number of rows in the column
    pub fn len(&self) -> usize {
        match self {
            Self::Integer(v) => v.len(),
            Self::Float(v) => v.len(),
            Self::Text(v) => v.len(),
            Self::Boolean(v) => v.len(),
            Self::Categorical { codes, .. } => codes.len(),
        }
    }

    /// Whether the column has no rows
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Short name of the value type, used in log output
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Integer(_) => "integer",
            Self::Float(_) => "float",
            Self::Text(_) => "text",
            Self::Boolean(_) => "boolean",
            Self::Categorical { .. } => "categorical",
        }
    }
}

/// A named metadata column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column header
    pub name: String,
    /// Column values
    pub values: ColumnValues,
}

impl Column {
    /// Create a column
    pub fn new(name: impl Into<String>, values: ColumnValues) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }
}

/// Ordered table of named, typed columns sharing one row count.
///
/// The row count is stored explicitly so a table with no columns still
/// describes how many rows it annotates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MetadataTable {
    n_rows: usize,
    columns: Vec<Column>,
}

impl MetadataTable {
    /// Empty table annotating `n_rows` rows
    pub fn new(n_rows: usize) -> Self {
        Self {
            n_rows,
            columns: Vec::new(),
        }
    }

    /// Builder-style [`MetadataTable::push_column`]
    pub fn with_column(
        mut self,
        name: impl Into<String>,
        values: ColumnValues,
    ) -> Result<Self, DatasetError> {
        self.push_column(Column::new(name, values))?;
        Ok(self)
    }

    /// Append a column
    ///
    /// # Errors
    ///
    /// Fails if the column length differs from the table row count, if the
    /// name is already taken, or if a categorical code points past its
    /// category list.
    pub fn push_column(&mut self, column: Column) -> Result<(), DatasetError> {
        if column.values.len() != self.n_rows {
            return Err(DatasetError::mismatch(
                format!("column '{}'", column.name),
                self.n_rows,
                column.values.len(),
            ));
        }
        if self.column(&column.name).is_some() {
            return Err(DatasetError::DuplicateColumn(column.name));
        }
        if let ColumnValues::Categorical { categories, codes } = &column.values {
            if let Some(&code) = codes.iter().flatten().find(|c| **c >= categories.len()) {
                let n_categories = categories.len();
                return Err(DatasetError::InvalidCategory {
                    column: column.name,
                    code,
                    n_categories,
                });
            }
        }
        self.columns.push(column);
        Ok(())
    }

    /// Number of rows
    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    /// Number of columns
    pub fn n_columns(&self) -> usize {
        self.columns.len()
    }

    /// Columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Column names in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }
}

/// Per-feature table indexed by feature identifier
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FeatureTable {
    ids: Vec<String>,
}

impl FeatureTable {
    /// Table of feature identifiers, in order
    pub fn new<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Feature identifiers, in order
    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    /// Number of features
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the table has no features
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
