/// Data layer: core types, loading, and grouping.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  Table    │  Vec<Column>, positional rows
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  group    │  key column → row indices per key
///   └──────────┘
/// ```

pub mod group;
pub mod loader;
pub mod model;

use thiserror::Error;

/// Failures when reading columns out of a loaded [`model::Table`].
#[derive(Debug, Error)]
pub enum DataError {
    #[error("column '{column}' not found (available: {})", available.join(", "))]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },
    #[error("column '{column}', row {row}: '{value}' is not a number")]
    NonNumeric {
        column: String,
        row: usize,
        value: String,
    },
    #[error("column '{column}' has {len} rows, expected {expected}")]
    RaggedColumn {
        column: String,
        len: usize,
        expected: usize,
    },
}
