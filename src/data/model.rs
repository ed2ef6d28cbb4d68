use std::fmt;

use super::DataError;

// ---------------------------------------------------------------------------
// Value – a single cell of a measurement table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value mirroring the common Pandas dtypes.
/// Grouping keys live in a `BTreeMap`, so `Value` must be `Ord`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    Bool(bool),
    Null,
}

// -- Manual Eq/Ord so we can key a BTreeMap with Value --

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use Value::*;
        fn discriminant(v: &Value) -> u8 {
            match v {
                Null => 0,
                Bool(_) => 1,
                Integer(_) => 2,
                Float(_) => 3,
                String(_) => 4,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Bool(a), Bool(b)) => a.cmp(b),
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Null => write!(f, "<null>"),
        }
    }
}

impl Value {
    /// Interpret the value as an `f64` for plotting.
    ///
    /// `Null` maps to `NaN` so missing cells become gaps; text has no
    /// numeric reading.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Float(v) => Some(*v),
            Value::Integer(i) => Some(*i as f64),
            Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
            Value::Null => Some(f64::NAN),
            Value::String(_) => None,
        }
    }

    /// Loose equality used by row filters: numbers compare by value,
    /// everything else structurally.
    pub fn matches(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::String(_), _) | (_, Value::String(_)) | (Value::Null, _) | (_, Value::Null) => {
                self == other
            }
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Column – one named column of the table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub values: Vec<Value>,
}

impl Column {
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Column {
            name: name.into(),
            values,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded measurement file
// ---------------------------------------------------------------------------

/// A column-oriented, read-only table. Rows are positional and every column
/// has the same length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Build a table, rejecting columns of unequal length.
    pub fn new(columns: Vec<Column>) -> Result<Self, DataError> {
        if let Some(first) = columns.first() {
            let expected = first.len();
            if let Some(bad) = columns.iter().find(|c| c.len() != expected) {
                return Err(DataError::RaggedColumn {
                    column: bad.name.clone(),
                    len: bad.len(),
                    expected,
                });
            }
        }
        Ok(Table { columns })
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn column(&self, name: &str) -> Result<&Column, DataError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| DataError::MissingColumn {
                column: name.to_string(),
                available: self.columns.iter().map(|c| c.name.clone()).collect(),
            })
    }

    /// The implicit row index `0..len`, as Pandas assigns it by default.
    pub fn index(&self) -> Vec<f64> {
        (0..self.len()).map(|i| i as f64).collect()
    }

    /// Read a column as `f64`. Nulls become `NaN`, text is an error.
    pub fn numeric(&self, name: &str) -> Result<Vec<f64>, DataError> {
        let column = self.column(name)?;
        column
            .values
            .iter()
            .enumerate()
            .map(|(row, v)| {
                v.as_f64().ok_or_else(|| DataError::NonNumeric {
                    column: name.to_string(),
                    row,
                    value: v.to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(vec![
            Column::new(
                "queue_id",
                vec![Value::Integer(0), Value::Integer(1), Value::Integer(0)],
            ),
            Column::new(
                "elapsed",
                vec![Value::Float(1.5), Value::Null, Value::Integer(3)],
            ),
            Column::new(
                "note",
                vec![
                    Value::String("a".into()),
                    Value::String("b".into()),
                    Value::Null,
                ],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn numeric_maps_nulls_to_nan() {
        let t = sample();
        let elapsed = t.numeric("elapsed").unwrap();
        assert_eq!(elapsed[0], 1.5);
        assert!(elapsed[1].is_nan());
        assert_eq!(elapsed[2], 3.0);
    }

    #[test]
    fn numeric_rejects_text() {
        let err = sample().numeric("note").unwrap_err();
        assert!(matches!(err, DataError::NonNumeric { row: 0, .. }));
    }

    #[test]
    fn missing_column_lists_available() {
        match sample().column("set_1") {
            Err(DataError::MissingColumn { available, .. }) => {
                assert_eq!(available, vec!["queue_id", "elapsed", "note"]);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn ragged_columns_are_rejected() {
        let err = Table::new(vec![
            Column::new("a", vec![Value::Integer(1)]),
            Column::new("b", vec![]),
        ])
        .unwrap_err();
        assert!(matches!(err, DataError::RaggedColumn { len: 0, expected: 1, .. }));
    }

    #[test]
    fn index_counts_rows() {
        assert_eq!(sample().index(), vec![0.0, 1.0, 2.0]);
        assert!(Table::default().is_empty());
    }

    #[test]
    fn values_order_by_type_then_value() {
        let mut v = vec![
            Value::Float(0.5),
            Value::Integer(2),
            Value::Null,
            Value::Integer(1),
        ];
        v.sort();
        assert_eq!(
            v,
            vec![
                Value::Null,
                Value::Integer(1),
                Value::Integer(2),
                Value::Float(0.5)
            ]
        );
    }

    #[test]
    fn matches_compares_numbers_across_types() {
        assert!(Value::Integer(2).matches(&Value::Float(2.0)));
        assert!(!Value::Integer(2).matches(&Value::String("2".into())));
        assert!(Value::Null.matches(&Value::Null));
    }
}
