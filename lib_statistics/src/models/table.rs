//! # Tabular Results
//!
//! The decoded data answer for a table. Columns and row tuples are
//! positionally correlated — the result is fully denormalized, there are no
//! joins to perform. Unknown column types map to an explicit
//! [`DataType::Invalid`] variant instead of failing the decode: columns are
//! descriptive metadata, not control flow.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

use serde::Deserialize;

/// # Table
///
/// The decoded result of a data request.
#[derive(Debug, Clone, Deserialize)]
pub struct Table {
    /// The ordered columns, key columns first, then value columns.
    pub columns: Vec<Column>,
    /// The ordered rows, parallel-indexed to `columns`.
    pub data: Vec<Row>,
    /// Wire-level comments; absent on most tables.
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// One or more metadata records describing the table.
    pub metadata: Vec<Details>,
}

impl Table {
    /// The (code, text, comment) triples of columns carrying a comment.
    pub fn column_comments(&self) -> Vec<(String, String, String)> {
        self.columns
            .iter()
            .filter_map(|column| {
                column
                    .comment
                    .as_ref()
                    .map(|comment| (column.code.clone(), column.text.clone(), comment.clone()))
            })
            .collect()
    }

    /// Whether rows carry fewer than two key parts.
    pub fn single_key(&self) -> bool {
        self.data.first().map_or(true, |row| row.key.len() < 2)
    }
}

/// One column of a table.
#[derive(Debug, Clone, Deserialize)]
pub struct Column {
    /// The dimension code the column stems from.
    pub code: String,
    /// The display label.
    pub text: String,
    /// The column's role in the row tuples.
    #[serde(rename = "type")]
    pub data_type: DataType,
    /// An optional comment attached to the column.
    #[serde(default)]
    pub comment: Option<String>,
}

/// The role a column plays in the row tuples.
///
/// Unknown wire values (including the empty string) decode to
/// [`DataType::Invalid`] rather than failing: a column with an unrecognized
/// type is still displayable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(from = "String")]
pub enum DataType {
    /// A time key column (`"t"`).
    Time,
    /// A content key column (`"c"`).
    Content,
    /// A data value column (`"d"`).
    Data,
    /// Anything the known set does not cover.
    Invalid,
}

impl From<String> for DataType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "t" => DataType::Time,
            "c" => DataType::Content,
            "d" => DataType::Data,
            _ => DataType::Invalid,
        }
    }
}

/// One row of a table: an ordered key tuple plus an ordered value tuple,
/// both parallel-indexed to the table's columns.
#[derive(Debug, Clone, Deserialize)]
pub struct Row {
    /// The key parts, one per key column.
    pub key: Vec<String>,
    /// The values, one per value column, transported as strings.
    pub values: Vec<String>,
}

impl Row {
    /// The values parsed as numbers; entries that do not parse become `0.0`.
    pub fn numeric_values(&self) -> Vec<f64> {
        self.values
            .iter()
            .map(|value| value.parse::<f64>().unwrap_or(0.0))
            .collect()
    }
}

/// A wire-level comment attached to a dimension value.
#[derive(Debug, Clone, Deserialize)]
pub struct Comment {
    /// The dimension code the comment refers to.
    pub variable: String,
    /// The value within that dimension.
    pub value: String,
    /// The comment text.
    pub comment: String,
}

/// One metadata record describing the table.
#[derive(Debug, Clone, Deserialize)]
pub struct Details {
    /// Reference to the table's information file.
    pub infofile: String,
    /// When the table was last updated.
    pub updated: String,
    /// The table's label.
    pub label: String,
    /// The producing source.
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TABLE: &str = r#"{
        "columns": [
            {"code": "Region", "text": "region", "type": "d"},
            {"code": "Tid", "text": "år", "type": "t"},
            {"code": "BE0101N1", "text": "Folkmängd", "type": "c", "comment": "Preliminär siffra."}
        ],
        "data": [
            {"key": ["00", "2020"], "values": ["10379295"]},
            {"key": ["00", "2021"], "values": [".."]}
        ],
        "comments": [
            {"variable": "Region", "value": "00", "comment": "Hela riket."}
        ],
        "metadata": [
            {"infofile": "BE0101", "updated": "2021-02-22T09:30:00", "label": "Folkmängd", "source": "SCB"}
        ]
    }"#;

    #[test]
    fn test_decode_full_table() {
        let table: Table = serde_json::from_str(TABLE).unwrap();

        assert_eq!(table.columns.len(), 3);
        assert_eq!(table.columns[0].data_type, DataType::Data);
        assert_eq!(table.columns[1].data_type, DataType::Time);
        assert_eq!(table.columns[2].data_type, DataType::Content);
        assert_eq!(table.data.len(), 2);
        assert_eq!(table.data[0].key, vec!["00", "2020"]);
        assert_eq!(table.comments.len(), 1);
        assert_eq!(table.metadata[0].source, "SCB");
    }

    #[test]
    fn test_unknown_column_type_maps_to_invalid() {
        let payload = r#"{"code": "X", "text": "x", "type": "z"}"#;
        let column: Column = serde_json::from_str(payload).unwrap();
        assert_eq!(column.data_type, DataType::Invalid);

        let empty = r#"{"code": "X", "text": "x", "type": ""}"#;
        let column: Column = serde_json::from_str(empty).unwrap();
        assert_eq!(column.data_type, DataType::Invalid);
    }

    #[test]
    fn test_missing_comments_default_to_empty() {
        let payload = r#"{"columns": [], "data": [], "metadata": []}"#;
        let table: Table = serde_json::from_str(payload).unwrap();
        assert!(table.comments.is_empty());
        assert!(table.single_key());
    }

    #[test]
    fn test_column_comments_are_derived_from_columns() {
        let table: Table = serde_json::from_str(TABLE).unwrap();
        let comments = table.column_comments();

        assert_eq!(comments.len(), 1);
        assert_eq!(
            comments[0],
            (
                "BE0101N1".to_string(),
                "Folkmängd".to_string(),
                "Preliminär siffra.".to_string()
            )
        );
    }

    #[test]
    fn test_numeric_values_default_unparseable_to_zero() {
        let table: Table = serde_json::from_str(TABLE).unwrap();
        assert_eq!(table.data[0].numeric_values(), vec![10379295.0]);
        assert_eq!(table.data[1].numeric_values(), vec![0.0]);
    }

    #[test]
    fn test_single_key_detection() {
        let table: Table = serde_json::from_str(TABLE).unwrap();
        assert!(!table.single_key());
    }
}
