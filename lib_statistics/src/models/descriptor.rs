//! # Table Descriptors
//!
//! The metadata answer for a table: its title plus the variables a selection
//! query can constrain. On the wire a variable carries parallel `values` and
//! `valueTexts` arrays and two optional boolean markers; decoding zips the
//! arrays into (value, display text) pairs and sorts the variable into one
//! of three kinds. The `elimination` marker takes precedence over `time`,
//! which takes precedence over the plain column default.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

use serde::Deserialize;

/// # Table Descriptor
///
/// Decoded metadata for one table.
#[derive(Debug, Clone, Deserialize)]
pub struct TableDescriptor {
    /// The table's display title.
    pub title: String,
    /// The dimensions a selection can constrain, in wire order.
    pub variables: Vec<Variable>,
}

impl TableDescriptor {
    /// The plain selectable columns.
    pub fn columns(&self) -> Vec<&Variable> {
        self.variables
            .iter()
            .filter(|variable| matches!(variable, Variable::Column { .. }))
            .collect()
    }

    /// The eliminable filter dimensions.
    pub fn filters(&self) -> Vec<&Variable> {
        self.variables
            .iter()
            .filter(|variable| matches!(variable, Variable::Elimination { .. }))
            .collect()
    }

    /// The time dimensions.
    pub fn series(&self) -> Vec<&Variable> {
        self.variables
            .iter()
            .filter(|variable| matches!(variable, Variable::Time { .. }))
            .collect()
    }
}

/// One (value, display text) pair of a variable's value list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableValue {
    /// The wire value used in selection queries.
    pub value: String,
    /// The human-readable text for the value.
    pub text: String,
}

/// # Descriptor Variable
///
/// One dimension of a table, sorted into its kind at decode time.
#[derive(Debug, Clone, Deserialize)]
#[serde(from = "RawVariable")]
pub enum Variable {
    /// A plain selectable column.
    Column {
        /// The dimension code.
        code: String,
        /// The display label.
        label: String,
        /// The ordered (value, display text) pairs.
        values: Vec<VariableValue>,
    },
    /// A filter dimension the catalog may eliminate when unconstrained.
    Elimination {
        /// The dimension code.
        code: String,
        /// The display label.
        label: String,
        /// The ordered (value, display text) pairs.
        values: Vec<VariableValue>,
    },
    /// A time dimension.
    Time {
        /// The dimension code.
        code: String,
        /// The display label.
        label: String,
        /// The ordered (value, display text) pairs.
        values: Vec<VariableValue>,
    },
}

impl Variable {
    /// The dimension code.
    pub fn code(&self) -> &str {
        match self {
            Variable::Column { code, .. } => code,
            Variable::Elimination { code, .. } => code,
            Variable::Time { code, .. } => code,
        }
    }

    /// The display label.
    pub fn label(&self) -> &str {
        match self {
            Variable::Column { label, .. } => label,
            Variable::Elimination { label, .. } => label,
            Variable::Time { label, .. } => label,
        }
    }

    /// The ordered (value, display text) pairs.
    pub fn values(&self) -> &[VariableValue] {
        match self {
            Variable::Column { values, .. } => values,
            Variable::Elimination { values, .. } => values,
            Variable::Time { values, .. } => values,
        }
    }
}

/// The wire shape of a variable before kind sorting.
#[derive(Debug, Deserialize)]
struct RawVariable {
    code: String,
    text: String,
    values: Vec<String>,
    #[serde(rename = "valueTexts")]
    value_texts: Vec<String>,
    #[serde(default)]
    elimination: bool,
    #[serde(default)]
    time: bool,
}

impl From<RawVariable> for Variable {
    fn from(raw: RawVariable) -> Self {
        // Zip truncates to the shorter array if the wire lists disagree
        let values = raw
            .values
            .into_iter()
            .zip(raw.value_texts)
            .map(|(value, text)| VariableValue { value, text })
            .collect();

        // Elimination wins over time, time wins over the column default
        if raw.elimination {
            Variable::Elimination {
                code: raw.code,
                label: raw.text,
                values,
            }
        } else if raw.time {
            Variable::Time {
                code: raw.code,
                label: raw.text,
                values,
            }
        } else {
            Variable::Column {
                code: raw.code,
                label: raw.text,
                values,
            }
        }
    }
}
