//! # Selection Queries
//!
//! The wire request body of a data fetch is an ordered list of constraints
//! (`query`) plus a fixed response-format directive (`response`). The
//! [`TableRequestBuilder`] accumulates constraints through a fluent API and
//! serializes them in insertion order; an empty constraint list is a valid
//! "select everything" request.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

use bytes::Bytes;
use serde::Serialize;

use crate::models::descriptor::Variable;

/// The fixed dimension code of content selection constraints.
pub const CONTENTS_CODE: &str = "ContentsCode";

/// The fixed dimension code of the time dimension used by year ranges.
pub const TIME_CODE: &str = "Tid";

/// One constraint: a dimension code plus the selected values.
#[derive(Debug, Clone, Serialize)]
pub struct TableQuery {
    /// The dimension code.
    pub code: String,
    /// The selection applied to the dimension.
    pub selection: Selection,
}

impl TableQuery {
    /// Creates a constraint on a raw dimension code.
    pub fn new(code: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            code: code.into(),
            selection: Selection::new(values),
        }
    }
}

/// The value selection of one constraint. The catalog supports several
/// filter modes; this library always uses item selection.
#[derive(Debug, Clone, Serialize)]
pub struct Selection {
    /// The filter mode, always `"item"`.
    pub filter: String,
    /// The selected values.
    pub values: Vec<String>,
}

impl Selection {
    /// Creates an item selection over `values`.
    pub fn new(values: Vec<String>) -> Self {
        Self {
            filter: "item".to_string(),
            values,
        }
    }
}

/// The fixed response-format directive. Only JSON is requested.
#[derive(Debug, Clone, Serialize)]
pub struct ResponseFormat {
    /// The requested format, always `"json"`.
    pub format: String,
}

/// # Table Request
///
/// The complete wire request body of a data fetch.
#[derive(Debug, Clone, Serialize)]
pub struct TableRequest {
    /// The accumulated constraints, in insertion order.
    pub query: Vec<TableQuery>,
    /// The fixed response-format directive.
    pub response: ResponseFormat,
}

impl TableRequest {
    /// An unconstrained request; the catalog treats it as "select everything".
    pub fn empty() -> Self {
        Self {
            query: Vec::new(),
            response: ResponseFormat {
                format: "json".to_string(),
            },
        }
    }
}

/// # Table Request Builder
///
/// A fluent accumulator of selection constraints. Every method returns
/// `&mut Self` so constraints can be chained; [`TableRequestBuilder::build`]
/// serializes the result into the POST body.
#[derive(Debug)]
pub struct TableRequestBuilder {
    request: TableRequest,
}

impl TableRequestBuilder {
    /// Creates a builder holding an empty request.
    pub fn new() -> Self {
        Self {
            request: TableRequest::empty(),
        }
    }

    /// Appends a constraint, preserving insertion order.
    fn append(&mut self, code: &str, values: Vec<String>) -> &mut Self {
        self.request.query.push(TableQuery::new(code, values));
        self
    }

    /// Constrains the fixed content-selection dimension (`ContentsCode`) to
    /// the given measure codes.
    pub fn select<I, S>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.append(CONTENTS_CODE, values)
    }

    /// Constrains an arbitrary dimension code to the given values.
    pub fn filter<I, S>(&mut self, code: &str, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.append(code, values)
    }

    /// Constrains a resolved descriptor variable to the given values. A
    /// convenience over [`TableRequestBuilder::filter`]; the wire shape is
    /// identical.
    pub fn filter_variable<I, S>(&mut self, variable: &Variable, values: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.append(variable.code(), values)
    }

    /// Constrains `variable` to the values of its list that fall within
    /// `[start, stop]` under lexicographic string comparison. A missing
    /// bound leaves that side unconstrained.
    ///
    /// Callers filtering textual enumerations rely on string ordering here;
    /// this is deliberately not a numeric comparison.
    pub fn between(
        &mut self,
        start: Option<&str>,
        stop: Option<&str>,
        variable: &Variable,
    ) -> &mut Self {
        let values = variable
            .values()
            .iter()
            .map(|pair| pair.value.clone())
            .filter(|value| {
                if let Some(start) = start {
                    if value.as_str() < start {
                        return false;
                    }
                }
                if let Some(stop) = stop {
                    if value.as_str() > stop {
                        return false;
                    }
                }
                true
            })
            .collect();
        self.append(variable.code(), values)
    }

    /// Constrains the fixed time dimension (`Tid`) to every integer in the
    /// inclusive range `[start, stop]`, enumerated rather than filtered —
    /// used for contiguous year ranges.
    ///
    /// Bounds that do not convert to integers make this a silent no-op
    /// (known looseness, kept for compatibility); an inverted range yields
    /// an empty constraint.
    pub fn between_years(&mut self, start: impl ToString, stop: impl ToString) -> &mut Self {
        let (Ok(start), Ok(stop)) = (
            start.to_string().parse::<i64>(),
            stop.to_string().parse::<i64>(),
        ) else {
            return self;
        };

        let values = (start..=stop).map(|year| year.to_string()).collect();
        self.append(TIME_CODE, values)
    }

    /// Serializes the accumulated constraints plus the response-format
    /// directive into the wire request body.
    pub fn build(&self) -> Result<Bytes, serde_json::Error> {
        serde_json::to_vec(&self.request).map(Bytes::from)
    }
}

impl Default for TableRequestBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::descriptor::VariableValue;

    fn time_variable(years: std::ops::RangeInclusive<i32>) -> Variable {
        Variable::Time {
            code: TIME_CODE.to_string(),
            label: "år".to_string(),
            values: years
                .map(|year| VariableValue {
                    value: year.to_string(),
                    text: year.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_build_preserves_insertion_order_and_wire_shape() {
        // 1. Accumulate a content selection followed by a region filter
        let mut builder = TableRequestBuilder::new();
        builder.select(["BE0101N1"]).filter("Region", ["00"]);

        // 2. The serialized body must match the wire shape byte for byte
        let body = builder.build().unwrap();
        assert_eq!(
            std::str::from_utf8(&body).unwrap(),
            r#"{"query":[{"code":"ContentsCode","selection":{"filter":"item","values":["BE0101N1"]}},{"code":"Region","selection":{"filter":"item","values":["00"]}}],"response":{"format":"json"}}"#
        );
    }

    #[test]
    fn test_empty_request_is_valid() {
        let builder = TableRequestBuilder::new();
        let body = builder.build().unwrap();
        assert_eq!(
            std::str::from_utf8(&body).unwrap(),
            r#"{"query":[],"response":{"format":"json"}}"#
        );
    }

    #[test]
    fn test_between_filters_lexicographically() {
        let variable = time_variable(1999..=2010);

        let mut builder = TableRequestBuilder::new();
        builder.between(Some("2000"), Some("2005"), &variable);

        let values = &builder.request.query[0].selection.values;
        assert_eq!(values, &["2000", "2001", "2002", "2003", "2004", "2005"]);
    }

    #[test]
    fn test_between_with_open_bounds() {
        let variable = time_variable(1999..=2003);

        // No lower bound: everything up to the stop value
        let mut builder = TableRequestBuilder::new();
        builder.between(None, Some("2001"), &variable);
        assert_eq!(
            builder.request.query[0].selection.values,
            &["1999", "2000", "2001"]
        );

        // No upper bound: everything from the start value on
        let mut builder = TableRequestBuilder::new();
        builder.between(Some("2002"), None, &variable);
        assert_eq!(builder.request.query[0].selection.values, &["2002", "2003"]);

        // No bounds at all: the whole value list
        let mut builder = TableRequestBuilder::new();
        builder.between(None, None, &variable);
        assert_eq!(builder.request.query[0].selection.values.len(), 5);
    }

    #[test]
    fn test_between_years_enumerates_the_range() {
        let mut builder = TableRequestBuilder::new();
        builder.between_years(2000, 2003);

        let query = &builder.request.query[0];
        assert_eq!(query.code, TIME_CODE);
        assert_eq!(query.selection.values, &["2000", "2001", "2002", "2003"]);
    }

    #[test]
    fn test_between_years_with_non_numeric_bounds_is_a_no_op() {
        let mut builder = TableRequestBuilder::new();
        builder.between_years("not-a-year", 2003);
        assert!(builder.request.query.is_empty());
    }

    #[test]
    fn test_between_years_with_inverted_range_yields_empty_constraint() {
        let mut builder = TableRequestBuilder::new();
        builder.between_years(2005, 2000);
        assert!(builder.request.query[0].selection.values.is_empty());
    }

    #[test]
    fn test_filter_variable_matches_raw_filter_wire_shape() {
        let variable = time_variable(2000..=2001);

        let mut by_variable = TableRequestBuilder::new();
        by_variable.filter_variable(&variable, ["2000"]);

        let mut by_code = TableRequestBuilder::new();
        by_code.filter(TIME_CODE, ["2000"]);

        assert_eq!(
            by_variable.build().unwrap(),
            by_code.build().unwrap()
        );
    }

    #[test]
    fn test_chaining_reads_fluently() {
        let variable = time_variable(1999..=2010);

        let mut builder = TableRequestBuilder::new();
        builder
            .select(["BE0101N1"])
            .filter("Region", ["00", "01"])
            .between(Some("2000"), Some("2005"), &variable);

        assert_eq!(builder.request.query.len(), 3);
    }
}
