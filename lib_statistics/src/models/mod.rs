//! # Wire Data Models
//!
//! This module groups the data structures exchanged with the catalog and the
//! fluent builder that assembles selection queries. Everything here is a
//! direct mapping of the upstream JSON shapes; the only algorithmic content
//! is the hierarchical classification-path resolver in `navigation` and the
//! range handling in `request`.
//!
//! ## Contained Modules:
//!
//! - **`navigation`**: Navigation links (catalog tree nodes) and the
//!   classification-code path resolver used for breadcrumbs and iconography.
//!
//! - **`descriptor`**: Table metadata — the title plus the variables a
//!   selection can constrain, split into selectable columns, eliminable
//!   filter dimensions, and time dimensions.
//!
//! - **`table`**: The decoded tabular result — columns, rows, comments, and
//!   metadata records, positionally correlated.
//!
//! - **`request`**: The wire request body (`query` constraints plus the
//!   fixed response-format directive) and the fluent `TableRequestBuilder`.

#![doc(html_logo_url = "https://example.com/logo.png")] // Placeholder
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Table metadata descriptors and their variables.
pub mod descriptor;
/// Navigation links and the classification-path resolver.
pub mod navigation;
/// Selection query body and the fluent request builder.
pub mod request;
/// The decoded tabular result.
pub mod table;
