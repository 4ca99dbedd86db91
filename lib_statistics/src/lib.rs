//! # Statistics Catalog Client
//!
//! A reactive client library for hierarchical statistics catalogs exposed
//! over HTTP/JSON (the SCB PxWeb family of APIs). The catalog is a tree of
//! navigation links leading to tables; each table is described by a metadata
//! descriptor (columns, filterable dimensions, time series) and retrieved as
//! tabular data via a POST carrying a selection query.
//!
//! ## Contained Modules:
//!
//! - **`client`**: The `Client` facade, its `Configuration` (base URL and
//!   language selection), and the pluggable `Transport` layer built on
//!   `reqwest`.
//!
//! - **`streams`**: The pull-based request/response engine. Every fetch is a
//!   lazy, single-outcome, cancellable stream wrapping exactly one HTTP
//!   exchange, plus the two-phase composer that chains a descriptor fetch
//!   into a descriptor-informed data fetch.
//!
//! - **`models`**: Wire data structures (navigation links, table
//!   descriptors, tables) and the fluent `TableRequestBuilder` used to
//!   assemble selection queries.
//!
//! - **`errors`**: The `StatisticsError` taxonomy shared by every stream.

// Declare the modules to re-export
pub mod client;
pub mod errors;
pub mod models;
pub mod streams;

// Re-export the public surface
pub use client::configuration::{Configuration, Language};
pub use client::transport::{Exchange, HttpTransport, RawResponse, Transport};
pub use client::Client;
pub use errors::{StatisticsError, TransportFault};
pub use models::descriptor::{TableDescriptor, Variable, VariableValue};
pub use models::navigation::{classification_path, NavigationLink};
pub use models::request::{TableRequest, TableRequestBuilder};
pub use models::table::{Column, Comment, DataType, Details, Row, Table};
pub use streams::response::{ResponseStream, Subscription};
pub use streams::table::{DescribedTableStream, TableStream};
