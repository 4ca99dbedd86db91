//! # Catalog Client Module
//!
//! This module provides the entry point for talking to a statistics catalog.
//! The [`Client`] owns a [`Configuration`] (where the catalog lives, which
//! language it answers in) and a [`Transport`] (how bytes move), and hands
//! out lazy streams for the three catalog operations: navigating the link
//! tree, fetching a table's descriptor, and fetching a table's data.
//!
//! ## Contained Modules:
//!
//! - **`configuration`**: Base URL templating and language selection.
//!
//! - **`transport`**: The `Transport` trait boundary, the `reqwest`-backed
//!   production implementation, and the pure 2xx response validator.
//!
//! No stream returned by this module performs any network activity until it
//! is polled for the first time; constructing a stream is free.

#![doc(html_logo_url = "https://example.com/logo.png")] // Placeholder
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// Base URL templating and language selection.
pub mod configuration;
/// Transport trait, reqwest implementation, and response validation.
pub mod transport;

use std::sync::Arc;

use crate::models::descriptor::TableDescriptor;
use crate::models::navigation::NavigationLink;
use crate::streams::response::ResponseStream;
use crate::streams::table::TableStream;
use configuration::Configuration;
use transport::{Exchange, HttpTransport, Transport};

/// # Catalog Client
///
/// A facade over one catalog deployment. Cloning is cheap: the transport is
/// shared behind an `Arc` and the configuration is a small value.
#[derive(Clone)]
pub struct Client {
    /// Where the catalog lives and which language it answers in.
    configuration: Configuration,
    /// The transport performing the actual exchanges.
    transport: Arc<dyn Transport>,
}

impl Client {
    /// Creates a client over the `reqwest`-backed [`HttpTransport`].
    pub fn new(configuration: Configuration) -> Self {
        Self::with_transport(configuration, Arc::new(HttpTransport::default()))
    }

    /// Creates a client over a caller-supplied transport. Used by tests to
    /// drive the engine without network access.
    pub fn with_transport(configuration: Configuration, transport: Arc<dyn Transport>) -> Self {
        Self {
            configuration,
            transport,
        }
    }

    /// Returns a stream over the navigation links nested under `link`.
    ///
    /// Pass [`NavigationLink::root()`] for the top of the catalog. The
    /// exchange is issued on first poll; the single published value is the
    /// full list of child links.
    pub fn navigation(&self, link: &NavigationLink) -> ResponseStream<Vec<NavigationLink>> {
        tracing::debug!(id = link.id(), "building navigation stream");
        match self.configuration.build_url(link.id()) {
            Ok(url) => ResponseStream::new(self.transport.clone(), Exchange::get(url)),
            Err(error) => ResponseStream::failed(error),
        }
    }

    /// Returns a stream over the metadata descriptor of the table `table`
    /// within the subject area `area`.
    pub fn table_descriptor(&self, area: &str, table: &str) -> ResponseStream<TableDescriptor> {
        tracing::debug!(area, table, "building table descriptor stream");
        match self.configuration.build_url(&format!("{}/{}", area, table)) {
            Ok(url) => ResponseStream::new(self.transport.clone(), Exchange::get(url)),
            Err(error) => ResponseStream::failed(error),
        }
    }

    /// Returns an unconfigured data stream for the table `table` within the
    /// subject area `area`.
    ///
    /// Without further configuration the stream posts an empty selection,
    /// which the catalog treats as "select everything". Use
    /// [`TableStream::configure_request`] to constrain the selection, or
    /// [`TableStream::configure_request_with_descriptor`] to constrain it
    /// using the table's own descriptor.
    pub fn table(&self, area: &str, table: &str) -> TableStream {
        tracing::debug!(area, table, "building table stream");
        let url = self.configuration.build_url(&format!("{}/{}", area, table));
        TableStream::new(self.transport.clone(), url)
    }
}

impl Default for Client {
    /// A client for the default catalog deployment with dynamic language.
    fn default() -> Self {
        Self::new(Configuration::default())
    }
}
