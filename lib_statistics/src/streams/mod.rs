//! # Reactive Request/Response Engine
//!
//! This module implements the pull-based engine every catalog fetch runs on.
//!
//! ## Core Design Principles:
//!
//! 1.  **Laziness as a correctness property**: constructing a stream performs
//!     no network activity. The exchange is issued only when the consumer
//!     polls for the first time — polling *is* the demand signal. A stream
//!     that is never polled never touches the network and never errors.
//!
//! 2.  **Single terminal outcome**: each stream yields at most one item — a
//!     decoded value or a terminal error — and then ends. The value is
//!     always followed immediately by the end-of-stream signal.
//!
//! 3.  **Cooperative cancellation**: a [`response::Subscription`] handle can
//!     cancel a stream out-of-band. Cancellation is idempotent, may race
//!     with an in-flight completion (whichever lands first wins), and
//!     guarantees that nothing is delivered afterwards. The in-flight
//!     transport future is dropped, which aborts the exchange where the
//!     transport supports it.
//!
//! 4.  **Sequential two-phase composition**: [`table::DescribedTableStream`]
//!     chains a descriptor fetch into a descriptor-informed data fetch. The
//!     data exchange is never issued before the descriptor exchange has
//!     fully completed, and cancelling during the first phase prevents the
//!     second from ever starting.
//!
//! ## Contained Modules:
//!
//! - **`response`**: The single-exchange stream engine and its subscription
//!   handle.
//!
//! - **`table`**: The table data stream, its fluent request configuration,
//!   and the two-phase descriptor-informed composer.

#![doc(html_logo_url = "https://example.com/logo.png")] // Placeholder
#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

/// The single-exchange stream engine and cancellation handle.
pub mod response;
/// Table data streams and the two-phase descriptor-informed composer.
pub mod table;
