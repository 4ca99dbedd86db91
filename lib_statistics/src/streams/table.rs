//! # Table Data Streams
//!
//! [`TableStream`] is the entry point for retrieving a table's data. It is
//! not a stream itself: it is the not-yet-configured data request, waiting
//! for a selection. Configuration comes in two shapes:
//!
//! - **Single phase** — [`TableStream::configure_request`] runs a closure
//!   over a fresh [`TableRequestBuilder`] and returns the data stream. No
//!   extra network activity is involved.
//!
//! - **Two phase** — [`TableStream::configure_request_with_descriptor`]
//!   first fetches the table's metadata descriptor, hands it to the closure
//!   together with the builder, and only after the descriptor exchange has
//!   fully completed issues the data exchange. The descriptor is always
//!   fetched from the *same* address the data request targets: the last two
//!   path segments of the data URL are the area and table codes, and a GET
//!   on that address yields the descriptor. A data address that does not end
//!   in two such segments fails with
//!   [`StatisticsError::BadRequestShape`] before any exchange is issued.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};

use futures_util::{Stream, StreamExt};
use url::Url;

use crate::client::transport::{Exchange, Transport};
use crate::errors::StatisticsError;
use crate::models::descriptor::TableDescriptor;
use crate::models::request::TableRequestBuilder;
use crate::models::table::Table;
use crate::streams::response::{CancelState, ResponseStream, Subscription};

/// The deferred configuration step of a two-phase fetch.
type ConfigureFn = Box<dyn FnOnce(&mut TableRequestBuilder, &TableDescriptor) + Send>;

/// # Table Stream
///
/// An unconfigured data request for one table. Consumed by one of the
/// configuration methods, each of which produces an actual stream.
pub struct TableStream {
    /// The transport the resulting exchanges run on.
    transport: Arc<dyn Transport>,
    /// The data request's address, or the error met while building it.
    address: Result<Url, StatisticsError>,
}

impl TableStream {
    pub(crate) fn new(transport: Arc<dyn Transport>, address: Result<Url, StatisticsError>) -> Self {
        Self { transport, address }
    }

    /// Configures the data request synchronously and returns the data
    /// stream. The closure receives a fresh builder; the serialized
    /// constraints become the POST body. No network activity happens here —
    /// the exchange is issued when the returned stream is first polled.
    pub fn configure_request(
        self,
        configure: impl FnOnce(&mut TableRequestBuilder),
    ) -> ResponseStream<Table> {
        let url = match self.address {
            Ok(url) => url,
            Err(error) => return ResponseStream::failed(error),
        };

        let mut builder = TableRequestBuilder::new();
        configure(&mut builder);

        match builder.build() {
            Ok(body) => ResponseStream::new(self.transport, Exchange::post(url, Some(body))),
            Err(error) => ResponseStream::failed(StatisticsError::Encode(error)),
        }
    }

    /// Returns the data stream for an unconstrained selection. The catalog
    /// treats an empty query as "select everything".
    pub fn into_stream(self) -> ResponseStream<Table> {
        self.configure_request(|_| {})
    }

    /// Configures the data request using the table's own descriptor.
    ///
    /// The descriptor is fetched first, from the same address the data
    /// request targets; the closure then sees both the builder and the
    /// resolved descriptor. The data exchange is issued only after the
    /// descriptor exchange has completed, and cancelling the returned stream
    /// during the descriptor phase prevents the data exchange from ever
    /// starting.
    ///
    /// Prefer [`TableStream::configure_request`] when the descriptor is not
    /// needed, as the two-phase form doubles the request cost.
    pub fn configure_request_with_descriptor<F>(self, configure: F) -> DescribedTableStream
    where
        F: FnOnce(&mut TableRequestBuilder, &TableDescriptor) + Send + 'static,
    {
        let cancel = Arc::new(CancelState::default());

        let url = match self.address {
            Ok(url) => url,
            Err(error) => {
                return DescribedTableStream {
                    phase: Phase::Failed { error },
                    cancel,
                }
            }
        };

        match derive_descriptor_address(&url) {
            Ok((area, table)) => {
                tracing::debug!(area = %area, table = %table, "composing descriptor-informed request");
                let descriptor_stream = ResponseStream::with_cancel(
                    self.transport.clone(),
                    Exchange::get(url.clone()),
                    cancel.clone(),
                );
                DescribedTableStream {
                    phase: Phase::Descriptor {
                        descriptor_stream,
                        transport: self.transport,
                        address: url,
                        configure: Box::new(configure),
                    },
                    cancel,
                }
            }
            Err(error) => DescribedTableStream {
                phase: Phase::Failed { error },
                cancel,
            },
        }
    }
}

/// Extracts the (area, table) codes from a data request address: its last
/// two non-empty path segments. The descriptor lives at the same address,
/// so derivation doubles as validation of the request shape.
fn derive_descriptor_address(url: &Url) -> Result<(String, String), StatisticsError> {
    let mut segments: Vec<&str> = url
        .path_segments()
        .map(|parts| parts.filter(|segment| !segment.is_empty()).collect())
        .unwrap_or_default();

    let table = segments.pop().ok_or(StatisticsError::BadRequestShape)?;
    let area = segments.pop().ok_or(StatisticsError::BadRequestShape)?;
    Ok((area.to_string(), table.to_string()))
}

/// The two-phase composer's state machine.
enum Phase {
    /// Phase 1: the descriptor exchange. Holds everything needed to build
    /// phase 2 once the descriptor arrives.
    Descriptor {
        descriptor_stream: ResponseStream<TableDescriptor>,
        transport: Arc<dyn Transport>,
        address: Url,
        configure: ConfigureFn,
    },
    /// Phase 2: the data exchange.
    Data {
        data_stream: ResponseStream<Table>,
    },
    /// A pre-armed failure, delivered on first demand without any exchange.
    Failed { error: StatisticsError },
    /// Terminal: the single item has been delivered, or cancellation won.
    Terminal,
}

/// # Described Table Stream
///
/// The two-phase composed stream: descriptor fetch, then a
/// descriptor-informed data fetch, exposed to the consumer as one logical
/// stream with a single terminal outcome. Both phases share one cancellation
/// flag, so cancelling this stream tears down whichever exchange is in
/// flight and prevents the data exchange from starting if the descriptor
/// phase has not completed yet.
pub struct DescribedTableStream {
    phase: Phase,
    cancel: Arc<CancelState>,
}

impl DescribedTableStream {
    /// Returns a cancellation handle for the composed stream.
    pub fn subscription(&self) -> Subscription {
        Subscription::new(self.cancel.clone())
    }
}

impl Stream for DescribedTableStream {
    type Item = Result<Table, StatisticsError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        this.cancel.register(cx.waker());
        if this.cancel.is_cancelled() {
            // Dropping the phase drops whichever inner stream exists; a
            // descriptor in flight is aborted and the data exchange is
            // never created.
            this.phase = Phase::Terminal;
            return Poll::Ready(None);
        }

        loop {
            match std::mem::replace(&mut this.phase, Phase::Terminal) {
                Phase::Descriptor {
                    mut descriptor_stream,
                    transport,
                    address,
                    configure,
                } => match descriptor_stream.poll_next_unpin(cx) {
                    Poll::Ready(Some(Ok(descriptor))) => {
                        // Phase 1 is fully consumed; only now is the data
                        // request assembled and issued.
                        let mut builder = TableRequestBuilder::new();
                        configure(&mut builder, &descriptor);
                        match builder.build() {
                            Ok(body) => {
                                let data_stream = ResponseStream::with_cancel(
                                    transport,
                                    Exchange::post(address, Some(body)),
                                    this.cancel.clone(),
                                );
                                this.phase = Phase::Data { data_stream };
                            }
                            Err(error) => {
                                return Poll::Ready(Some(Err(StatisticsError::Encode(error))));
                            }
                        }
                    }
                    Poll::Ready(Some(Err(error))) => {
                        // The descriptor failed; the data exchange is never
                        // issued and the composed stream terminates.
                        return Poll::Ready(Some(Err(error)));
                    }
                    Poll::Ready(None) => {
                        return Poll::Ready(None);
                    }
                    Poll::Pending => {
                        this.phase = Phase::Descriptor {
                            descriptor_stream,
                            transport,
                            address,
                            configure,
                        };
                        return Poll::Pending;
                    }
                },
                Phase::Data { mut data_stream } => {
                    let poll = data_stream.poll_next_unpin(cx);
                    this.phase = Phase::Data { data_stream };
                    return poll;
                }
                Phase::Failed { error } => {
                    return Poll::Ready(Some(Err(error)));
                }
                Phase::Terminal => {
                    return Poll::Ready(None);
                }
            }
        }
    }
}
