//! # Single-Exchange Stream Engine
//!
//! [`ResponseStream`] wraps exactly one HTTP exchange in a lazy,
//! single-outcome, cancellable stream. Its life is a small state machine:
//!
//! ```text
//! Idle ──first poll──▶ AwaitingUpstream ──▶ Completed (value or error)
//!   │                        │
//!   └────── cancel ──────────┴──▶ Cancelled
//! ```
//!
//! - **Idle**: constructed, nothing issued. Dropping the stream here costs
//!   nothing.
//! - **AwaitingUpstream**: the consumer expressed demand; the exchange is in
//!   flight. The validator and the decoding stage run inside this phase's
//!   future, so a status rejection or a shape mismatch surfaces exactly like
//!   a transport fault: as the stream's terminal error.
//! - **Completed**: the single item has been delivered; every further poll
//!   ends the stream.
//! - **Cancelled**: the consumer is detached, the in-flight future dropped.
//!   Nothing is delivered afterwards, ever.

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unused_qualifications)]

use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll, Waker};

use futures_util::future::BoxFuture;
use futures_util::{FutureExt, Stream};
use serde::de::DeserializeOwned;

use crate::client::transport::{validate, Exchange, Transport};
use crate::errors::StatisticsError;

/// Shared cancellation flag plus the waker of the consumer to notify when it
/// flips. One instance is shared between a stream and its subscriptions; the
/// two-phase composer also shares it with both of its inner streams.
#[derive(Debug, Default)]
pub(crate) struct CancelState {
    /// Set exactly once; never cleared.
    cancelled: AtomicBool,
    /// The most recent consumer waker, woken on cancellation so the stream
    /// gets a chance to tear its exchange down promptly.
    waker: Mutex<Option<Waker>>,
}

impl CancelState {
    /// Flips the flag and wakes the consumer. Idempotent. The waker slot
    /// holds no invariant a panic could break, so a poisoned lock is
    /// recovered rather than skipping the wake.
    pub(crate) fn cancel(&self) {
        if !self.cancelled.swap(true, Ordering::SeqCst) {
            let mut slot = self.waker.lock().unwrap_or_else(PoisonError::into_inner);
            if let Some(waker) = slot.take() {
                waker.wake();
            }
        }
    }

    /// Whether cancellation has been requested.
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    /// Remembers the consumer's waker for the next cancellation.
    pub(crate) fn register(&self, waker: &Waker) {
        let mut slot = self.waker.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(waker.clone());
    }
}

/// # Subscription
///
/// The cancellation handle returned by [`ResponseStream::subscription`] (and
/// by the two-phase composer). Cancelling detaches the consumer and aborts
/// or abandons the underlying exchange; once a stream has reached a terminal
/// state, cancelling is a no-op.
#[derive(Debug, Clone)]
pub struct Subscription {
    state: Arc<CancelState>,
}

impl Subscription {
    pub(crate) fn new(state: Arc<CancelState>) -> Self {
        Self { state }
    }

    /// Requests cancellation. Idempotent; may race with an in-flight
    /// completion, in which case whichever lands first wins.
    pub fn cancel(&self) {
        self.state.cancel();
    }

    /// Whether cancellation has been requested on this handle's stream.
    pub fn is_cancelled(&self) -> bool {
        self.state.is_cancelled()
    }
}

/// The state machine behind a [`ResponseStream`].
enum EngineState<T> {
    /// Constructed but not yet demanded; holds everything needed to issue
    /// the exchange later.
    Idle {
        transport: Arc<dyn Transport>,
        exchange: Exchange,
    },
    /// The exchange is in flight; validation and decoding happen inside the
    /// future.
    AwaitingUpstream {
        future: BoxFuture<'static, Result<T, StatisticsError>>,
    },
    /// A pre-armed failure (bad address, unserializable body). Delivered on
    /// first demand without issuing any exchange.
    Failed { error: StatisticsError },
    /// Terminal: the single item has been delivered.
    Completed,
    /// Terminal: the consumer cancelled; nothing is delivered anymore.
    Cancelled,
}

/// # Response Stream
///
/// A lazy producer of exactly one `Result<T, StatisticsError>` item wrapping
/// one HTTP exchange. See the module documentation for the state machine and
/// the delivery contract.
pub struct ResponseStream<T> {
    state: EngineState<T>,
    cancel: Arc<CancelState>,
}

impl<T> ResponseStream<T>
where
    T: DeserializeOwned + Send + 'static,
{
    /// Creates a stream that will issue `exchange` over `transport` on first
    /// demand.
    pub(crate) fn new(transport: Arc<dyn Transport>, exchange: Exchange) -> Self {
        Self {
            state: EngineState::Idle {
                transport,
                exchange,
            },
            cancel: Arc::new(CancelState::default()),
        }
    }

    /// Like [`ResponseStream::new`], but sharing a cancellation flag with an
    /// enclosing composed stream.
    pub(crate) fn with_cancel(
        transport: Arc<dyn Transport>,
        exchange: Exchange,
        cancel: Arc<CancelState>,
    ) -> Self {
        Self {
            state: EngineState::Idle {
                transport,
                exchange,
            },
            cancel,
        }
    }

    /// Creates a stream that fails with `error` on first demand, without any
    /// network activity.
    pub(crate) fn failed(error: StatisticsError) -> Self {
        Self {
            state: EngineState::Failed { error },
            cancel: Arc::new(CancelState::default()),
        }
    }

    /// Returns a cancellation handle for this stream.
    pub fn subscription(&self) -> Subscription {
        Subscription::new(self.cancel.clone())
    }
}

/// Builds the in-flight future: send, validate the status, decode the body.
/// All three failure sources funnel into the same terminal error type.
fn issue<T>(
    transport: Arc<dyn Transport>,
    exchange: Exchange,
) -> BoxFuture<'static, Result<T, StatisticsError>>
where
    T: DeserializeOwned + Send + 'static,
{
    let send = transport.send(exchange);
    Box::pin(async move {
        let raw = send.await.map_err(StatisticsError::Transport)?;
        let payload = validate(raw)?;
        serde_json::from_slice(&payload).map_err(StatisticsError::Decode)
    })
}

impl<T> Stream for ResponseStream<T>
where
    T: DeserializeOwned + Send + 'static,
{
    type Item = Result<T, StatisticsError>;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();

        // Keep the waker fresh so an out-of-band cancel can wake us, then
        // honor cancellation before anything else. Replacing the state drops
        // the in-flight future, which aborts the exchange.
        this.cancel.register(cx.waker());
        if this.cancel.is_cancelled() {
            this.state = EngineState::Cancelled;
            return Poll::Ready(None);
        }

        loop {
            match std::mem::replace(&mut this.state, EngineState::Completed) {
                EngineState::Idle {
                    transport,
                    exchange,
                } => {
                    // First demand: this is the single point where network
                    // activity begins.
                    tracing::debug!(method = %exchange.method, url = %exchange.url, "demand received, issuing exchange");
                    this.state = EngineState::AwaitingUpstream {
                        future: issue(transport, exchange),
                    };
                }
                EngineState::AwaitingUpstream { mut future } => match future.poll_unpin(cx) {
                    Poll::Ready(outcome) => {
                        if let Err(error) = &outcome {
                            tracing::warn!(error = %error, "exchange terminated with error");
                        }
                        // State is already Completed; the next poll ends the
                        // stream, so the item is followed by completion.
                        return Poll::Ready(Some(outcome));
                    }
                    Poll::Pending => {
                        this.state = EngineState::AwaitingUpstream { future };
                        return Poll::Pending;
                    }
                },
                EngineState::Failed { error } => {
                    return Poll::Ready(Some(Err(error)));
                }
                EngineState::Completed => {
                    return Poll::Ready(None);
                }
                EngineState::Cancelled => {
                    this.state = EngineState::Cancelled;
                    return Poll::Ready(None);
                }
            }
        }
    }
}
