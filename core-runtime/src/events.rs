//! # Event Bus System
//!
//! Typed broadcast channel used to fan core events out to observers beyond the
//! primary UI callback (analytics, host-side logging, test probes).
//!
//! ## Overview
//!
//! The event bus system consists of:
//! - **[`CoreEvent`]**: trait implemented by every event type that travels on a bus
//! - **[`EventBus`]**: broadcast sender for one event type
//! - **[`EventStream`]**: receiver wrapper with optional filtering
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::events::EventBus;
//! use core_webview::LoadStatus;
//!
//! let bus: EventBus<LoadStatus> = EventBus::new(32);
//! let mut stream = bus.subscribe();
//!
//! bus.emit(LoadStatus::finished()).ok();
//! assert_eq!(stream.try_recv().unwrap(), LoadStatus::finished());
//! ```
//!
//! ## Error Handling
//!
//! The bus uses `tokio::sync::broadcast`, which can produce two kinds of
//! receive errors:
//!
//! - **`RecvError::Lagged(n)`**: the subscriber fell behind and missed `n`
//!   events. Non-fatal; newer events are still delivered.
//! - **`RecvError::Closed`**: every sender was dropped.
//!
//! `emit` fails only when nobody is subscribed. Publishers that treat the bus
//! as optional should ignore that error.

use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::broadcast;

pub use tokio::sync::broadcast::error::{RecvError, SendError};
pub use tokio::sync::broadcast::Receiver;

/// Default buffer size for an event bus channel.
pub const DEFAULT_EVENT_BUFFER_SIZE: usize = 32;

/// Event severity levels for filtering and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventSeverity {
    /// Debug-level events (verbose)
    Debug,
    /// Informational events
    Info,
    /// Warning events
    Warning,
    /// Error events
    Error,
}

/// An event that can be published on an [`EventBus`].
pub trait CoreEvent: Clone + Send + 'static {
    /// Short human-readable description of the event.
    fn description(&self) -> &str;

    /// Severity used for filtering and log levels.
    fn severity(&self) -> EventSeverity;
}

// ============================================================================
// Event Bus
// ============================================================================

/// Broadcast channel for one event type.
///
/// Uses `tokio::sync::broadcast` internally: cloning the bus yields another
/// producer, each `subscribe()` yields an independent receiver, and sends
/// never block. Sending does not require a Tokio runtime.
pub struct EventBus<E: CoreEvent> {
    sender: broadcast::Sender<E>,
}

impl<E: CoreEvent> EventBus<E> {
    /// Creates a new event bus with the specified buffer size.
    ///
    /// A subscriber that falls behind by more than `capacity` events receives
    /// `RecvError::Lagged`.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0; [`ShellConfig`](crate::config::ShellConfig)
    /// validation rejects that value.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publishes an event to all subscribers.
    ///
    /// Returns the number of subscribers that received the event, or an error
    /// if there are no active subscribers.
    pub fn emit(&self, event: E) -> Result<usize, SendError<E>> {
        self.sender.send(event)
    }

    /// Creates a new subscriber. Past events are not replayed.
    pub fn subscribe(&self) -> Receiver<E> {
        self.sender.subscribe()
    }

    /// Returns the number of active subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl<E: CoreEvent> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            sender: self.sender.clone(),
        }
    }
}

impl<E: CoreEvent> Default for EventBus<E> {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_BUFFER_SIZE)
    }
}

impl<E: CoreEvent> fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

// ============================================================================
// Event Stream Wrapper
// ============================================================================

type EventFilter<E> = Box<dyn Fn(&E) -> bool + Send + Sync>;

/// A wrapper around `broadcast::Receiver` with optional filtering.
///
/// ```ignore
/// let errors_only = EventStream::new(bus.subscribe())
///     .filter(|status: &LoadStatus| status.has_error());
/// ```
pub struct EventStream<E: CoreEvent> {
    receiver: Receiver<E>,
    filter: Option<EventFilter<E>>,
}

impl<E: CoreEvent> EventStream<E> {
    pub fn new(receiver: Receiver<E>) -> Self {
        Self {
            receiver,
            filter: None,
        }
    }

    /// Only events matching `predicate` will be returned.
    pub fn filter<F>(mut self, predicate: F) -> Self
    where
        F: Fn(&E) -> bool + Send + Sync + 'static,
    {
        self.filter = Some(Box::new(predicate));
        self
    }

    /// Only events at or above `min` severity will be returned.
    pub fn min_severity(self, min: EventSeverity) -> Self {
        self.filter(move |event| event.severity() >= min)
    }

    fn accepts(&self, event: &E) -> bool {
        self.filter.as_ref().map_or(true, |filter| filter(event))
    }

    /// Receives the next event that passes the filter.
    ///
    /// # Errors
    ///
    /// Returns `RecvError::Lagged(n)` if the subscriber fell behind by `n` events.
    /// Returns `RecvError::Closed` if all senders have been dropped.
    pub async fn recv(&mut self) -> Result<E, RecvError> {
        loop {
            let event = self.receiver.recv().await?;
            if self.accepts(&event) {
                return Ok(event);
            }
        }
    }

    /// Attempts to receive an event without waiting.
    ///
    /// Returns `None` if no matching event is currently available.
    pub fn try_recv(&mut self) -> Option<Result<E, RecvError>> {
        loop {
            match self.receiver.try_recv() {
                Ok(event) => {
                    if self.accepts(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(broadcast::error::TryRecvError::Empty) => return None,
                Err(broadcast::error::TryRecvError::Lagged(n)) => {
                    return Some(Err(RecvError::Lagged(n)))
                }
                Err(broadcast::error::TryRecvError::Closed) => return Some(Err(RecvError::Closed)),
            }
        }
    }
}

impl<E: CoreEvent> fmt::Debug for EventStream<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventStream")
            .field("has_filter", &self.filter.is_some())
            .finish()
    }
}
