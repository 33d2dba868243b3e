//! Notification bus: fans the latest value of a collection out to every
//! UI surface that registered interest.
//!
//! Contract: handlers run synchronously, in registration order, each with
//! the same value. Re-subscribing adds a second delivery. A failing handler
//! is reported to the log and never stops the remaining handlers — by the
//! time a publication happens the originating mutation has already
//! succeeded against the backend.

use log::warn;
use thiserror::Error;

use crate::model::{Grade, Period, Selection, Subject};

/// A subscriber fault during publication. Isolated per handler; never
/// surfaced to the publisher.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct HandlerError(pub String);

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

type Handler<T> = Box<dyn FnMut(&T) -> Result<(), HandlerError>>;

/// One named broadcast topic with its subscriber list.
pub struct Channel<T> {
    name: &'static str,
    handlers: Vec<Handler<T>>,
}

impl<T> Channel<T> {
    fn new(name: &'static str) -> Self {
        Self {
            name,
            handlers: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn subscribe<F>(&mut self, handler: F)
    where
        F: FnMut(&T) -> Result<(), HandlerError> + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    pub fn publish(&mut self, value: &T) {
        for handler in self.handlers.iter_mut() {
            if let Err(e) = handler(value) {
                warn!(
                    "event=subscriber_failed channel={} status=isolated error={}",
                    self.name, e
                );
            }
        }
    }
}

/// The four channels the store publishes on. Channel names are static;
/// there are no wildcard subscriptions.
pub struct NotificationBus {
    pub periods: Channel<Vec<Period>>,
    pub subjects: Channel<Vec<Subject>>,
    pub grades: Channel<Vec<Grade>>,
    pub selection: Channel<Selection>,
}

impl NotificationBus {
    pub fn new() -> Self {
        Self {
            periods: Channel::new("periods"),
            subjects: Channel::new("subjects"),
            grades: Channel::new("grades"),
            selection: Channel::new("selection"),
        }
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new()
    }
}
