//! Fan-out of inbound cross-window messages to per-operation listeners.
//!
//! A platform bridge feeds every message it observes into [`MessageHub::dispatch`].
//! Each in-flight operation holds its own [`Listener`]; dropping it removes the
//! subscription, so no exit path can leave a stale handler behind.

use std::collections::HashMap;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};

use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::Stream;
use serde_json::Value;

use crate::ports::PortError;

#[derive(Debug, Clone, PartialEq)]
pub struct InboundMessage {
    pub origin: String,
    pub data: Value,
}

impl InboundMessage {
    pub fn new(origin: impl Into<String>, data: Value) -> Self {
        Self {
            origin: origin.into(),
            data,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MessageHub {
    inner: Arc<Mutex<HubState>>,
}

#[derive(Debug, Default)]
struct HubState {
    next_id: u64,
    listeners: HashMap<u64, UnboundedSender<InboundMessage>>,
}

impl MessageHub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listen(&self) -> Result<Listener, PortError> {
        let mut g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("hub lock poisoned: {e}")))?;
        g.next_id = g.next_id.saturating_add(1);
        let id = g.next_id;
        let (sender, receiver) = unbounded();
        g.listeners.insert(id, sender);
        Ok(Listener {
            id,
            hub: self.clone(),
            receiver,
        })
    }

    /// Delivers `message` to every live listener and returns how many received it.
    pub fn dispatch(&self, message: InboundMessage) -> Result<usize, PortError> {
        let mut g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("hub lock poisoned: {e}")))?;
        g.listeners
            .retain(|_, sender| sender.unbounded_send(message.clone()).is_ok());
        Ok(g.listeners.len())
    }

    pub fn listener_count(&self) -> Result<usize, PortError> {
        let g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("hub lock poisoned: {e}")))?;
        Ok(g.listeners.len())
    }

    fn unsubscribe(&self, id: u64) {
        if let Ok(mut g) = self.inner.lock() {
            g.listeners.remove(&id);
        }
    }
}

#[derive(Debug)]
pub struct Listener {
    id: u64,
    hub: MessageHub,
    receiver: UnboundedReceiver<InboundMessage>,
}

impl Stream for Listener {
    type Item = InboundMessage;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.receiver).poll_next(cx)
    }
}

impl Drop for Listener {
    fn drop(&mut self) {
        self.hub.unsubscribe(self.id);
    }
}
