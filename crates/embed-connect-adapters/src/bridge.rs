//! Feeds the page's `message` events into a [`MessageHub`].
//!
//! Exactly one bridge is attached per hub. Operations never touch the DOM
//! listener directly; they subscribe to the hub and drop their `Listener`.

use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};

use embed_connect_core::{InboundMessage, MessageHub, PortError};

#[derive(Debug)]
pub struct MessageBridge {
    window: web_sys::Window,
    on_message: Closure<dyn FnMut(web_sys::MessageEvent)>,
}

impl MessageBridge {
    pub fn attach(hub: MessageHub) -> Result<Self, PortError> {
        let window =
            web_sys::window().ok_or_else(|| PortError::Transport("missing window".to_owned()))?;

        let on_message =
            Closure::<dyn FnMut(web_sys::MessageEvent)>::new(move |event: web_sys::MessageEvent| {
                let data = match from_js_value(event.data()) {
                    Ok(data) => data,
                    Err(e) => {
                        tracing::debug!(origin = %event.origin(), error = %e, "dropping undecodable message");
                        return;
                    }
                };
                if let Err(e) = hub.dispatch(InboundMessage::new(event.origin(), data)) {
                    tracing::warn!(error = %e, "failed to dispatch inbound message");
                }
            });

        window
            .add_event_listener_with_callback("message", on_message.as_ref().unchecked_ref())
            .map_err(|e| PortError::Transport(format!("register message listener failed: {e:?}")))?;

        Ok(Self { window, on_message })
    }
}

impl Drop for MessageBridge {
    fn drop(&mut self) {
        let _ = self.window.remove_event_listener_with_callback(
            "message",
            self.on_message.as_ref().unchecked_ref(),
        );
    }
}

pub(crate) fn to_js_value(message: &Value) -> Result<JsValue, PortError> {
    message
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| PortError::Validation(format!("failed to encode message: {e}")))
}

pub(crate) fn from_js_value(value: JsValue) -> Result<Value, PortError> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| PortError::Validation(format!("failed to decode message: {e}")))
}
