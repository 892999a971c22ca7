use std::sync::{Arc, Mutex};

use serde_json::Value;

use embed_connect_core::{PortError, PostTarget, WindowChannel, WindowPort};

#[derive(Debug, Clone, PartialEq)]
pub struct PostedMessage {
    pub message: Value,
    pub target_origin: String,
}

#[derive(Debug, Clone)]
pub struct WindowRecord {
    pub url: String,
    pub open: bool,
    pub close_calls: u32,
    pub posted: Vec<PostedMessage>,
}

/// Window port backed by process memory. Each `open` appends a record that
/// tests can inspect or close from the outside, as a user would.
#[derive(Debug, Clone, Default)]
pub struct InMemoryWindowAdapter {
    inner: Arc<Mutex<WindowRegistry>>,
}

#[derive(Debug, Default)]
struct WindowRegistry {
    windows: Vec<WindowRecord>,
    open_failure: Option<String>,
}

impl InMemoryWindowAdapter {
    pub fn fail_opens(&self, reason: impl Into<String>) -> Result<(), PortError> {
        let mut g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("window lock poisoned: {e}")))?;
        g.open_failure = Some(reason.into());
        Ok(())
    }

    pub fn windows(&self) -> Result<Vec<WindowRecord>, PortError> {
        let g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("window lock poisoned: {e}")))?;
        Ok(g.windows.clone())
    }

    /// Closes window `index` without going through the channel.
    pub fn close_externally(&self, index: usize) -> Result<(), PortError> {
        let mut g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("window lock poisoned: {e}")))?;
        let record = g
            .windows
            .get_mut(index)
            .ok_or_else(|| PortError::NotFound(format!("window missing: {index}")))?;
        record.open = false;
        Ok(())
    }
}

impl WindowPort for InMemoryWindowAdapter {
    type Channel = InMemoryWindow;

    fn open(&self, url: &str) -> Result<Self::Channel, PortError> {
        let mut g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("window lock poisoned: {e}")))?;
        if let Some(reason) = &g.open_failure {
            return Err(PortError::Transport(format!("window open blocked: {reason}")));
        }
        g.windows.push(WindowRecord {
            url: url.to_owned(),
            open: true,
            close_calls: 0,
            posted: Vec::new(),
        });
        Ok(InMemoryWindow {
            index: g.windows.len() - 1,
            registry: Arc::clone(&self.inner),
        })
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryWindow {
    index: usize,
    registry: Arc<Mutex<WindowRegistry>>,
}

impl PostTarget for InMemoryWindow {
    fn post(&self, message: &Value, target_origin: &str) -> Result<(), PortError> {
        let mut g = self
            .registry
            .lock()
            .map_err(|e| PortError::Transport(format!("window lock poisoned: {e}")))?;
        let record = g
            .windows
            .get_mut(self.index)
            .ok_or_else(|| PortError::NotFound(format!("window missing: {}", self.index)))?;
        if !record.open {
            return Err(PortError::Transport("window is closed".to_owned()));
        }
        record.posted.push(PostedMessage {
            message: message.clone(),
            target_origin: target_origin.to_owned(),
        });
        Ok(())
    }
}

impl WindowChannel for InMemoryWindow {
    fn is_open(&self) -> bool {
        self.registry
            .lock()
            .ok()
            .and_then(|g| g.windows.get(self.index).map(|w| w.open))
            .unwrap_or(false)
    }

    fn close(&self) {
        if let Ok(mut g) = self.registry.lock() {
            if let Some(record) = g.windows.get_mut(self.index) {
                record.open = false;
                record.close_calls = record.close_calls.saturating_add(1);
            }
        }
    }
}

/// Popup windows opened with `window.open`.
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct BrowserWindowAdapter {
    config: crate::EmbedAdapterConfig,
}

#[cfg(target_arch = "wasm32")]
impl BrowserWindowAdapter {
    pub fn new(config: crate::EmbedAdapterConfig) -> Self {
        Self { config }
    }
}

#[cfg(target_arch = "wasm32")]
impl Default for BrowserWindowAdapter {
    fn default() -> Self {
        Self::new(crate::EmbedAdapterConfig::from_env())
    }
}

#[cfg(target_arch = "wasm32")]
impl WindowPort for BrowserWindowAdapter {
    type Channel = BrowserWindow;

    fn open(&self, url: &str) -> Result<Self::Channel, PortError> {
        let parent =
            web_sys::window().ok_or_else(|| PortError::Transport("missing window".to_owned()))?;
        let child = parent
            .open_with_url_and_target_and_features(
                url,
                &self.config.popup_target,
                &self.config.popup_features,
            )
            .map_err(|e| PortError::Transport(format!("window.open failed: {e:?}")))?
            .ok_or_else(|| PortError::Transport("window.open was blocked".to_owned()))?;
        Ok(BrowserWindow { window: child })
    }
}

#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct BrowserWindow {
    window: web_sys::Window,
}

#[cfg(target_arch = "wasm32")]
impl PostTarget for BrowserWindow {
    fn post(&self, message: &Value, target_origin: &str) -> Result<(), PortError> {
        let js = crate::bridge::to_js_value(message)?;
        self.window
            .post_message(&js, target_origin)
            .map_err(|e| PortError::Transport(format!("postMessage failed: {e:?}")))
    }
}

#[cfg(target_arch = "wasm32")]
impl WindowChannel for BrowserWindow {
    fn is_open(&self) -> bool {
        // reading `closed` on a navigated cross-origin window can throw; treat as gone
        !self.window.closed().unwrap_or(true)
    }

    fn close(&self) {
        let _ = self.window.close();
    }
}
