use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use embed_connect_core::{FramePort, HiddenFrame, PortError, PostTarget};

use crate::window::PostedMessage;

#[derive(Debug, Clone)]
pub struct FrameRecord {
    pub url: String,
    pub removed: bool,
    pub posted: Vec<PostedMessage>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryFrameAdapter {
    inner: Arc<Mutex<FrameRegistry>>,
}

#[derive(Debug, Default)]
struct FrameRegistry {
    frames: Vec<FrameRecord>,
    mount_failure: Option<String>,
    stall_loading: bool,
}

impl InMemoryFrameAdapter {
    pub fn fail_mounts(&self, reason: impl Into<String>) -> Result<(), PortError> {
        let mut g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("frame lock poisoned: {e}")))?;
        g.mount_failure = Some(reason.into());
        Ok(())
    }

    /// Frames mounted afterwards never report that they finished loading.
    pub fn stall_loading(&self) -> Result<(), PortError> {
        let mut g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("frame lock poisoned: {e}")))?;
        g.stall_loading = true;
        Ok(())
    }

    pub fn frames(&self) -> Result<Vec<FrameRecord>, PortError> {
        let g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("frame lock poisoned: {e}")))?;
        Ok(g.frames.clone())
    }
}

impl FramePort for InMemoryFrameAdapter {
    type Frame = InMemoryFrame;

    fn mount_hidden(&self, url: &str) -> Result<Self::Frame, PortError> {
        let mut g = self
            .inner
            .lock()
            .map_err(|e| PortError::Transport(format!("frame lock poisoned: {e}")))?;
        if let Some(reason) = &g.mount_failure {
            return Err(PortError::Transport(format!("frame mount failed: {reason}")));
        }
        g.frames.push(FrameRecord {
            url: url.to_owned(),
            removed: false,
            posted: Vec::new(),
        });
        Ok(InMemoryFrame {
            index: g.frames.len() - 1,
            stall_loading: g.stall_loading,
            registry: Arc::clone(&self.inner),
        })
    }
}

#[derive(Debug, Clone)]
pub struct InMemoryFrame {
    index: usize,
    stall_loading: bool,
    registry: Arc<Mutex<FrameRegistry>>,
}

impl PostTarget for InMemoryFrame {
    fn post(&self, message: &Value, target_origin: &str) -> Result<(), PortError> {
        let mut g = self
            .registry
            .lock()
            .map_err(|e| PortError::Transport(format!("frame lock poisoned: {e}")))?;
        let record = g
            .frames
            .get_mut(self.index)
            .ok_or_else(|| PortError::NotFound(format!("frame missing: {}", self.index)))?;
        if record.removed {
            return Err(PortError::Transport("frame was removed".to_owned()));
        }
        record.posted.push(PostedMessage {
            message: message.clone(),
            target_origin: target_origin.to_owned(),
        });
        Ok(())
    }
}

#[async_trait(?Send)]
impl HiddenFrame for InMemoryFrame {
    async fn loaded(&self) -> Result<(), PortError> {
        if self.stall_loading {
            futures::future::pending::<()>().await;
        }
        Ok(())
    }

    fn remove(&self) -> Result<(), PortError> {
        let mut g = self
            .registry
            .lock()
            .map_err(|e| PortError::Transport(format!("frame lock poisoned: {e}")))?;
        let record = g
            .frames
            .get_mut(self.index)
            .ok_or_else(|| PortError::NotFound(format!("frame missing: {}", self.index)))?;
        record.removed = true;
        Ok(())
    }
}

#[cfg(target_arch = "wasm32")]
pub use browser::{BrowserFrame, BrowserFrameAdapter};

#[cfg(target_arch = "wasm32")]
mod browser {
    use std::cell::RefCell;
    use std::rc::Rc;

    use async_trait::async_trait;
    use futures::channel::oneshot;
    use serde_json::Value;
    use wasm_bindgen::closure::Closure;
    use wasm_bindgen::JsCast;

    use embed_connect_core::{FramePort, HiddenFrame, PortError, PostTarget};

    use crate::EmbedAdapterConfig;

    const HIDDEN_FRAME_STYLE: &[(&str, &str)] = &[
        ("display", "none"),
        ("position", "fixed"),
        ("top", "0"),
        ("right", "0"),
        ("width", "100%"),
        ("height", "100%"),
        ("border", "none"),
        ("border-radius", "0"),
        ("z-index", "999"),
    ];

    /// Hidden iframes appended to the document body.
    #[derive(Debug, Clone)]
    pub struct BrowserFrameAdapter {
        config: EmbedAdapterConfig,
    }

    impl BrowserFrameAdapter {
        pub fn new(config: EmbedAdapterConfig) -> Self {
            Self { config }
        }
    }

    impl Default for BrowserFrameAdapter {
        fn default() -> Self {
            Self::new(EmbedAdapterConfig::from_env())
        }
    }

    impl FramePort for BrowserFrameAdapter {
        type Frame = BrowserFrame;

        fn mount_hidden(&self, url: &str) -> Result<Self::Frame, PortError> {
            let document = web_sys::window()
                .and_then(|w| w.document())
                .ok_or_else(|| PortError::Transport("missing document".to_owned()))?;
            let body = document
                .body()
                .ok_or_else(|| PortError::Transport("missing document body".to_owned()))?;

            let element = document
                .create_element("iframe")
                .map_err(|e| PortError::Transport(format!("create iframe failed: {e:?}")))?
                .dyn_into::<web_sys::HtmlIFrameElement>()
                .map_err(|_| PortError::Transport("created element is not an iframe".to_owned()))?;
            element.set_id(&self.config.frame_element_id);
            element.set_class_name(&self.config.frame_class_name);
            element.set_src(url);
            let style = element.style();
            for (name, value) in HIDDEN_FRAME_STYLE {
                style
                    .set_property(name, value)
                    .map_err(|e| PortError::Transport(format!("set iframe style failed: {e:?}")))?;
            }

            let (load_tx, load_rx) = oneshot::channel::<()>();
            let load_tx = Rc::new(RefCell::new(Some(load_tx)));
            let on_load = Closure::<dyn FnMut(web_sys::Event)>::new(move |_event: web_sys::Event| {
                if let Some(tx) = load_tx.borrow_mut().take() {
                    let _ = tx.send(());
                }
            });
            element
                .add_event_listener_with_callback("load", on_load.as_ref().unchecked_ref())
                .map_err(|e| PortError::Transport(format!("register iframe load failed: {e:?}")))?;

            body.append_child(&element)
                .map_err(|e| PortError::Transport(format!("append iframe failed: {e:?}")))?;

            Ok(BrowserFrame {
                element,
                on_load,
                load_rx: RefCell::new(Some(load_rx)),
            })
        }
    }

    #[derive(Debug)]
    pub struct BrowserFrame {
        element: web_sys::HtmlIFrameElement,
        on_load: Closure<dyn FnMut(web_sys::Event)>,
        load_rx: RefCell<Option<oneshot::Receiver<()>>>,
    }

    impl PostTarget for BrowserFrame {
        fn post(&self, message: &Value, target_origin: &str) -> Result<(), PortError> {
            let window = self
                .element
                .content_window()
                .ok_or_else(|| PortError::Transport("iframe has no content window".to_owned()))?;
            let js = crate::bridge::to_js_value(message)?;
            window
                .post_message(&js, target_origin)
                .map_err(|e| PortError::Transport(format!("postMessage failed: {e:?}")))
        }
    }

    #[async_trait(?Send)]
    impl HiddenFrame for BrowserFrame {
        async fn loaded(&self) -> Result<(), PortError> {
            let pending = self.load_rx.borrow_mut().take();
            match pending {
                Some(rx) => rx
                    .await
                    .map_err(|_| PortError::Transport("iframe load listener dropped".to_owned())),
                None => Ok(()),
            }
        }

        fn remove(&self) -> Result<(), PortError> {
            self.element
                .remove_event_listener_with_callback("load", self.on_load.as_ref().unchecked_ref())
                .map_err(|e| PortError::Transport(format!("unregister iframe load failed: {e:?}")))?;
            self.element.remove();
            Ok(())
        }
    }
}
