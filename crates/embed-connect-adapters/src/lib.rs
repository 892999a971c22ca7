#[cfg(target_arch = "wasm32")]
pub mod bridge;
pub mod config;
pub mod frame;
pub mod metadata;
pub mod storage;
pub mod timer;
pub mod window;

pub use config::EmbedAdapterConfig;
pub use frame::{FrameRecord, InMemoryFrame, InMemoryFrameAdapter};
pub use metadata::StaticSiteMetadataAdapter;
pub use storage::InMemoryStorageAdapter;
pub use window::{InMemoryWindow, InMemoryWindowAdapter, PostedMessage, WindowRecord};

#[cfg(not(target_arch = "wasm32"))]
pub use timer::TokioTimerAdapter;

#[cfg(target_arch = "wasm32")]
pub use bridge::MessageBridge;
#[cfg(target_arch = "wasm32")]
pub use frame::{BrowserFrame, BrowserFrameAdapter};
#[cfg(target_arch = "wasm32")]
pub use metadata::BrowserSiteMetadataAdapter;
#[cfg(target_arch = "wasm32")]
pub use storage::BrowserStorageAdapter;
#[cfg(target_arch = "wasm32")]
pub use timer::BrowserTimerAdapter;
#[cfg(target_arch = "wasm32")]
pub use window::{BrowserWindow, BrowserWindowAdapter};
