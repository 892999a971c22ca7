use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::domain::{AppMetadata, Chain, SiteMetadata};

#[derive(Debug, Error)]
pub enum PortError {
    #[error("port not implemented: {0}")]
    NotImplemented(&'static str),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("validation error: {0}")]
    Validation(String),
    #[error("not found: {0}")]
    NotFound(String),
}

/// Anything an envelope can be posted to: a popup window or a hidden frame.
pub trait PostTarget {
    fn post(&self, message: &Value, target_origin: &str) -> Result<(), PortError>;
}

/// A live secondary browsing context hosting the remote page.
pub trait WindowChannel: PostTarget {
    fn is_open(&self) -> bool;
    fn close(&self);
}

pub trait WindowPort {
    type Channel: WindowChannel;

    fn open(&self, url: &str) -> Result<Self::Channel, PortError>;
}

#[async_trait(?Send)]
pub trait HiddenFrame: PostTarget {
    /// Resolves once the frame has finished loading its document.
    async fn loaded(&self) -> Result<(), PortError>;
    fn remove(&self) -> Result<(), PortError>;
}

pub trait FramePort {
    type Frame: HiddenFrame;

    fn mount_hidden(&self, url: &str) -> Result<Self::Frame, PortError>;
}

#[async_trait(?Send)]
pub trait SiteMetadataPort {
    async fn build(&self, app: &AppMetadata) -> Result<SiteMetadata, PortError>;
}

pub trait StoragePort {
    fn store_account(&self, account: &str, chain: &Chain) -> Result<(), PortError>;
    fn clear(&self) -> Result<(), PortError>;
}

#[async_trait(?Send)]
pub trait TimerPort {
    async fn sleep(&self, duration: Duration);
}
