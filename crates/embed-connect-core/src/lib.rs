pub mod auto_connect;
pub mod client;
pub mod codec;
pub mod domain;
pub mod hub;
pub mod origin;
pub mod ports;
pub mod state_machine;

pub use client::EmbedClient;
pub use codec::{
    OperationData, RequestEnvelope, RequestFields, ResponseEnvelope, Verdict, WILDCARD_ORIGIN,
};
pub use domain::{
    AppMetadata, Chain, EmbedConfig, Outcome, RequestTag, SiteMetadata,
    DEFAULT_MAX_TIME_AUTO_CONNECT_MS, DEFAULT_POLL_INTERVAL_MS,
};
pub use hub::{InboundMessage, Listener, MessageHub};
pub use origin::{is_allowed_origin, ALLOWED_ORIGINS};
pub use ports::{
    FramePort, HiddenFrame, PortError, PostTarget, SiteMetadataPort, StoragePort, TimerPort,
    WindowChannel, WindowPort,
};
pub use state_machine::{poll_transition, PollEvent, PollState, TransitionError};
