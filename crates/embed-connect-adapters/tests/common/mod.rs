#![allow(dead_code)]

use std::time::Duration;

use serde_json::{json, Value};

use embed_connect_adapters::{
    InMemoryFrameAdapter, InMemoryStorageAdapter, InMemoryWindowAdapter,
    StaticSiteMetadataAdapter, TokioTimerAdapter,
};
use embed_connect_core::{AppMetadata, Chain, EmbedClient, EmbedConfig, InboundMessage};

pub const TRUSTED_ORIGIN: &str = "https://staging.crossmint.com";
pub const UNTRUSTED_ORIGIN: &str = "https://crossmint.evil.example";

pub type TestClient = EmbedClient<
    InMemoryWindowAdapter,
    InMemoryFrameAdapter,
    StaticSiteMetadataAdapter,
    InMemoryStorageAdapter,
    TokioTimerAdapter,
>;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn config(chain: Chain) -> EmbedConfig {
    EmbedConfig::new(
        TRUSTED_ORIGIN,
        chain,
        "sk_test_embed",
        "0.3.1",
        AppMetadata {
            name: Some("Test Gallery".to_owned()),
            url: Some("https://gallery.example".to_owned()),
            ..AppMetadata::default()
        },
    )
}

pub fn new_client(config: EmbedConfig) -> TestClient {
    init_tracing();
    EmbedClient::init(
        config,
        InMemoryWindowAdapter::default(),
        InMemoryFrameAdapter::default(),
        StaticSiteMetadataAdapter::default(),
        InMemoryStorageAdapter::default(),
        TokioTimerAdapter,
    )
}

pub async fn after_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
}

pub fn deliver(client: &TestClient, origin: &str, data: Value) {
    client
        .hub
        .dispatch(InboundMessage::new(origin, data))
        .expect("dispatch inbound message");
}

pub fn accounts_granted(account: &str) -> Value {
    json!({ "request": "crossmint_requestAccounts", "data": { "account": account } })
}

pub fn message_signed(signed: &str) -> Value {
    json!({ "request": "crossmint_signMessage", "data": { "signedMessage": signed } })
}

pub fn user_reject() -> Value {
    json!({ "request": "crossmint_userReject", "data": {} })
}

pub fn posted_count(client: &TestClient, window: usize) -> usize {
    client.windows.windows().expect("windows")[window].posted.len()
}
