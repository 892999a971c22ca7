//! Envelope framing between the host page and the remote frame.
//!
//! Outbound envelopes always carry the fixed context fields (library version,
//! chain, api key and site metadata) merged with the operation's own fields.
//! Inbound envelopes are parsed leniently and classified by [`dispatch`]; any
//! shape that does not match a known terminal response is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Chain, EmbedConfig, RequestTag, SiteMetadata};
use crate::ports::PortError;

pub const WILDCARD_ORIGIN: &str = "*";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OperationData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Vec<u8>>,
}

impl OperationData {
    pub fn sign(message: &[u8]) -> Self {
        Self {
            message: Some(message.to_vec()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestFields {
    pub lib_version: String,
    pub chain: Chain,
    pub api_key: String,
    pub site_metadata: SiteMetadata,
    #[serde(flatten)]
    pub operation: OperationData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestEnvelope {
    pub request: RequestTag,
    pub data: RequestFields,
}

impl RequestEnvelope {
    pub fn new(
        request: RequestTag,
        config: &EmbedConfig,
        site_metadata: SiteMetadata,
        operation: OperationData,
    ) -> Self {
        Self {
            request,
            data: RequestFields {
                lib_version: config.lib_version.clone(),
                chain: config.chain.clone(),
                api_key: config.api_key.clone(),
                site_metadata,
                operation,
            },
        }
    }

    pub fn to_value(&self) -> Result<Value, PortError> {
        serde_json::to_value(self)
            .map_err(|e| PortError::Validation(format!("envelope serialization failed: {e}")))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResponseEnvelope {
    pub request: String,
    #[serde(default)]
    pub data: Value,
}

impl ResponseEnvelope {
    pub fn tag(&self) -> Option<RequestTag> {
        RequestTag::from_wire(&self.request)
    }
}

pub fn parse_response(raw: &Value) -> Option<ResponseEnvelope> {
    ResponseEnvelope::deserialize(raw).ok()
}

/// What a single inbound envelope means for the operation listening to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict<T> {
    Granted(T),
    UserRejected,
    /// A terminal response whose payload could not be decoded. Still ends
    /// the operation, without a value.
    Malformed,
    Ignore,
}

pub fn dispatch<T>(
    envelope: &ResponseEnvelope,
    success: RequestTag,
    decode: impl FnOnce(&Value) -> Option<T>,
) -> Verdict<T> {
    match envelope.tag() {
        Some(RequestTag::UserReject) => Verdict::UserRejected,
        Some(tag) if tag == success => match decode(&envelope.data) {
            Some(value) => Verdict::Granted(value),
            None => {
                tracing::warn!(request = %envelope.request, "terminal response with undecodable payload");
                Verdict::Malformed
            }
        },
        _ => Verdict::Ignore,
    }
}

pub fn dispatch_accounts(envelope: &ResponseEnvelope) -> Verdict<String> {
    dispatch(envelope, RequestTag::RequestAccounts, decode_account)
}

pub fn dispatch_signature(envelope: &ResponseEnvelope, chain: &Chain) -> Verdict<Vec<u8>> {
    dispatch(envelope, RequestTag::SignMessage, |data| {
        decode_signed_message(data, chain)
    })
}

pub fn decode_account(data: &Value) -> Option<String> {
    data.get("account")?.as_str().map(str::to_owned)
}

pub fn decode_signed_message(data: &Value, chain: &Chain) -> Option<Vec<u8>> {
    let raw = data.get("signedMessage")?.as_str()?;
    chain.decode_signature(raw)
}
