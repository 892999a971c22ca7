use serde::{Deserialize, Serialize};

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;
pub const DEFAULT_MAX_TIME_AUTO_CONNECT_MS: u64 = 4_000;

/// Chain the remote wallet operates on. Unknown identifiers are kept verbatim
/// so the remote can still be addressed with them.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Chain {
    Solana,
    Ethereum,
    Polygon,
    Cardano,
    Other(String),
}

impl Chain {
    pub fn as_str(&self) -> &str {
        match self {
            Chain::Solana => "solana",
            Chain::Ethereum => "ethereum",
            Chain::Polygon => "polygon",
            Chain::Cardano => "cardano",
            Chain::Other(raw) => raw,
        }
    }

    /// EVM chains return the signature as text; everything else returns a
    /// comma-separated list of decimal byte values.
    pub fn signs_as_text(&self) -> bool {
        matches!(self, Chain::Ethereum | Chain::Polygon)
    }

    pub fn decode_signature(&self, raw: &str) -> Option<Vec<u8>> {
        if self.signs_as_text() {
            return Some(raw.as_bytes().to_vec());
        }
        // blank entries count as zero, so "" decodes to a single zero byte
        raw.split(',')
            .map(|part| match part.trim() {
                "" => Some(0),
                digits => digits.parse::<u8>().ok(),
            })
            .collect()
    }
}

impl From<String> for Chain {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "solana" => Chain::Solana,
            "ethereum" => Chain::Ethereum,
            "polygon" => Chain::Polygon,
            "cardano" => Chain::Cardano,
            _ => Chain::Other(raw),
        }
    }
}

impl From<&str> for Chain {
    fn from(raw: &str) -> Self {
        Chain::from(raw.to_owned())
    }
}

impl From<Chain> for String {
    fn from(chain: Chain) -> Self {
        chain.as_str().to_owned()
    }
}

impl std::fmt::Display for Chain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Describes the host site to the remote. Built fresh for every outbound
/// envelope by a `SiteMetadataPort`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMetadata {
    pub name: Option<String>,
    pub url: Option<String>,
    pub icon: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbedConfig {
    pub environment: String,
    pub chain: Chain,
    pub api_key: String,
    pub lib_version: String,
    pub app_metadata: AppMetadata,
    pub auto_connect: bool,
    pub max_time_auto_connect_ms: u64,
    pub poll_interval_ms: u64,
}

impl EmbedConfig {
    pub fn new(
        environment: impl Into<String>,
        chain: Chain,
        api_key: impl Into<String>,
        lib_version: impl Into<String>,
        app_metadata: AppMetadata,
    ) -> Self {
        Self {
            environment: environment.into(),
            chain,
            api_key: api_key.into(),
            lib_version: lib_version.into(),
            app_metadata,
            auto_connect: false,
            max_time_auto_connect_ms: DEFAULT_MAX_TIME_AUTO_CONNECT_MS,
            poll_interval_ms: DEFAULT_POLL_INTERVAL_MS,
        }
    }

    pub fn with_auto_connect(mut self, max_time_auto_connect_ms: u64) -> Self {
        self.auto_connect = true;
        self.max_time_auto_connect_ms = max_time_auto_connect_ms;
        self
    }

    pub fn frame_url(&self) -> String {
        format!("{}/frame", self.environment.trim_end_matches('/'))
    }

    pub fn validate(&self) -> Result<(), crate::PortError> {
        use crate::PortError;

        if self.environment.trim().is_empty() {
            return Err(PortError::Validation("environment url is empty".to_owned()));
        }
        if self.api_key.trim().is_empty() {
            return Err(PortError::Validation("api key is empty".to_owned()));
        }
        if self.poll_interval_ms == 0 {
            return Err(PortError::Validation(
                "poll interval must be non-zero".to_owned(),
            ));
        }
        semver::Version::parse(&self.lib_version).map_err(|e| {
            PortError::Validation(format!("invalid lib version {}: {e}", self.lib_version))
        })?;
        Ok(())
    }
}

/// Result of a `login` or `sign_message` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Resolved(T),
    /// The user declined in the remote window.
    Rejected,
    /// The channel closed before any terminal response arrived.
    Unresolved,
}

/// Envelope `request` tag. Serialized as its wire name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestTag {
    RequestAccounts,
    SignMessage,
    UserReject,
}

impl RequestTag {
    pub fn as_wire(self) -> &'static str {
        match self {
            RequestTag::RequestAccounts => "crossmint_requestAccounts",
            RequestTag::SignMessage => "crossmint_signMessage",
            RequestTag::UserReject => "crossmint_userReject",
        }
    }

    pub fn from_wire(raw: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tag| tag.as_wire() == raw)
    }

    const ALL: [RequestTag; 3] = [
        RequestTag::RequestAccounts,
        RequestTag::SignMessage,
        RequestTag::UserReject,
    ];
}

impl Serialize for RequestTag {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_wire())
    }
}
