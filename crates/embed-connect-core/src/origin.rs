//! Allow-list of origins whose messages may reach the handshake.

pub const ALLOWED_ORIGINS: &[&str] = &[
    "https://www.crossmint.com",
    "https://crossmint.com",
    "https://staging.crossmint.com",
    "https://www.staging.crossmint.com",
    "http://localhost:3001",
];

pub fn is_allowed_origin(origin: &str) -> bool {
    ALLOWED_ORIGINS.contains(&origin)
}
