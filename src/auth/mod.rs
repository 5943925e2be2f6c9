//! Credential handling for requests to the API server.

pub mod token_file;
pub mod token_manager;

/// Source of bearer tokens for outgoing requests.
#[async_trait::async_trait]
pub trait TokenProvider: Send + Sync {
    type Token: Token;
    type Error: Send + Sync;

    async fn get_token(&self) -> Result<Self::Token, Self::Error>;
}

/// A credential that can be presented in an `Authorization` header.
pub trait Token: Send {
    fn as_str(&self) -> &str;
}

/// A credential that stops being usable at a known instant.
pub trait ExpiringToken: Token {
    fn expires_at(&self) -> tokio::time::Instant;
}
