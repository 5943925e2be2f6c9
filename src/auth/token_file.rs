//! Bearer tokens read from a file on disk.
//!
//! Kubernetes projects the service-account token into the pod filesystem and
//! rotates the file contents behind the scenes; re-reading the file is how a
//! long-lived client picks up the rotated credential.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tokio::time::Instant;

/// How long a token read from disk stays usable before the file is consulted
/// again. A conservative re-read interval, not the credential's real TTL.
pub const REFRESH_INTERVAL: Duration = Duration::from_secs(60);

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read token file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Reads the token file on demand, stamping each read with the refresh window.
pub struct TokenFile {
    path: PathBuf,
}

impl TokenFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the whole file, using the trimmed contents verbatim as the token.
    pub async fn read(&self) -> Result<Token, Error> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|source| Error::Read {
                path: self.path.clone(),
                source,
            })?;

        Ok(Token {
            value: raw.trim().to_owned(),
            expires_at: Instant::now() + REFRESH_INTERVAL,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Token {
    value: String,
    expires_at: Instant,
}

#[async_trait::async_trait]
impl super::TokenProvider for TokenFile {
    type Token = Token;
    type Error = Error;

    async fn get_token(&self) -> Result<Self::Token, Self::Error> {
        self.read().await
    }
}

impl super::Token for Token {
    fn as_str(&self) -> &str {
        &self.value
    }
}

impl super::ExpiringToken for Token {
    fn expires_at(&self) -> Instant {
        self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use crate::auth::{Token as _, TokenProvider as _};

    use super::*;

    #[tokio::test]
    async fn trims_surrounding_whitespace() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "abc123\n").unwrap();

        let token = TokenFile::new(file.path()).get_token().await.unwrap();
        assert_eq!(token.as_str(), "abc123");
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let provider = TokenFile::new("/nonexistent/token");

        let err = provider.get_token().await.unwrap_err();
        assert!(matches!(err, Error::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/token"));
    }
}
