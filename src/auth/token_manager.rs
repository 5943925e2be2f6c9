use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::{debug, info};

use super::TokenProvider;

/// Caches tokens from an inner provider until they expire.
///
/// Renewal happens under the lock, so concurrent callers hitting an expired
/// cache trigger a single re-read rather than racing on the file.
pub struct TokenManager<Provider>
where
    Provider: TokenProvider,
{
    provider: Provider,
    cached_token: Mutex<Option<Record>>,
}

#[derive(Debug, thiserror::Error)]
pub enum Error<RenewalError> {
    #[error("token provider: {0}")]
    Provider(#[source] RenewalError),
}

/// A cached token together with the instant it stops being served.
#[derive(Debug, Clone)]
pub struct Record {
    pub value: String,
    pub expires_at: Instant,
}

impl Record {
    pub fn from_expiring_token<T: super::ExpiringToken>(token: T) -> Self {
        Self {
            value: token.as_str().to_owned(),
            expires_at: token.expires_at(),
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

impl super::Token for Record {
    fn as_str(&self) -> &str {
        &self.value
    }
}

impl<Provider> TokenManager<Provider>
where
    Provider: TokenProvider,
    <Provider as TokenProvider>::Token: super::ExpiringToken,
{
    pub fn new(provider: Provider) -> Self {
        let cached_token = Mutex::const_new(None);
        Self {
            provider,
            cached_token,
        }
    }

    async fn renew(&self) -> Result<Record, Error<Provider::Error>> {
        let token = self.provider.get_token().await.map_err(Error::Provider)?;
        Ok(Record::from_expiring_token(token))
    }

    /// Return the cached token, renewing it first once the window has passed.
    ///
    /// An expired record is never served: when renewal fails the error goes to
    /// the caller and the stale value stays unused.
    pub async fn current(&self) -> Result<Record, Error<Provider::Error>> {
        let mut cached_token = self.cached_token.lock().await;

        if let Some(record) = &*cached_token {
            if !record.is_expired() {
                debug!(message = "Using cached token", token_expires_at = ?record.expires_at);
                return Ok(record.clone());
            }
            debug!(message = "Cached token expired, renewing", token_expires_at = ?record.expires_at);
        }

        info!(
            message = "Reading a fresh token",
            token_is_stale = cached_token.is_some(),
        );

        let new_record = self.renew().await?;
        cached_token.replace(new_record.clone());

        debug!(message = "Got new token", token_expires_at = ?new_record.expires_at);

        Ok(new_record)
    }
}

#[async_trait::async_trait]
impl<Provider> super::TokenProvider for TokenManager<Provider>
where
    Provider: TokenProvider,
    <Provider as TokenProvider>::Token: super::ExpiringToken,
{
    type Token = Record;
    type Error = Error<Provider::Error>;

    async fn get_token(&self) -> Result<Self::Token, Self::Error> {
        self.current().await
    }
}
