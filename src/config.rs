//! Connection settings for the API server.

use std::path::PathBuf;

pub const ENV_SERVICE_HOST: &str = "KUBERNETES_SERVICE_HOST";
pub const ENV_SERVICE_PORT: &str = "KUBERNETES_SERVICE_PORT";

/// Where Kubernetes mounts the service-account credentials inside a pod.
pub const SERVICE_ACCOUNT_CA_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/ca.crt";
pub const SERVICE_ACCOUNT_TOKEN_PATH: &str = "/var/run/secrets/kubernetes.io/serviceaccount/token";

/// Where the API server lives and which files hold the credentials.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub ca_cert_path: PathBuf,
    pub token_path: PathBuf,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("environment variable not set: {name}")]
    MissingEnv { name: &'static str },
    #[error("cannot parse {name}={value:?} as a port: {source}")]
    InvalidPort {
        name: &'static str,
        value: String,
        #[source]
        source: std::num::ParseIntError,
    },
}

impl Config {
    /// Settings for talking to the API server from inside a pod: host and
    /// port from the standard environment variables, credentials from the
    /// service-account mount.
    ///
    /// Fails before touching any file when either variable is unset or empty.
    pub fn in_cluster() -> Result<Self, Error> {
        let host = require_env(ENV_SERVICE_HOST)?;
        let port = require_env(ENV_SERVICE_PORT)?;
        let port = port.parse().map_err(|source| Error::InvalidPort {
            name: ENV_SERVICE_PORT,
            value: port.clone(),
            source,
        })?;

        Ok(Self {
            host,
            port,
            ca_cert_path: SERVICE_ACCOUNT_CA_PATH.into(),
            token_path: SERVICE_ACCOUNT_TOKEN_PATH.into(),
        })
    }
}

fn require_env(name: &'static str) -> Result<String, Error> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or(Error::MissingEnv { name })
}

/// Join host and port the way Go's `net.JoinHostPort` does, which is what the
/// reference in-cluster client uses: IPv6 literals are bracketed, everything
/// else is plain `host:port`.
pub fn join_host_port(host: &str, port: u16) -> String {
    if host.contains(':') {
        return format!("[{}]:{}", host, port);
    }
    format!("{}:{}", host, port)
}
