//! Authenticated access to the Kubernetes API from inside a pod.
//!
//! Builds an HTTPS client that trusts the cluster CA certificate and presents
//! the pod's service-account bearer token on every request. The token is
//! re-read from disk on a fixed window, so rotated credentials are picked up
//! without restarting the client.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let client = kube_sa_client::InClusterClient::in_cluster()?;
//! let version = client.version().await?;
//! println!("API server is running {}", version.git_version);
//! # Ok(())
//! # }
//! ```

pub mod auth;
pub mod client;
pub mod config;
pub mod tls;

pub use client::{ApiClient, InClusterClient};
pub use config::Config;

#[cfg(test)]
mod test_utils;
