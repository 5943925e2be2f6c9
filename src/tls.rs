//! Trust material for the connection to the API server.

use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("cannot read CA certificate file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse CA certificate {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: reqwest::Error,
    },
}

/// Load the CA certificate the client trusts for server authentication.
/// Accepts PEM, falling back to raw DER.
pub fn load_ca_certificate(path: &Path) -> Result<reqwest::Certificate, Error> {
    let data = std::fs::read(path).map_err(|source| Error::Read {
        path: path.to_owned(),
        source,
    })?;

    reqwest::Certificate::from_pem(&data)
        .or_else(|_| reqwest::Certificate::from_der(&data))
        .map_err(|source| Error::Parse {
            path: path.to_owned(),
            source,
        })
}
