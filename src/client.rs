//! The API client and its constructors.

use reqwest::Method;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::auth::token_file::TokenFile;
use crate::auth::token_manager::TokenManager;
use crate::auth::{self, Token as _};
use crate::config::{self, Config};
use crate::tls;

const MERGE_PATCH_CONTENT_TYPE: &str = "application/merge-patch+json";

/// An authenticated HTTP client for the Kubernetes API server.
///
/// Every request resolves a bearer token from the provider and sends it in
/// the `Authorization` header. TLS trust and the base URL are fixed at
/// construction.
pub struct ApiClient<AuthTokenProvider> {
    pub client: reqwest::Client,
    pub base_url: String,
    pub auth_token_provider: AuthTokenProvider,
}

/// The client the in-cluster constructors produce.
pub type InClusterClient = ApiClient<TokenManager<TokenFile>>;

/// A non-success status from the API server.
#[derive(Debug, thiserror::Error)]
#[error("{status_code} status code from the API server")]
pub struct ServerError {
    pub status_code: u16,
}

fn check_status(res: &reqwest::Response) -> Result<(), ServerError> {
    let status = res.status();
    if !status.is_success() {
        return Err(ServerError {
            status_code: status.as_u16(),
        });
    }
    Ok(())
}

/// Failure while putting the client together.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error(transparent)]
    Config(#[from] config::Error),
    #[error(transparent)]
    Tls(#[from] tls::Error),
    #[error("invalid API server URL {url:?}: {source}")]
    BaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
    #[error("cannot build HTTP client: {0}")]
    Http(#[source] reqwest::Error),
}

/// Failure while performing a request.
#[derive(Debug, thiserror::Error)]
pub enum Error<AuthError> {
    #[error("auth: {0}")]
    Auth(#[source] AuthError),
    #[error("reqwest: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("server: {0}")]
    Server(#[from] ServerError),
}

impl InClusterClient {
    /// Build a client from the pod environment: `KUBERNETES_SERVICE_HOST` and
    /// `KUBERNETES_SERVICE_PORT`, plus the service-account mount for the CA
    /// certificate and token.
    pub fn in_cluster() -> Result<Self, BuildError> {
        let config = Config::in_cluster()?;
        Self::from_config(&config)
    }

    /// Build a client for `https://{host}:{port}/` trusting only the CA
    /// certificate at `config.ca_cert_path`, with bearer tokens read from
    /// `config.token_path`.
    ///
    /// Server certificates are checked against that single CA and the
    /// hostname is verified per the usual HTTPS rules; no client certificate
    /// is presented. No read timeout is set, so watch-style requests can stay
    /// open indefinitely.
    pub fn from_config(config: &Config) -> Result<Self, BuildError> {
        let ca_cert = tls::load_ca_certificate(&config.ca_cert_path)?;

        // Pin the TLS backend rather than taking whatever the enabled
        // feature set would negotiate.
        let client = reqwest::Client::builder()
            .use_rustls_tls()
            .tls_built_in_root_certs(false)
            .add_root_certificate(ca_cert)
            .build()
            .map_err(BuildError::Http)?;

        let base_url = format!(
            "https://{}/",
            config::join_host_port(&config.host, config.port)
        );
        reqwest::Url::parse(&base_url).map_err(|source| BuildError::BaseUrl {
            url: base_url.clone(),
            source,
        })?;

        let auth_token_provider = TokenManager::new(TokenFile::new(&config.token_path));

        Ok(Self {
            client,
            base_url,
            auth_token_provider,
        })
    }
}

impl<AuthTokenProvider> ApiClient<AuthTokenProvider>
where
    AuthTokenProvider: auth::TokenProvider,
{
    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get_auth_token(&self) -> Result<String, Error<AuthTokenProvider::Error>> {
        let token = self
            .auth_token_provider
            .get_token()
            .await
            .map_err(Error::Auth)?;
        Ok(token.as_str().to_owned())
    }

    fn build_request(
        &self,
        auth_token: &str,
        method: Method,
        url: &str,
    ) -> Result<reqwest::Request, Error<AuthTokenProvider::Error>> {
        self.client
            .request(method, url)
            .bearer_auth(auth_token)
            .build()
            .map_err(Error::Reqwest)
    }

    /// Perform an authenticated request against a path under the base URL.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
    ) -> Result<reqwest::Response, Error<AuthTokenProvider::Error>> {
        let auth_token = self.get_auth_token().await?;
        let url = self.build_url(path);
        debug!(message = "Issuing API request", %url);
        self.exec(self.build_request(&auth_token, method, &url)?)
            .await
    }

    /// GET a path and decode the JSON body.
    pub async fn get_json<T>(&self, path: &str) -> Result<T, Error<AuthTokenProvider::Error>>
    where
        T: DeserializeOwned,
    {
        let res = self.request(Method::GET, path).await?;
        Self::parse_json(res).await
    }

    /// PATCH a path with a JSON merge patch and decode the updated object.
    pub async fn patch_json<T>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<T, Error<AuthTokenProvider::Error>>
    where
        T: DeserializeOwned,
    {
        let auth_token = self.get_auth_token().await?;
        let url = self.build_url(path);
        debug!(message = "Issuing API patch", %url);
        let request = self
            .client
            .request(Method::PATCH, &url)
            .bearer_auth(&auth_token)
            .header(reqwest::header::CONTENT_TYPE, MERGE_PATCH_CONTENT_TYPE)
            .json(body)
            .build()
            .map_err(Error::Reqwest)?;

        let res = self.exec(request).await?;
        Self::parse_json(res).await
    }

    /// Version information reported by the API server.
    pub async fn version(&self) -> Result<model::VersionInfo, Error<AuthTokenProvider::Error>> {
        self.get_json("/version").await
    }

    /// All namespaces, following list pagination to exhaustion.
    pub async fn list_namespaces(
        &self,
    ) -> Result<Vec<model::Namespace>, Error<AuthTokenProvider::Error>> {
        self.list_paged("/api/v1/namespaces").await
    }

    /// All pods in a namespace, following list pagination to exhaustion.
    pub async fn list_pods(
        &self,
        namespace: &str,
    ) -> Result<Vec<model::Pod>, Error<AuthTokenProvider::Error>> {
        self.list_paged(&format!("/api/v1/namespaces/{namespace}/pods"))
            .await
    }

    /// A single pod, or `None` when the API server reports 404.
    pub async fn get_pod(
        &self,
        namespace: &str,
        name: &str,
    ) -> Result<Option<model::Pod>, Error<AuthTokenProvider::Error>> {
        let path = format!("/api/v1/namespaces/{namespace}/pods/{name}");
        match self.get_json(&path).await {
            Ok(pod) => Ok(Some(pod)),
            Err(Error::Server(ServerError { status_code: 404 })) => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Apply a JSON merge patch to a pod.
    pub async fn patch_pod(
        &self,
        namespace: &str,
        name: &str,
        patch: &serde_json::Value,
    ) -> Result<model::Pod, Error<AuthTokenProvider::Error>> {
        let path = format!("/api/v1/namespaces/{namespace}/pods/{name}");
        self.patch_json(&path, patch).await
    }

    async fn list_paged<T>(&self, path: &str) -> Result<Vec<T>, Error<AuthTokenProvider::Error>>
    where
        T: DeserializeOwned,
    {
        let mut page: model::List<T> = self.get_json(path).await?;
        let mut items = std::mem::take(&mut page.items);

        while let Some(token) = page
            .metadata
            .continue_token
            .take()
            .filter(|token| !token.is_empty())
        {
            page = self.get_json(&format!("{path}?continue={token}")).await?;
            items.append(&mut page.items);
        }

        Ok(items)
    }

    async fn exec(
        &self,
        request: reqwest::Request,
    ) -> Result<reqwest::Response, Error<AuthTokenProvider::Error>> {
        let res = self.client.execute(request).await.map_err(Error::Reqwest)?;
        check_status(&res)?;
        Ok(res)
    }

    async fn parse_json<T>(res: reqwest::Response) -> Result<T, Error<AuthTokenProvider::Error>>
    where
        T: DeserializeOwned,
    {
        res.json().await.map_err(Error::Reqwest)
    }
}

pub mod model {
    use std::collections::BTreeMap;

    use chrono::{DateTime, Utc};
    use serde::{Deserialize, Serialize};

    #[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct List<T> {
        #[serde(default)]
        pub metadata: ListMeta,
        pub items: Vec<T>,
    }

    #[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ListMeta {
        /// Opaque cursor handed back by the server when a list is truncated.
        #[serde(rename = "continue", skip_serializing_if = "Option::is_none")]
        pub continue_token: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub resource_version: Option<String>,
    }

    #[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ObjectMeta {
        pub name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub namespace: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub uid: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub creation_timestamp: Option<DateTime<Utc>>,
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        pub labels: BTreeMap<String, String>,
    }

    #[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Pod {
        pub metadata: ObjectMeta,
        #[serde(default)]
        pub status: PodStatus,
    }

    #[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct PodStatus {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub phase: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub start_time: Option<DateTime<Utc>>,
    }

    #[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct Namespace {
        pub metadata: ObjectMeta,
        #[serde(default)]
        pub status: NamespaceStatus,
    }

    #[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct NamespaceStatus {
        #[serde(skip_serializing_if = "Option::is_none")]
        pub phase: Option<String>,
    }

    #[derive(Default, Debug, Clone, PartialEq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct VersionInfo {
        pub major: String,
        pub minor: String,
        pub git_version: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub platform: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        pub build_date: Option<DateTime<Utc>>,
    }
}
