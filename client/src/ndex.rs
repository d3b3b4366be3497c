use crate::cx::{self, CxError};
use async_trait::async_trait;
use ndexcollapse_core::config::NdexCredentials;
use ndexcollapse_core::error::{CollapseToolError, ErrorCode};
use ndexcollapse_core::model::Network;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response, StatusCode};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(300);
const UPLOAD_PART: &str = "CXNetworkStream";
const USER_AGENT: &str = concat!("ndexcollapse/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("credentials rejected by {url}")]
    Unauthenticated { url: String },
    #[error("no network at {url}")]
    NotFound { url: String },
    #[error("unexpected status {status} from {url}: {body}")]
    Status {
        status: u16,
        url: String,
        body: String,
    },
    #[error("CX error: {0}")]
    Cx(#[from] CxError),
}

impl CollapseToolError for ClientError {
    fn error_code(&self) -> ErrorCode {
        match self {
            ClientError::Transport(_) => ErrorCode::Unavailable,
            ClientError::Unauthenticated { .. } => ErrorCode::Unauthenticated,
            ClientError::NotFound { .. } => ErrorCode::NotFound,
            ClientError::Status { status, .. } if *status < 500 => ErrorCode::InvalidArgument,
            ClientError::Status { .. } => ErrorCode::Unavailable,
            ClientError::Cx(_) => ErrorCode::MalformedGraph,
        }
    }
}

/// Source and sink of networks.
#[async_trait]
pub trait NetworkStore: Send + Sync {
    async fn fetch(&self, network_id: &str) -> Result<Network, ClientError>;

    /// Store `network` as a new network and return its URL.
    async fn upload(&self, network: &Network) -> Result<String, ClientError>;
}

/// Base URL for a server setting; a bare host is reached over plain http.
pub fn server_base_url(server: &str) -> String {
    let server = server.trim().trim_end_matches('/');
    if server.starts_with("http") {
        server.to_string()
    } else {
        format!("http://{}", server)
    }
}

/// NDEx REST v2 client authenticating with HTTP basic auth.
pub struct NdexClient {
    http: Client,
    base_url: String,
    user: String,
    password: String,
}

impl NdexClient {
    pub fn new(credentials: &NdexCredentials) -> Result<Self, ClientError> {
        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            http,
            base_url: server_base_url(&credentials.server),
            user: credentials.user.clone(),
            password: credentials.password.clone(),
        })
    }

    pub fn network_url(&self, network_id: &str) -> String {
        format!("{}/v2/network/{}", self.base_url, network_id)
    }

    fn upload_url(&self) -> String {
        format!("{}/v2/network", self.base_url)
    }
}

#[async_trait]
impl NetworkStore for NdexClient {
    async fn fetch(&self, network_id: &str) -> Result<Network, ClientError> {
        let url = self.network_url(network_id);
        debug!(%url, "fetching network");

        let response = self
            .http
            .get(&url)
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await?;
        let body = check_status(response, &url).await?.bytes().await?;
        let network = cx::decode(&body)?;

        info!(
            network_id,
            nodes = network.nodes().len(),
            edges = network.edge_count(),
            "fetched network"
        );
        Ok(network)
    }

    async fn upload(&self, network: &Network) -> Result<String, ClientError> {
        let url = self.upload_url();
        let body = cx::encode(network)?;
        debug!(%url, bytes = body.len(), "uploading network");

        let part = Part::bytes(body)
            .file_name("filename")
            .mime_str("application/octet-stream")?;
        let form = Form::new().part(UPLOAD_PART, part);

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.user, Some(&self.password))
            .multipart(form)
            .send()
            .await?;
        let location = check_status(response, &url).await?.text().await?;
        Ok(location.trim().trim_matches('"').to_string())
    }
}

async fn check_status(response: Response, url: &str) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let url = url.to_string();
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            Err(ClientError::Unauthenticated { url })
        }
        StatusCode::NOT_FOUND => Err(ClientError::NotFound { url }),
        _ => Err(ClientError::Status {
            status: status.as_u16(),
            url,
            body: response.text().await.unwrap_or_default(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials(server: &str) -> NdexCredentials {
        NdexCredentials {
            user: "bob".into(),
            password: "smith".into(),
            server: server.into(),
        }
    }

    #[test]
    fn test_server_base_url() {
        assert_eq!(server_base_url("dev.ndexbio.org"), "http://dev.ndexbio.org");
        assert_eq!(
            server_base_url("https://public.ndexbio.org/"),
            "https://public.ndexbio.org"
        );
        assert_eq!(server_base_url(" localhost:8080 "), "http://localhost:8080");
    }

    #[test]
    fn test_network_url() {
        let client = NdexClient::new(&credentials("dev.ndexbio.org")).unwrap();
        assert_eq!(
            client.network_url("f1dd6cc3-0007-11e6-b550-06603eb7f303"),
            "http://dev.ndexbio.org/v2/network/f1dd6cc3-0007-11e6-b550-06603eb7f303"
        );
        assert_eq!(client.upload_url(), "http://dev.ndexbio.org/v2/network");
    }

    #[test]
    fn test_status_error_codes() {
        let not_found = ClientError::NotFound { url: "u".into() };
        assert_eq!(not_found.error_code(), ErrorCode::NotFound);

        let bad_request = ClientError::Status {
            status: 400,
            url: "u".into(),
            body: String::new(),
        };
        assert_eq!(bad_request.error_code(), ErrorCode::InvalidArgument);

        let server_error = ClientError::Status {
            status: 503,
            url: "u".into(),
            body: String::new(),
        };
        assert_eq!(server_error.error_code(), ErrorCode::Unavailable);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_unavailable() {
        let client = NdexClient::new(&credentials("127.0.0.1:9")).unwrap();
        let err = client.fetch("any").await.unwrap_err();
        assert!(matches!(err, ClientError::Transport(_)));
        assert_eq!(err.error_code(), ErrorCode::Unavailable);
    }
}
