// meal-client/src/transport/network.rs
// Network transport backed by reqwest

use async_trait::async_trait;
use reqwest::Client;

use super::{PreparedRequest, RawResponse, Transport, TransportFailure};
use crate::error::{ClientError, ClientResult};

/// reqwest-backed transport
///
/// The request timeout is enforced by the channel, not here, so a scripted
/// transport and the network one time out the same way.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> ClientResult<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| ClientError::Config(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// Wrap an already configured reqwest client
    pub fn from_client(client: Client) -> Self {
        Self { client }
    }

    fn failure(err: reqwest::Error) -> TransportFailure {
        if err.is_timeout() {
            TransportFailure::Timeout
        } else if err.is_connect() || err.is_request() {
            TransportFailure::Connect(err.to_string())
        } else {
            TransportFailure::Other(err.to_string())
        }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn send(&self, request: PreparedRequest) -> Result<RawResponse, TransportFailure> {
        let mut req = self.client.request(request.method, request.url);
        if let Some(token) = &request.bearer {
            req = req.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let response = req.send().await.map_err(Self::failure)?;
        let status = response.status();
        let body = response.text().await.map_err(Self::failure)?;
        Ok(RawResponse { status, body })
    }
}
