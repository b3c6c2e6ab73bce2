//! HTTP access to the puzzle backend.
//!
//! [`BackendClient`] issues the two calls the backend offers. [`Dispatcher`]
//! runs them on a background tokio runtime so the render loop never blocks,
//! and hands results back through a channel drained on the render thread.

use reqwest::{Client, Method};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::config::ServerConfig;
use crate::cube::{decode_response, CubeMove, CubeResponse};
use crate::error::{CubeViewError, Result};
use crate::session::Request;

/// Thin wrapper over the backend's REST interface.
#[derive(Debug, Clone)]
pub struct BackendClient {
    base_url: String,
    client: Client,
}

impl BackendClient {
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// Method and absolute URL for a request.
    pub fn endpoint(&self, request: Request) -> (Method, String) {
        match request {
            Request::Fetch => (Method::GET, format!("{}/get_cube", self.base_url)),
            Request::Move(cube_move) => (
                Method::POST,
                format!("{}/apply_move/{cube_move}", self.base_url),
            ),
        }
    }

    pub async fn get_cube(&self) -> Result<CubeResponse> {
        self.execute(Request::Fetch).await
    }

    pub async fn apply_move(&self, cube_move: CubeMove) -> Result<CubeResponse> {
        self.execute(Request::Move(cube_move)).await
    }

    /// Sends a request and decodes the cube state it returns.
    pub async fn execute(&self, request: Request) -> Result<CubeResponse> {
        let (method, url) = self.endpoint(request);
        tracing::info!(%method, %url, "requesting");

        let response = self.client.request(method, &url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CubeViewError::Status {
                url,
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        decode_response(&body)
    }
}

/// Runs backend requests off the render thread.
pub struct Dispatcher {
    client: BackendClient,
    runtime: Runtime,
    sender: UnboundedSender<Result<CubeResponse>>,
    receiver: UnboundedReceiver<Result<CubeResponse>>,
}

impl Dispatcher {
    pub fn new(client: BackendClient) -> Result<Self> {
        let runtime = Runtime::new()?;
        let (sender, receiver) = mpsc::unbounded_channel();
        Ok(Self {
            client,
            runtime,
            sender,
            receiver,
        })
    }

    /// Starts a request; its result shows up in a later [`poll`](Self::poll).
    pub fn send(&self, request: Request) {
        let client = self.client.clone();
        let sender = self.sender.clone();
        self.runtime.spawn(async move {
            let result = client.execute(request).await;
            // the receiver only goes away when the viewer is closing
            let _ = sender.send(result);
        });
    }

    /// Returns a finished result, if any, without waiting.
    pub fn poll(&mut self) -> Option<Result<CubeResponse>> {
        self.receiver.try_recv().ok()
    }

    /// Runs a request to completion on the calling thread.
    pub fn block_on(&self, request: Request) -> Result<CubeResponse> {
        self.runtime.block_on(self.client.execute(request))
    }
}
