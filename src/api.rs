use crate::{
    errors::{BackendError, CatalogChatError, CatalogChatResult},
    models::{ChatRequest, ChatResponse},
};
use log::debug;
use reqwest::Client;
use std::future::Future;

/// The chat endpoint as seen by the controller.
pub trait ChatBackend {
    /// Where requests go, for diagnostics.
    fn endpoint(&self) -> &str;

    /// Sends one query and waits for the answer. There is no timeout.
    fn send(
        &self,
        request: &ChatRequest,
    ) -> impl Future<Output = Result<ChatResponse, BackendError>>;
}

/// `ChatBackend` over HTTP: `POST {endpoint}/chat` with a JSON body.
#[derive(Debug, Clone)]
pub struct HttpChatBackend {
    url: String,
    client: Client,
}

impl HttpChatBackend {
    pub fn new(endpoint: &str, chat_path: &str) -> CatalogChatResult<Self> {
        let client = Client::builder().build().map_err(|e| {
            CatalogChatError::api_error(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Self {
            url: join_url(endpoint, chat_path),
            client,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl ChatBackend for HttpChatBackend {
    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn send(&self, request: &ChatRequest) -> Result<ChatResponse, BackendError> {
        debug!("POST {}", self.url);

        let response = self
            .client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(BackendError::Status(status.as_u16()));
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| BackendError::Decode(e.to_string()))
    }
}

fn join_url(endpoint: &str, path: &str) -> String {
    format!(
        "{}/{}",
        endpoint.trim().trim_end_matches('/'),
        path.trim().trim_start_matches('/')
    )
}
