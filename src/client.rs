//! Account Gateway
//!
//! Translates the Create, Fetch and Delete operations into HTTP requests
//! against `<base>/v1/organisation/accounts` and maps responses back into
//! typed accounts or classified [`ClientError`]s.

use crate::cancel::CallContext;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::model::{AccountData, AccountEnvelope};
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use tracing::debug;
use uuid::Uuid;

/// Collection path, relative to the configured base URL
pub const ACCOUNTS_PATH: &str = "/v1/organisation/accounts";

/// The account operations offered by the remote API.
#[async_trait]
pub trait AccountClient: Send + Sync {
    /// Register a new account. Succeeds on `201 Created`.
    async fn create(
        &self,
        ctx: &CallContext,
        account: &AccountData,
    ) -> Result<AccountData, ClientError>;

    /// Look up an account by id. Succeeds on `200 OK`.
    async fn fetch(&self, ctx: &CallContext, account_id: Uuid) -> Result<AccountData, ClientError>;

    /// Remove the given version of an account. Succeeds on `204 No Content`.
    async fn delete(
        &self,
        ctx: &CallContext,
        account_id: Uuid,
        version: i64,
    ) -> Result<(), ClientError>;
}

/// Body of every non-success response.
#[derive(Deserialize)]
struct ErrorBody {
    error_message: String,
}

/// [`AccountClient`] backed by an owned `reqwest` transport.
#[derive(Debug, Clone)]
pub struct HttpAccountClient {
    client: Client,
    accounts_url: String,
}

pub(crate) fn build_http_client(config: &ClientConfig) -> Result<Client, ClientError> {
    let mut builder = Client::builder().user_agent(config.user_agent.clone());
    if let Some(timeout) = config.connect_timeout() {
        builder = builder.connect_timeout(timeout);
    }
    if let Some(timeout) = config.request_timeout() {
        builder = builder.timeout(timeout);
    }
    if let Some(timeout) = config.pool_idle_timeout() {
        builder = builder.pool_idle_timeout(timeout);
    }
    Ok(builder.build()?)
}

impl HttpAccountClient {
    /// Client for `base_url` with default transport settings.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::from_config(&ClientConfig::new(base_url))
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let client = build_http_client(config)?;
        Self::with_http_client(client, &config.base_url)
    }

    /// Use a caller-built transport, e.g. one shared with other components.
    pub fn with_http_client(client: Client, base_url: &str) -> Result<Self, ClientError> {
        let parsed = reqwest::Url::parse(base_url)
            .map_err(|e| ClientError::InvalidBaseUrl(format!("{}: {}", base_url, e)))?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(base_url.to_string()));
        }
        Ok(Self {
            client,
            accounts_url: format!("{}{}", base_url.trim_end_matches('/'), ACCOUNTS_PATH),
        })
    }

    pub fn accounts_url(&self) -> &str {
        &self.accounts_url
    }

    pub fn account_url(&self, account_id: Uuid) -> String {
        format!("{}/{}", self.accounts_url, account_id)
    }

    fn request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Send the request and hand back the response only if it carries `expected`.
    async fn send(
        &self,
        request: RequestBuilder,
        expected: StatusCode,
    ) -> Result<Response, ClientError> {
        let request = request.build()?;
        debug!(
            method = %request.method(),
            url = %request.url(),
            "Sending account request"
        );
        let response = self.client.execute(request).await?;
        let status = response.status();
        debug!(status = %status, expected = %expected, "Received account response");

        if status != expected {
            return Err(error_from_response(response).await);
        }
        Ok(response)
    }

    async fn send_and_decode(
        &self,
        request: RequestBuilder,
        expected: StatusCode,
    ) -> Result<AccountData, ClientError> {
        let response = self.send(request, expected).await?;
        let status = response.status();
        let body = response.bytes().await?;
        let envelope: AccountEnvelope = serde_json::from_slice(&body)
            .map_err(|source| ClientError::Decode { status, source })?;
        Ok(envelope.data)
    }
}

/// Turn a non-success response into an `Api` error, or a `Decode` error when
/// the body is not a valid error document (an empty body included).
async fn error_from_response(response: Response) -> ClientError {
    let status = response.status();
    let body = match response.bytes().await {
        Ok(body) => body,
        Err(err) => return ClientError::Transport(err),
    };
    match serde_json::from_slice::<ErrorBody>(&body) {
        Ok(error) => ClientError::Api {
            status,
            message: error.error_message,
        },
        Err(source) => ClientError::Decode { status, source },
    }
}

#[async_trait]
impl AccountClient for HttpAccountClient {
    async fn create(
        &self,
        ctx: &CallContext,
        account: &AccountData,
    ) -> Result<AccountData, ClientError> {
        let request = self
            .request(Method::POST, &self.accounts_url)
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .json(&AccountEnvelope { data: account });

        ctx.run(self.send_and_decode(request, StatusCode::CREATED))
            .await
    }

    async fn fetch(&self, ctx: &CallContext, account_id: Uuid) -> Result<AccountData, ClientError> {
        let url = self.account_url(account_id);
        let request = self.request(Method::GET, &url);

        ctx.run(self.send_and_decode(request, StatusCode::OK)).await
    }

    async fn delete(
        &self,
        ctx: &CallContext,
        account_id: Uuid,
        version: i64,
    ) -> Result<(), ClientError> {
        let url = self.account_url(account_id);
        let request = self
            .request(Method::DELETE, &url)
            .query(&[("version", version)]);

        ctx.run(self.send(request, StatusCode::NO_CONTENT)).await?;
        Ok(())
    }
}
