//! Client for the teacher endpoints

use reqwest::{Client, Method, StatusCode};
use serde::Serialize;
use serde_json::Value;

/// Status and decoded body of one call
#[derive(Debug, Clone)]
pub struct RosterResponse {
    pub status: u16,
    pub request_id: Option<String>,
    /// Parsed JSON, or a string for non-JSON bodies, or `Null` when empty
    pub body: Value,
}

impl RosterResponse {
    pub fn is_success(&self) -> bool {
        StatusCode::from_u16(self.status).is_ok_and(|s| s.is_success())
    }

    /// The `_id` of a returned teacher
    pub fn id(&self) -> Option<&str> {
        self.body.get("_id").and_then(Value::as_str)
    }
}

/// Client for interacting with Roster
pub struct RosterClient {
    base_url: String,
    client: Client,
}

impl RosterClient {
    /// Create a client for the collection at `base_url`
    pub fn new(base_url: String) -> Self {
        // Falls back to a default client if the builder rejects the timeout
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(crate::REQUEST_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self { base_url, client }
    }

    pub async fn echo(&self, msg: &str) -> Result<RosterResponse, ClientError> {
        self.send(Method::GET, &format!("/echo/{msg}"), None::<&()>)
            .await
    }

    pub async fn list(&self) -> Result<RosterResponse, ClientError> {
        self.send(Method::GET, "", None::<&()>).await
    }

    pub async fn get(&self, id: &str) -> Result<RosterResponse, ClientError> {
        self.send(Method::GET, &format!("/{id}"), None::<&()>).await
    }

    pub async fn create<T: Serialize + ?Sized>(
        &self,
        body: &T,
    ) -> Result<RosterResponse, ClientError> {
        self.send(Method::POST, "", Some(body)).await
    }

    pub async fn update<T: Serialize + ?Sized>(
        &self,
        id: &str,
        body: &T,
    ) -> Result<RosterResponse, ClientError> {
        self.send(Method::PUT, &format!("/{id}"), Some(body)).await
    }

    pub async fn patch<T: Serialize + ?Sized>(
        &self,
        id: &str,
        body: &T,
    ) -> Result<RosterResponse, ClientError> {
        self.send(Method::PATCH, &format!("/{id}"), Some(body)).await
    }

    pub async fn delete(&self, id: &str) -> Result<RosterResponse, ClientError> {
        self.send(Method::DELETE, &format!("/{id}"), None::<&()>)
            .await
    }

    /// DELETE on the collection with `{"_id": id}` as the body
    pub async fn delete_by_body_id(&self, id: &str) -> Result<RosterResponse, ClientError> {
        self.send(Method::DELETE, "", Some(&serde_json::json!({ "_id": id })))
            .await
    }

    /// Send raw bytes, for bodies that are not valid JSON
    pub async fn send_raw(
        &self,
        method: Method,
        path: &str,
        body: impl Into<reqwest::Body>,
    ) -> Result<RosterResponse, ClientError> {
        let response = self
            .client
            .request(method, format!("{}{}", self.base_url, path))
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await?;
        decode(response).await
    }

    async fn send<T: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&T>,
    ) -> Result<RosterResponse, ClientError> {
        let mut request = self
            .client
            .request(method, format!("{}{}", self.base_url, path));
        if let Some(body) = body {
            request = request.json(body);
        }
        decode(request.send().await?).await
    }
}

async fn decode(response: reqwest::Response) -> Result<RosterResponse, ClientError> {
    let status = response.status().as_u16();
    let request_id = response
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let text = response.text().await?;
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };

    Ok(RosterResponse {
        status,
        request_id,
        body,
    })
}

/// Errors from client calls
#[derive(Debug)]
pub enum ClientError {
    RequestError(reqwest::Error),
}

impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::RequestError(e) => write!(f, "Request error: {e}"),
        }
    }
}

impl std::error::Error for ClientError {}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::RequestError(e)
    }
}
