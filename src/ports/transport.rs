use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::error::Error;

/// An outbound HTTP request as seen by the transport layer.
#[derive(Debug, Clone)]
pub struct OutboundRequest {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Bytes>,
}

impl OutboundRequest {
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    /// Attach a header; invalid values are silently dropped.
    pub fn header(mut self, name: HeaderName, value: &str) -> Self {
        if let Ok(value) = HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    /// Attach a JSON body and the matching content type.
    pub fn json<T: Serialize>(mut self, value: &T) -> Self {
        if let Ok(body) = serde_json::to_vec(value) {
            self.headers.insert(
                http::header::CONTENT_TYPE,
                HeaderValue::from_static("application/json"),
            );
            self.body = Some(Bytes::from(body));
        }
        self
    }

    pub fn body(mut self, body: Bytes) -> Self {
        self.body = Some(body);
        self
    }
}

/// Response returned by the transport layer.
#[derive(Debug, Clone)]
pub struct OutboundResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Bytes,
}

impl OutboundResponse {
    /// Build a JSON response, used by the interceptor to synthesize
    /// answers locally.
    pub fn json<T: Serialize>(status: StatusCode, value: &T) -> Self {
        let mut headers = HeaderMap::new();
        headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        let body = serde_json::to_vec(value).unwrap_or_default();
        Self {
            status,
            headers,
            body: Bytes::from(body),
        }
    }

    pub fn parse_json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}

/// The outbound network call primitive. Live clients send through this
/// trait so the interceptor can answer matching requests locally.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(
        &self,
        req: OutboundRequest,
    ) -> Result<OutboundResponse, Box<dyn Error + Send + Sync>>;
}
