//! The HTTP transport seam and its `reqwest` implementation.

use std::borrow::Cow;

use async_trait::async_trait;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::{Method, StatusCode};

use crate::error::Error;
use crate::request::RequestOptions;

/// A fully resolved outgoing call.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: String,
    pub options: RequestOptions,
}

/// A completed response with its body read into memory.
#[derive(Debug, Clone)]
pub struct Response {
    pub method: Method,
    pub url: String,
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    pub fn new(method: Method, url: impl Into<String>, status: StatusCode) -> Self {
        Self {
            method,
            url: url.into(),
            status,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    /// Value of the `Content-Type` header, if present and printable.
    pub fn content_type(&self) -> Option<&str> {
        self.headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
    }

    /// Body as text, replacing invalid UTF-8.
    pub fn text(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.body)
    }

    /// Fails with [`Error::Status`] on a 4xx or 5xx status.
    pub fn raise_for_status(&self) -> Result<(), Error> {
        if self.status.is_client_error() || self.status.is_server_error() {
            Err(Error::Status {
                status: self.status.as_u16(),
                url: self.url.clone(),
            })
        } else {
            Ok(())
        }
    }
}

/// Executes requests on behalf of [`crate::HttpClient`].
///
/// Connectivity failures are returned as the transport reports them.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn execute(&self, request: Request) -> Result<Response, Error>;
}

/// Production transport backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone, Default)]
pub struct ReqwestTransport {
    http: reqwest::Client,
}

impl ReqwestTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Uses a preconfigured `reqwest` client (proxies, TLS roots, timeouts).
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn execute(&self, request: Request) -> Result<Response, Error> {
        let Request {
            method,
            url,
            options,
        } = request;

        let mut req = self
            .http
            .request(method.clone(), url.as_str())
            .headers(options.headers);
        if let Some(key) = &options.api_key {
            req = req.basic_auth(key, None::<&str>);
        }
        if !options.query.is_empty() {
            req = req.query(&options.query);
        }
        if let Some(body) = &options.json {
            req = req.json(body);
        }
        if let Some(timeout) = options.timeout {
            req = req.timeout(timeout);
        }

        let resp = req.send().await?;
        let status = resp.status();
        let final_url = resp.url().to_string();
        let headers = resp.headers().clone();
        let body = resp.bytes().await?.to_vec();

        Ok(Response {
            method,
            url: final_url,
            status,
            headers,
            body,
        })
    }
}
