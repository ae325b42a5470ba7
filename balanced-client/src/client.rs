//! The request pipeline: URL resolution, hooks, dispatch, error mapping
//! and body decoding.

use std::fmt;
use std::sync::Arc;

use balanced_types::{ApiErrorBody, ErrorKind, JsonObject, kind_for_category_code};
use reqwest::header::{ACCEPT, HeaderValue, USER_AGENT};
use reqwest::{Method, Url};
use tracing::{debug, warn};

use crate::config::SharedConfig;
use crate::error::{Error, HttpError};
use crate::hooks::{BeforeRequest, HookRegistry};
use crate::request::RequestOptions;
use crate::transport::{ReqwestTransport, Request, Response, Transport};

/// Turns a response into a JSON object.
///
/// [`wrap_raise_for_status`] decodes error bodies through this trait.
pub trait ResponseDeserializer {
    fn deserialize(&self, response: &Response) -> Result<JsonObject, Error>;
}

/// Balanced API client.
///
/// Reads the shared configuration at dispatch time, so key changes made
/// through any [`SharedConfig`] handle apply to the next request.
pub struct HttpClient {
    config: SharedConfig,
    hooks: HookRegistry,
    transport: Arc<dyn Transport>,
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClient {
    /// Creates a client bound to the process-wide configuration.
    pub fn new() -> Self {
        Self::with_config(SharedConfig::global())
    }

    /// Creates a client bound to `config`.
    pub fn with_config(config: SharedConfig) -> Self {
        Self {
            config,
            hooks: HookRegistry::new(),
            transport: Arc::new(ReqwestTransport::new()),
        }
    }

    /// Replaces the transport.
    pub fn with_transport<T: Transport + 'static>(mut self, transport: T) -> Self {
        self.transport = Arc::new(transport);
        self
    }

    pub fn config(&self) -> &SharedConfig {
        &self.config
    }

    pub fn hooks(&self) -> &HookRegistry {
        &self.hooks
    }

    pub fn hooks_mut(&mut self) -> &mut HookRegistry {
        &mut self.hooks
    }

    /// Adds a hook to run before every request.
    pub fn register_hook<F>(&mut self, hook: F)
    where
        F: Fn(&HttpClient, &Method, &str, &mut RequestOptions) -> Result<(), Error>
            + Send
            + Sync
            + 'static,
    {
        self.hooks.push(hook);
    }

    /// Removes the most recently registered hook.
    pub fn pop_hook(&mut self) -> Option<Arc<dyn BeforeRequest>> {
        self.hooks.pop()
    }

    /// Resolves `path` against the configured versioned URI.
    ///
    /// Full `http(s)://` URLs are returned unchanged.
    pub fn url_for(&self, path: &str) -> Result<String, Error> {
        resolve_url(&self.config.uri(), path)
    }

    pub async fn get(&self, path: &str, options: RequestOptions) -> Result<JsonObject, Error> {
        self.request(Method::GET, path, options).await
    }

    pub async fn post(&self, path: &str, options: RequestOptions) -> Result<JsonObject, Error> {
        self.request(Method::POST, path, options).await
    }

    pub async fn put(&self, path: &str, options: RequestOptions) -> Result<JsonObject, Error> {
        self.request(Method::PUT, path, options).await
    }

    pub async fn delete(&self, path: &str, options: RequestOptions) -> Result<JsonObject, Error> {
        self.request(Method::DELETE, path, options).await
    }

    /// Sends a request and decodes the response body.
    ///
    /// An empty body (e.g. `204 No Content`) decodes to an empty object.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        options: RequestOptions,
    ) -> Result<JsonObject, Error> {
        let response = self.send(method, path, options).await?;
        if response.body.is_empty() {
            return Ok(JsonObject::new());
        }
        self.deserialize(&response)
    }

    /// Sends a request and returns the raw response.
    ///
    /// Failing statuses are mapped to [`Error::Http`] unless
    /// `options.auto_raise` is false once hooks have run.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        mut options: RequestOptions,
    ) -> Result<Response, Error> {
        let config = self.config.snapshot();
        let url = resolve_url(&config.uri(), path)?;

        if options.api_key.is_none() {
            options.api_key = config.api_key_secret.clone();
        }
        if !options.headers.contains_key(ACCEPT) {
            options.headers.insert(ACCEPT, header_value(&config.accept())?);
        }
        if !options.headers.contains_key(USER_AGENT) {
            options
                .headers
                .insert(USER_AGENT, header_value(&config.user_agent)?);
        }

        self.hooks.run(self, &method, &url, &mut options)?;

        debug!(%method, %url, "dispatching request");
        let auto_raise = options.auto_raise;
        let response = self
            .transport
            .execute(Request {
                method,
                url,
                options,
            })
            .await?;
        debug!(status = response.status.as_u16(), url = %response.url, "received response");

        if auto_raise {
            self.raise_for_status(&response)?;
        }
        Ok(response)
    }

    /// Decodes a JSON response body.
    ///
    /// Any other content type is an [`Error::Balanced`] carrying the raw body.
    pub fn deserialize(&self, response: &Response) -> Result<JsonObject, Error> {
        deserialize(response)
    }

    /// Maps a failing response to the matching API error.
    pub fn raise_for_status(&self, response: &Response) -> Result<(), Error> {
        raise_api_error(self, response)
    }
}

impl ResponseDeserializer for HttpClient {
    fn deserialize(&self, response: &Response) -> Result<JsonObject, Error> {
        deserialize(response)
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("uri", &self.config.uri())
            .field("hooks", &self.hooks)
            .finish_non_exhaustive()
    }
}

/// Decodes `response` as a JSON object if its content type says JSON.
pub fn deserialize(response: &Response) -> Result<JsonObject, Error> {
    let is_json = response
        .content_type()
        .is_some_and(|ct| ct.to_ascii_lowercase().contains("application/json"));
    if !is_json {
        return Err(Error::Balanced(response.text().into_owned()));
    }
    Ok(serde_json::from_slice(&response.body)?)
}

/// Builds a status check that turns failing responses into API errors.
///
/// The returned closure passes healthy responses through. For a 4xx/5xx it
/// decodes the body with `deserializer` and returns the error kind selected
/// by the body's `category_code`, or [`ErrorKind::Http`] when the code is
/// missing or unknown. A body that does not decode still yields an
/// [`HttpError`] carrying the response status and raw text.
pub fn wrap_raise_for_status<D>(
    deserializer: &D,
) -> impl Fn(&Response) -> Result<(), Error> + '_
where
    D: ResponseDeserializer + ?Sized,
{
    move |response| raise_api_error(deserializer, response)
}

fn raise_api_error<D>(deserializer: &D, response: &Response) -> Result<(), Error>
where
    D: ResponseDeserializer + ?Sized,
{
    if let Err(status_err) = response.raise_for_status() {
        debug!(error = %status_err, "decoding error response");
        let body = match deserializer.deserialize(response) {
            Ok(body) => body,
            Err(decode_err) => {
                debug!(error = %decode_err, "error body is not a JSON object");
                JsonObject::new()
            }
        };
        let err = http_error(&body, response);
        warn!(
            status = err.status_code,
            kind = %err.kind,
            category_code = err.category_code.as_deref().unwrap_or(""),
            "API request failed"
        );
        return Err(err.into());
    }
    Ok(())
}

fn http_error(body: &JsonObject, response: &Response) -> HttpError {
    let fields = ApiErrorBody::from_object(body);
    let kind = fields
        .category_code
        .as_deref()
        .and_then(kind_for_category_code)
        .or_else(|| {
            fields
                .redirect_uri
                .as_ref()
                .map(|_| ErrorKind::MoreInformationRequired)
        })
        .unwrap_or(ErrorKind::Http);

    HttpError {
        kind,
        status_code: fields.status_code.unwrap_or(response.status.as_u16()),
        status: fields.status,
        description: fields
            .description
            .unwrap_or_else(|| raw_description(response)),
        additional: fields.additional,
        category_code: fields.category_code,
        redirect_uri: fields.redirect_uri,
        response: response.clone(),
    }
}

// Body text, or the status line when the body is empty.
fn raw_description(response: &Response) -> String {
    let text = response.text();
    if text.trim().is_empty() {
        response.status.to_string()
    } else {
        text.into_owned()
    }
}

fn resolve_url(base: &str, path: &str) -> Result<String, Error> {
    let lower = path.to_ascii_lowercase();
    let url = if lower.starts_with("http://") || lower.starts_with("https://") {
        path.to_string()
    } else {
        format!(
            "{}/{}",
            base.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    };
    Url::parse(&url).map_err(|e| Error::InvalidUrl(format!("{url}: {e}")))?;
    Ok(url)
}

fn header_value(value: &str) -> Result<HeaderValue, Error> {
    HeaderValue::from_str(value).map_err(|e| Error::InvalidHeader(format!("{value:?}: {e}")))
}
