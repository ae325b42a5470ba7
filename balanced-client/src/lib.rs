//! # Balanced Client SDK
//!
//! A typed Rust client for the Balanced payments API.
//!
//! ## Architecture
//!
//! - `config/` - Shared configuration handle (API key, root URI, version)
//! - `key_switch/` - Scoped API key override
//! - `hooks/` - Callbacks run before each request
//! - `request/` - Per-request options
//! - `transport/` - The HTTP seam and its `reqwest` implementation
//! - `client/` - Dispatch pipeline, body decoding and error mapping
//! - `error/` - Client error type
//!
//! ```no_run
//! use balanced_client::{HttpClient, RequestOptions, SharedConfig};
//!
//! # async fn run() -> Result<(), balanced_client::Error> {
//! let config = SharedConfig::new();
//! config.configure(Some("ak-test-secret"));
//!
//! let client = HttpClient::with_config(config);
//! let customer = client.get("customers/CU123", RequestOptions::new()).await?;
//! println!("{customer:?}");
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod error;
pub mod hooks;
pub mod key_switch;
pub mod request;
pub mod transport;

pub use balanced_types::{ApiErrorBody, Config, ErrorKind, JsonObject};
pub use client::{HttpClient, ResponseDeserializer, deserialize, wrap_raise_for_status};
pub use config::SharedConfig;
pub use error::{Error, HttpError};
pub use hooks::{BeforeRequest, HookRegistry};
pub use key_switch::KeySwitch;
pub use request::RequestOptions;
pub use transport::{ReqwestTransport, Request, Response, Transport};

/// Re-export commonly used types
pub use reqwest::{Method, StatusCode, header};

/// Sets the API key on the process-wide configuration.
///
/// `None` or an empty string clears it.
pub fn configure(api_key_secret: Option<&str>) {
    SharedConfig::global().configure(api_key_secret);
}

/// Overrides the process-wide API key until the guard is dropped.
pub fn key_switcher(api_key_secret: impl Into<String>) -> KeySwitch {
    SharedConfig::global().with_key(api_key_secret)
}
