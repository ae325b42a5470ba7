//! # Balanced Types
//!
//! Plain data shared by the Balanced API client and its command line front end.
//! This crate has ZERO IO dependencies - only the configuration record, the
//! error taxonomy and the wire shapes the API sends back.
//!
//! ## Layout
//!
//! - `config/` - The configuration record and its derived values
//! - `error/` - Error kinds and the category-code lookup table
//! - `dto/` - Wire types for API responses

pub mod config;
pub mod dto;
pub mod error;

// Re-export commonly used types
pub use config::{Config, DEFAULT_API_VERSION, DEFAULT_ROOT_URI};
pub use dto::{ApiErrorBody, JsonObject};
pub use error::{
    BANK_ACCOUNT_VERIFICATION_FAILURES, ErrorKind, category_code_map, kind_for_category_code,
};
