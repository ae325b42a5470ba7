//! Wire types for API responses.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A decoded JSON response body: string keys to arbitrary JSON values.
pub type JsonObject = serde_json::Map<String, Value>;

/// Error document returned alongside a failing status.
///
/// Fields are read leniently: the API has shipped both the bare shape and an
/// `{"errors": [...]}` envelope, and not every error fills every field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiErrorBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_code: Option<String>,
    /// Follow-up location when the API needs more information (e.g. 3-D Secure).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redirect_uri: Option<String>,
}

impl ApiErrorBody {
    /// Extracts the error fields from a decoded response body.
    ///
    /// When the body is an `errors` envelope the first entry is used.
    pub fn from_object(body: &JsonObject) -> Self {
        let source = match body.get("errors").and_then(Value::as_array) {
            Some(errors) => match errors.first().and_then(Value::as_object) {
                Some(first) => first,
                None => body,
            },
            None => body,
        };

        Self {
            status: string_field(source, "status"),
            status_code: source.get("status_code").and_then(|v| match v {
                Value::Number(n) => n.as_u64().and_then(|n| u16::try_from(n).ok()),
                Value::String(s) => s.parse().ok(),
                _ => None,
            }),
            description: string_field(source, "description"),
            additional: string_field(source, "additional"),
            category_code: string_field(source, "category_code"),
            redirect_uri: string_field(source, "redirect_uri"),
        }
    }
}

fn string_field(object: &JsonObject, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn object(value: Value) -> JsonObject {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_flat_error_body() {
        let body = ApiErrorBody::from_object(&object(json!({
            "status": "Bad Request",
            "status_code": 400,
            "description": "must be a valid email address",
            "additional": null,
            "category_code": "request"
        })));
        assert_eq!(body.status.as_deref(), Some("Bad Request"));
        assert_eq!(body.status_code, Some(400));
        assert_eq!(body.description.as_deref(), Some("must be a valid email address"));
        assert_eq!(body.additional, None);
        assert_eq!(body.category_code.as_deref(), Some("request"));
    }

    #[test]
    fn test_errors_envelope_uses_first_entry() {
        let body = ApiErrorBody::from_object(&object(json!({
            "errors": [
                {"status_code": "409", "category_code": "bank-account-authentication-failed"},
                {"status_code": 400, "category_code": "ignored"}
            ]
        })));
        assert_eq!(body.status_code, Some(409));
        assert_eq!(
            body.category_code.as_deref(),
            Some("bank-account-authentication-failed")
        );
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(ApiErrorBody::from_object(&JsonObject::new()), ApiErrorBody::default());
    }
}
