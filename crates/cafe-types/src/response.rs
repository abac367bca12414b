//! Response envelopes
//!
//! Every body the API returns is a single-key JSON object: the key names
//! what the payload is (`cafe`, `cafes`, `response`, `success`, `error`).

use crate::Cafe;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// `{"cafe": {...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CafeResponse {
    pub cafe: Cafe,
}

/// `{"cafes": [...]}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CafeListResponse {
    pub cafes: Vec<Cafe>,
}

/// `{"success": "<message>"}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuccessMessage {
    pub success: String,
}

impl SuccessMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: message.into(),
        }
    }
}

/// Body returned after a cafe was added: `{"response": {"success": ...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddedResponse {
    pub response: SuccessMessage,
}

/// Body returned after an update or delete: `{"success": {"success": ...}}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    pub success: SuccessMessage,
}

/// `{"error": {"<Reason>": "<message>"}}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: BTreeMap<String, String>,
}

impl ErrorResponse {
    pub fn new(reason: impl Into<String>, message: impl Into<String>) -> Self {
        let mut error = BTreeMap::new();
        error.insert(reason.into(), message.into());
        Self { error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_body_shape() {
        let body = ErrorResponse::new("Not Found", "Sorry, no cafe.");
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({ "error": { "Not Found": "Sorry, no cafe." } })
        );
    }

    #[test]
    fn test_success_envelopes() {
        let added = AddedResponse {
            response: SuccessMessage::new("Successfully added the new cafe."),
        };
        assert_eq!(
            serde_json::to_value(&added).unwrap(),
            json!({ "response": { "success": "Successfully added the new cafe." } })
        );

        let updated = SuccessResponse {
            success: SuccessMessage::new("Successfully updated the price."),
        };
        assert_eq!(
            serde_json::to_value(&updated).unwrap()["success"]["success"],
            "Successfully updated the price."
        );
    }
}
