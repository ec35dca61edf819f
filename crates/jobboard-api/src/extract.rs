//! Request payload extraction.
//!
//! Mutating endpoints accept either a JSON body or a multipart form with an
//! optional `file` part (profile photo, resume, logo). Both shapes reduce to
//! the same flat string map handed to the validation layer, so handlers and
//! validators never care which encoding the client picked.

use std::collections::HashMap;

use axum::extract::{FromRequest, Multipart, Request};
use axum::http::header::CONTENT_TYPE;
use axum::{Form, Json};

use jobboard_models::FieldMap;

use crate::error::ApiError;
use crate::state::AppState;

/// Uploaded files are capped at 5MB.
const MAX_FILE_BYTES: usize = 5 * 1024 * 1024;

/// The multipart part name carrying the attachment.
const FILE_FIELD: &str = "file";

/// An uploaded attachment, held in memory until forwarded to object storage.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Parsed request payload: flat text fields plus an optional attachment.
#[derive(Debug, Default)]
pub struct FormPayload {
    pub fields: FieldMap,
    pub file: Option<UploadedFile>,
}

fn allowed_file_type(content_type: &str) -> bool {
    content_type.starts_with("image/") || content_type == "application/pdf"
}

#[axum::async_trait]
impl FromRequest<AppState> for FormPayload {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &AppState) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if content_type.starts_with("multipart/form-data") {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?;
            return from_multipart(multipart).await;
        }

        if content_type.starts_with("application/x-www-form-urlencoded") {
            let Form(fields): Form<HashMap<String, String>> = Form::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(format!("Invalid form body: {}", e)))?;
            return Ok(Self { fields, file: None });
        }

        if content_type.starts_with("application/json") {
            let Json(value): Json<serde_json::Value> = Json::from_request(req, state)
                .await
                .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))?;
            return Ok(Self {
                fields: flatten_json(value),
                file: None,
            });
        }

        // No recognized body; validation reports the missing fields.
        Ok(Self::default())
    }
}

async fn from_multipart(mut multipart: Multipart) -> Result<FormPayload, ApiError> {
    let mut fields = FieldMap::new();
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();

        if name == FILE_FIELD && field.file_name().is_some() {
            let filename = field.file_name().unwrap_or_default().to_string();
            let content_type = field
                .content_type()
                .unwrap_or("application/octet-stream")
                .to_string();

            if !allowed_file_type(&content_type) {
                return Err(ApiError::bad_request(
                    "Invalid file type. Only images and PDFs are allowed.",
                ));
            }

            let data = field
                .bytes()
                .await
                .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?;

            if data.len() > MAX_FILE_BYTES {
                return Err(ApiError::bad_request("File too large. Maximum size is 5MB."));
            }

            file = Some(UploadedFile {
                filename,
                content_type,
                data: data.to_vec(),
            });
        } else {
            let value = field
                .text()
                .await
                .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?;
            fields.insert(name, value);
        }
    }

    Ok(FormPayload { fields, file })
}

/// Reduce a JSON object to flat string fields. Scalars stringify; nested
/// values and nulls are treated as absent.
fn flatten_json(value: serde_json::Value) -> FieldMap {
    let mut fields = FieldMap::new();
    if let serde_json::Value::Object(map) = value {
        for (key, value) in map {
            let text = match value {
                serde_json::Value::String(s) => s,
                serde_json::Value::Number(n) => n.to_string(),
                serde_json::Value::Bool(b) => b.to_string(),
                _ => continue,
            };
            fields.insert(key, text);
        }
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_flatten_json_scalars() {
        let fields = flatten_json(json!({
            "fullname": "A",
            "phoneNumber": 1234567890u64,
            "salary": "90000",
            "remote": true,
        }));
        assert_eq!(fields["fullname"], "A");
        assert_eq!(fields["phoneNumber"], "1234567890");
        assert_eq!(fields["salary"], "90000");
        assert_eq!(fields["remote"], "true");
    }

    #[test]
    fn test_flatten_json_skips_nested_and_null() {
        let fields = flatten_json(json!({
            "skills": ["rust", "axum"],
            "profile": { "bio": "x" },
            "bio": null,
        }));
        assert!(fields.is_empty());
    }

    #[test]
    fn test_flatten_json_non_object() {
        assert!(flatten_json(json!("just a string")).is_empty());
        assert!(flatten_json(json!([1, 2, 3])).is_empty());
    }

    #[test]
    fn test_allowed_file_types() {
        assert!(allowed_file_type("image/png"));
        assert!(allowed_file_type("image/jpeg"));
        assert!(allowed_file_type("application/pdf"));
        assert!(!allowed_file_type("application/zip"));
        assert!(!allowed_file_type("text/html"));
    }
}
