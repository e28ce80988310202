// src/api/parser.rs
//! Response checks and JSON decoding shared by all service clients.

use super::client::ApiResponse;
use crate::error::{AppError, Service};
use serde::de::DeserializeOwned;
use serde_json::Value;

/// Turns a non-2xx response into an `HttpStatus` error.
pub fn ensure_success(service: Service, response: &ApiResponse<Vec<u8>>) -> Result<(), AppError> {
    if response.status.is_success() {
        return Ok(());
    }
    let body = String::from_utf8_lossy(&response.data);
    Err(AppError::http_status(
        service,
        response.status,
        response.url.clone(),
        &body,
    ))
}

/// Decodes a successful response body as JSON; an empty body is `null`.
pub fn parse_json_body(service: Service, response: &ApiResponse<Vec<u8>>) -> Result<Value, AppError> {
    if response.data.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(&response.data).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", response.url, e);
        AppError::Parse {
            service,
            message: e.to_string(),
        }
    })
}

/// Deserializes an already decoded JSON value into a typed response.
pub fn decode<T: DeserializeOwned>(service: Service, value: Value) -> Result<T, AppError> {
    serde_json::from_value(value).map_err(|e| AppError::Parse {
        service,
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    fn response(status: StatusCode, body: &str) -> ApiResponse<Vec<u8>> {
        ApiResponse {
            data: body.as_bytes().to_vec(),
            status,
            url: "https://api.notion.com/v1/pages".to_string(),
        }
    }

    #[test]
    fn non_success_status_is_an_error() {
        let err = ensure_success(
            Service::Notion,
            &response(StatusCode::BAD_REQUEST, r#"{"code":"validation_error"}"#),
        )
        .unwrap_err();
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert!(err.to_string().contains("validation_error"));
    }

    #[test]
    fn empty_body_is_null() {
        let value = parse_json_body(Service::GoogleDrive, &response(StatusCode::NO_CONTENT, ""))
            .unwrap();
        assert!(value.is_null());
    }

    #[test]
    fn malformed_body_is_a_parse_error() {
        let err = parse_json_body(Service::Anthropic, &response(StatusCode::OK, "{not json"))
            .unwrap_err();
        assert!(matches!(
            err,
            AppError::Parse {
                service: Service::Anthropic,
                ..
            }
        ));
    }
}
