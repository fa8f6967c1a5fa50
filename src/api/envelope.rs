// src/api/envelope.rs
//! Response envelope parsing.
//!
//! Every open platform response is `{code, msg, data}` and `code == 0` is
//! the only success value, whatever the HTTP status says.

use super::types::ApiResponse;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{AppError, FeishuErrorCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct RawEnvelope {
    code: Option<i64>,
    #[serde(default)]
    msg: Option<String>,
    #[serde(default)]
    data: Value,
}

/// Truncates a body for log lines.
pub(crate) fn preview(body: &str) -> String {
    if body.chars().count() > ERROR_BODY_PREVIEW_LENGTH {
        let head: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        format!("{}...", head)
    } else {
        body.to_string()
    }
}

/// Decodes the `data` member of a successful envelope into `T`.
///
/// A missing `data` member decodes as `null`, so `Option` and
/// `#[serde(default)]` targets survive empty responses.
pub fn parse_envelope<T>(endpoint: &str, response: ApiResponse<String>) -> Result<T, AppError>
where
    T: DeserializeOwned,
{
    let data = check_envelope(endpoint, response)?;
    serde_json::from_value(data).map_err(|e| {
        log::error!("Failed to decode data from {}: {}", endpoint, e);
        AppError::MalformedResponse {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        }
    })
}

/// Validates the envelope and returns its raw `data` member.
pub fn check_envelope(endpoint: &str, response: ApiResponse<String>) -> Result<Value, AppError> {
    let envelope: RawEnvelope = match serde_json::from_str(&response.data) {
        Ok(envelope) => envelope,
        Err(e) if response.status.is_success() => {
            log::error!(
                "Unparseable response from {}: {} ({})",
                endpoint,
                e,
                preview(&response.data)
            );
            return Err(AppError::MalformedResponse {
                endpoint: endpoint.to_string(),
                message: e.to_string(),
            });
        }
        Err(_) => {
            return Err(AppError::RemoteApi {
                endpoint: endpoint.to_string(),
                code: FeishuErrorCode::Missing,
                body: format!("HTTP {}: {}", response.status, response.data),
            });
        }
    };

    if envelope.code != Some(0) {
        log::warn!(
            "{} returned code {:?} ({}), log id {}",
            endpoint,
            envelope.code,
            envelope.msg.as_deref().unwrap_or(""),
            response.log_id.as_deref().unwrap_or("-")
        );
        return Err(AppError::RemoteApi {
            endpoint: endpoint.to_string(),
            code: FeishuErrorCode::from_code(envelope.code),
            body: response.data,
        });
    }

    Ok(envelope.data)
}

/// Checks a webhook reply. Bots report failure through a non-zero `code`
/// or legacy `StatusCode`; a body carrying neither is accepted when the
/// HTTP status is a success.
pub fn check_webhook_reply(endpoint: &str, response: &ApiResponse<String>) -> Result<(), AppError> {
    let code = serde_json::from_str::<Value>(&response.data).ok().and_then(|v| {
        let codes: Vec<i64> = ["code", "StatusCode"]
            .iter()
            .filter_map(|key| v.get(*key).and_then(Value::as_i64))
            .collect();
        codes.iter().copied().find(|c| *c != 0).or(codes.first().copied())
    });

    match code {
        Some(0) => Ok(()),
        Some(other) => Err(AppError::RemoteApi {
            endpoint: endpoint.to_string(),
            code: FeishuErrorCode::from_code(Some(other)),
            body: response.data.clone(),
        }),
        None if response.status.is_success() => Ok(()),
        None => Err(AppError::RemoteApi {
            endpoint: endpoint.to_string(),
            code: FeishuErrorCode::Missing,
            body: format!("HTTP {}: {}", response.status, response.data),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;
    use serde_json::json;

    #[derive(Debug, Deserialize, Default)]
    struct Items {
        #[serde(default)]
        items: Vec<u32>,
    }

    #[test]
    fn test_success_envelope_decodes_data() {
        let response = ApiResponse::ok(json!({"code": 0, "data": {"items": [1, 2]}}).to_string());
        let items: Items = parse_envelope("/x", response).unwrap();
        assert_eq!(items.items, vec![1, 2]);
    }

    #[test]
    fn test_missing_data_decodes_as_null() {
        let response = ApiResponse::ok(json!({"code": 0, "msg": "ok"}).to_string());
        let data: Option<Items> = parse_envelope("/x", response).unwrap();
        assert!(data.is_none());
    }

    #[test]
    fn test_non_zero_code_fails_even_on_http_200() {
        let body = json!({"code": 1254040, "msg": "TableIdNotFound"}).to_string();
        let err = parse_envelope::<Value>("/records", ApiResponse::ok(body.clone())).unwrap_err();
        match err {
            AppError::RemoteApi {
                endpoint,
                code,
                body: raw,
            } => {
                assert_eq!(endpoint, "/records");
                assert_eq!(code, FeishuErrorCode::Other(1254040));
                assert_eq!(raw, body);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_code_is_a_failure() {
        let err = parse_envelope::<Value>("/x", ApiResponse::ok(r#"{"data": {}}"#)).unwrap_err();
        assert_eq!(err.remote_code(), Some(FeishuErrorCode::Missing));
    }

    #[test]
    fn test_unparseable_bodies() {
        let err = parse_envelope::<Value>("/x", ApiResponse::ok("<html>")).unwrap_err();
        assert!(matches!(err, AppError::MalformedResponse { .. }));

        let response = ApiResponse::ok("bad gateway").with_status(StatusCode::BAD_GATEWAY);
        let err = parse_envelope::<Value>("/x", response).unwrap_err();
        assert!(matches!(err, AppError::RemoteApi { .. }));
    }

    #[test]
    fn test_webhook_replies() {
        assert!(check_webhook_reply("hook", &ApiResponse::ok(r#"{"code":0}"#)).is_ok());
        assert!(check_webhook_reply("hook", &ApiResponse::ok("ok")).is_ok());
        assert!(check_webhook_reply("hook", &ApiResponse::ok(r#"{"code":19001}"#)).is_err());
        let failed = ApiResponse::ok("").with_status(StatusCode::NOT_FOUND);
        assert!(check_webhook_reply("hook", &failed).is_err());
    }

    #[test]
    fn test_webhook_status_code_reports_failure() {
        let ok = ApiResponse::ok(r#"{"StatusCode":0,"StatusMessage":"success"}"#);
        assert!(check_webhook_reply("hook", &ok).is_ok());

        let rejected = ApiResponse::ok(r#"{"StatusCode":19024,"StatusMessage":"Key Words Not Found"}"#);
        let err = check_webhook_reply("hook", &rejected).unwrap_err();
        assert_eq!(err.remote_code(), Some(FeishuErrorCode::Other(19024)));

        let mixed = ApiResponse::ok(r#"{"code":0,"StatusCode":19021}"#);
        assert!(check_webhook_reply("hook", &mixed).is_err());
    }
}
