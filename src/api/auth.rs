// src/api/auth.rs
//! Tenant access token issuance.

use super::responses::TenantTokenResponse;
use super::types::ApiRequest;
use super::FeishuTransport;
use crate::connector::FeishuConnector;
use crate::error::AppError;
use crate::observer::ConnectorEvent;
use crate::types::{AccessToken, AppCredentials};
use serde_json::json;

pub const TENANT_TOKEN_ENDPOINT: &str = "/auth/v3/tenant_access_token/internal";

/// Exchanges app credentials for a tenant access token.
///
/// One POST, no retry. Any reply other than `code == 0` with a token is an
/// `Authentication` error carrying the raw body.
pub async fn authenticate<T>(
    transport: &T,
    credentials: &AppCredentials,
) -> Result<AccessToken, AppError>
where
    T: FeishuTransport + ?Sized,
{
    let request = ApiRequest::post(TENANT_TOKEN_ENDPOINT).json(json!({
        "app_id": credentials.app_id.as_str(),
        "app_secret": credentials.app_secret.as_str(),
    }));
    let response = transport.execute(request).await?;
    let body = response.data;

    let parsed: TenantTokenResponse = serde_json::from_str(&body)
        .map_err(|_| AppError::Authentication { body: body.clone() })?;

    match (parsed.code, parsed.tenant_access_token) {
        (Some(0), Some(token)) => {
            AccessToken::new(token).map_err(|_| AppError::Authentication { body })
        }
        _ => Err(AppError::Authentication { body }),
    }
}

impl<T: FeishuTransport> FeishuConnector<T> {
    /// Obtains a token and holds it, together with the credentials, for
    /// later `refresh_token` calls.
    pub async fn authenticate(&mut self, credentials: AppCredentials) -> Result<(), AppError> {
        let token = authenticate(self.transport(), &credentials).await?;
        self.emit(ConnectorEvent::TokenIssued {
            app_id: credentials.app_id.to_string(),
        });
        self.set_session(credentials, token);
        Ok(())
    }

    /// Re-issues the token from the held credentials.
    pub async fn refresh_token(&mut self) -> Result<(), AppError> {
        let credentials = self
            .credentials()
            .cloned()
            .ok_or(AppError::NotAuthenticated)?;
        self.authenticate(credentials).await
    }
}
