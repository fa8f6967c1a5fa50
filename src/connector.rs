// src/connector.rs
//! The connector: one authenticated session against the open platform.

use crate::api::envelope::parse_envelope;
use crate::api::types::ApiRequest;
use crate::api::{ClientSettings, FeishuHttpClient, FeishuTransport};
use crate::error::AppError;
use crate::messaging::WebhookRegistry;
use crate::observer::{ConnectorEvent, ConnectorObserver, LogObserver};
use crate::types::{AccessToken, AppCredentials};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Client for wiki, sheet, bitable and webhook operations.
///
/// Construction and authentication are separate steps: a connector that
/// only posts to webhooks never needs credentials. The token is held for
/// the connector's lifetime and replaced only by authenticating again.
pub struct FeishuConnector<T: FeishuTransport = FeishuHttpClient> {
    transport: T,
    credentials: Option<AppCredentials>,
    token: Option<AccessToken>,
    webhooks: WebhookRegistry,
    observer: Arc<dyn ConnectorObserver>,
}

impl FeishuConnector<FeishuHttpClient> {
    /// Creates an unauthenticated connector over HTTP.
    pub fn new(settings: &ClientSettings, webhooks: WebhookRegistry) -> Result<Self, AppError> {
        Ok(Self::with_transport(
            FeishuHttpClient::new(settings)?,
            webhooks,
        ))
    }

    /// Creates a connector over HTTP and authenticates it.
    pub async fn connect(
        settings: &ClientSettings,
        webhooks: WebhookRegistry,
        credentials: AppCredentials,
    ) -> Result<Self, AppError> {
        let mut connector = Self::new(settings, webhooks)?;
        connector.authenticate(credentials).await?;
        Ok(connector)
    }
}

impl<T: FeishuTransport> FeishuConnector<T> {
    pub fn with_transport(transport: T, webhooks: WebhookRegistry) -> Self {
        Self {
            transport,
            credentials: None,
            token: None,
            webhooks,
            observer: Arc::new(LogObserver),
        }
    }

    /// Replaces the event sink (defaults to `LogObserver`).
    pub fn with_observer(mut self, observer: Arc<dyn ConnectorObserver>) -> Self {
        self.observer = observer;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn webhooks(&self) -> &WebhookRegistry {
        &self.webhooks
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    /// The current token, or `NotAuthenticated`.
    pub fn access_token(&self) -> Result<&AccessToken, AppError> {
        self.token.as_ref().ok_or(AppError::NotAuthenticated)
    }

    pub(crate) fn credentials(&self) -> Option<&AppCredentials> {
        self.credentials.as_ref()
    }

    pub(crate) fn set_session(&mut self, credentials: AppCredentials, token: AccessToken) {
        self.credentials = Some(credentials);
        self.token = Some(token);
    }

    pub(crate) fn emit(&self, event: ConnectorEvent) {
        self.observer.on_event(&event);
    }

    /// Sends an authorized API request and decodes the envelope's `data`.
    pub(crate) async fn call<R>(&self, request: ApiRequest) -> Result<R, AppError>
    where
        R: DeserializeOwned,
    {
        let token = self.access_token()?;
        let request = request.bearer(token);
        let endpoint = request.endpoint();
        let response = self.transport.execute(request).await?;
        parse_envelope(&endpoint, response)
    }
}
