// src/messaging/webhook.rs
//! Named webhook targets and card delivery.

use super::card::CardMessage;
use crate::api::envelope::check_webhook_reply;
use crate::api::types::ApiRequest;
use crate::api::FeishuTransport;
use crate::connector::FeishuConnector;
use crate::constants::DEFAULT_WEBHOOK;
use crate::error::AppError;
use crate::observer::ConnectorEvent;
use crate::types::{ValidatedUrl, ValidationError};
use indexmap::IndexMap;

/// Webhook name to URL mapping. Always holds a `default` entry.
///
/// An entry with an empty URL is registered but disabled: messages for it
/// are skipped like messages for unknown names.
#[derive(Debug, Clone, PartialEq)]
pub struct WebhookRegistry {
    hooks: IndexMap<String, Option<ValidatedUrl>>,
}

impl WebhookRegistry {
    pub fn new<I, K, V>(entries: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: AsRef<str>,
    {
        let mut hooks = IndexMap::new();
        for (name, url) in entries {
            let url = url.as_ref().trim();
            let parsed = if url.is_empty() {
                None
            } else {
                Some(ValidatedUrl::parse(url)?)
            };
            hooks.insert(name.into(), parsed);
        }

        if !hooks.contains_key(DEFAULT_WEBHOOK) {
            return Err(ValidationError::MissingDefaultWebhook);
        }
        Ok(Self { hooks })
    }

    /// A registry with only the `default` target.
    pub fn single(url: &str) -> Result<Self, ValidationError> {
        Self::new([(DEFAULT_WEBHOOK, url)])
    }

    /// The URL for `target`, or `None` for unknown or disabled targets.
    pub fn resolve(&self, target: &str) -> Option<&ValidatedUrl> {
        self.hooks.get(target).and_then(Option::as_ref)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.hooks.keys().map(String::as_str)
    }
}

/// What happened to a card message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookDelivery {
    Delivered { target: String, response: String },
    /// No usable URL for the target; nothing was sent
    Skipped { target: String },
}

impl WebhookDelivery {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered { .. })
    }
}

impl<T: FeishuTransport> FeishuConnector<T> {
    /// Posts a card to the message's target webhook.
    ///
    /// An unknown or disabled target is not an error: the message is
    /// skipped, reported to the observer, and no request is made.
    pub async fn send_card_message(&self, message: &CardMessage) -> Result<WebhookDelivery, AppError> {
        let target = message.target.as_deref().unwrap_or(DEFAULT_WEBHOOK).to_string();

        let Some(url) = self.webhooks().resolve(&target) else {
            self.emit(ConnectorEvent::WebhookSkipped {
                target: target.clone(),
            });
            return Ok(WebhookDelivery::Skipped { target });
        };

        let endpoint = format!("webhook:{}", target);
        let request = ApiRequest::webhook(url.clone()).json(message.to_payload());
        let response = self.transport().execute(request).await?;
        check_webhook_reply(&endpoint, &response)?;

        self.emit(ConnectorEvent::WebhookDelivered {
            target: target.clone(),
            response: response.data.clone(),
        });
        Ok(WebhookDelivery::Delivered {
            target,
            response: response.data,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_requires_default() {
        assert!(matches!(
            WebhookRegistry::new([("ops", "https://hook.example/ops")]),
            Err(ValidationError::MissingDefaultWebhook)
        ));
        assert!(WebhookRegistry::new([("default", "not a url")]).is_err());
    }

    #[test]
    fn test_resolution() {
        let registry = WebhookRegistry::new([
            ("default", "https://hook.example/default"),
            ("ops", "https://hook.example/ops"),
            ("muted", ""),
        ])
        .unwrap();

        assert_eq!(
            registry.resolve("ops").unwrap().as_str(),
            "https://hook.example/ops"
        );
        assert!(registry.resolve("muted").is_none());
        assert!(registry.resolve("unknown").is_none());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["default", "ops", "muted"]);
    }
}
