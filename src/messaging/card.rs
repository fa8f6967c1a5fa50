// src/messaging/card.rs
//! Interactive chat-card payloads.

use crate::types::{ImageKey, ValidatedUrl};
use serde_json::{json, Value};

/// A link button rendered under the card body.
#[derive(Debug, Clone, PartialEq)]
pub struct CardButton {
    pub label: String,
    pub url: ValidatedUrl,
}

impl CardButton {
    pub fn new(label: impl Into<String>, url: ValidatedUrl) -> Self {
        Self {
            label: label.into(),
            url,
        }
    }
}

/// One element of a card body.
#[derive(Debug, Clone, PartialEq)]
pub enum CardElement {
    /// Markdown text block
    Markdown(String),
    /// An uploaded image with a caption
    Image { title: String, image_key: ImageKey },
    /// Any element the typed variants do not cover, passed through as-is
    Raw(Value),
}

impl CardElement {
    pub fn to_json(&self) -> Value {
        match self {
            Self::Markdown(content) => json!({
                "tag": "div",
                "text": { "content": content, "tag": "lark_md" }
            }),
            Self::Image { title, image_key } => json!({
                "tag": "img",
                "title": { "tag": "plain_text", "content": title },
                "img_key": image_key.as_str(),
                "mode": "fit_horizontal",
                "alt": { "tag": "plain_text", "content": "" },
                "compact_width": true
            }),
            Self::Raw(value) => value.clone(),
        }
    }
}

/// Card body: either plain text or an explicit element list.
#[derive(Debug, Clone, PartialEq)]
pub enum CardBody {
    Text(String),
    Elements(Vec<CardElement>),
}

impl Default for CardBody {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// Everything a webhook card message can carry.
///
/// Defaults: `target` unset (the `default` webhook), empty `title`, empty
/// text body, no buttons, `success = true` (green header).
#[derive(Debug, Clone, PartialEq)]
pub struct CardMessage {
    pub target: Option<String>,
    pub title: String,
    pub body: CardBody,
    pub buttons: Vec<CardButton>,
    pub success: bool,
}

impl Default for CardMessage {
    fn default() -> Self {
        Self {
            target: None,
            title: String::new(),
            body: CardBody::default(),
            buttons: Vec::new(),
            success: true,
        }
    }
}

impl CardMessage {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn target(mut self, target: impl Into<String>) -> Self {
        self.target = Some(target.into());
        self
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.body = CardBody::Text(content.into());
        self
    }

    /// Replaces the text body with an explicit element list.
    pub fn elements(mut self, elements: Vec<CardElement>) -> Self {
        self.body = CardBody::Elements(elements);
        self
    }

    pub fn button(mut self, button: CardButton) -> Self {
        self.buttons.push(button);
        self
    }

    pub fn success(mut self, success: bool) -> Self {
        self.success = success;
        self
    }

    /// Header color template: green on success, red otherwise.
    pub fn template(&self) -> &'static str {
        if self.success {
            "green"
        } else {
            "red"
        }
    }

    /// The `interactive` message payload posted to the webhook.
    pub fn to_payload(&self) -> Value {
        let mut elements: Vec<Value> = match &self.body {
            CardBody::Text(content) => vec![CardElement::Markdown(content.clone()).to_json()],
            CardBody::Elements(elements) => elements.iter().map(CardElement::to_json).collect(),
        };

        if !self.buttons.is_empty() {
            let actions: Vec<Value> = self
                .buttons
                .iter()
                .map(|button| {
                    json!({
                        "tag": "button",
                        "text": { "content": button.label, "tag": "plain_text" },
                        "type": "primary",
                        "url": button.url.as_str()
                    })
                })
                .collect();
            elements.push(json!({ "actions": actions, "tag": "action" }));
        }

        json!({
            "msg_type": "interactive",
            "card": {
                "config": { "wide_screen_mode": true },
                "elements": elements,
                "header": {
                    "template": self.template(),
                    "title": { "content": self.title, "tag": "plain_text" }
                }
            }
        })
    }
}
