// src/messaging/mod.rs
//! Webhook chat messaging: card payloads, named targets and image cards.
//!
//! Messaging is independent of node resolution. Only image upload needs
//! an authenticated connector; plain cards go straight to the webhook.

pub mod card;
pub mod image;
pub mod webhook;

pub use card::{CardBody, CardButton, CardElement, CardMessage};
pub use image::{TableRenderer, IMAGE_UPLOAD_ENDPOINT};
pub use webhook::{WebhookDelivery, WebhookRegistry};
