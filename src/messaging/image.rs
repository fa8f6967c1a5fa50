// src/messaging/image.rs
//! Image upload, image cards and best-effort table snapshots.

use super::card::{CardElement, CardMessage};
use super::webhook::WebhookDelivery;
use crate::api::envelope::parse_envelope;
use crate::api::responses::ImageData;
use crate::api::types::ApiRequest;
use crate::api::FeishuTransport;
use crate::connector::FeishuConnector;
use crate::error::AppError;
use crate::observer::ConnectorEvent;
use crate::types::{ImageKey, Table};

pub const IMAGE_UPLOAD_ENDPOINT: &str = "/im/v1/images";

/// Turns a table into PNG bytes. Rendering itself lives outside this crate.
pub trait TableRenderer: Send + Sync {
    fn render_png(&self, table: &Table) -> Result<Vec<u8>, AppError>;
}

impl<F> TableRenderer for F
where
    F: Fn(&Table) -> Result<Vec<u8>, AppError> + Send + Sync,
{
    fn render_png(&self, table: &Table) -> Result<Vec<u8>, AppError> {
        self(table)
    }
}

impl<T: FeishuTransport> FeishuConnector<T> {
    /// Uploads an image for use in messages and returns its key.
    pub async fn upload_image(
        &self,
        bytes: Vec<u8>,
        file_name: &str,
    ) -> Result<ImageKey, AppError> {
        let request = ApiRequest::post(IMAGE_UPLOAD_ENDPOINT)
            .image(file_name, bytes)
            .bearer(self.access_token()?);
        let response = self.transport().execute(request).await?;
        let log_id = response.log_id.clone();
        let data: ImageData = parse_envelope(IMAGE_UPLOAD_ENDPOINT, response)?;
        let image_key = ImageKey::parse(&data.image_key)?;

        self.emit(ConnectorEvent::ImageUploaded {
            image_key: image_key.to_string(),
            log_id,
        });
        Ok(image_key)
    }

    /// Uploads an image and posts a card whose only element is that image.
    pub async fn send_image(
        &self,
        bytes: Vec<u8>,
        title: &str,
        target: Option<&str>,
    ) -> Result<WebhookDelivery, AppError> {
        let image_key = self.upload_image(bytes, "image.png").await?;
        let mut message = CardMessage::new(title).elements(vec![CardElement::Image {
            title: title.to_string(),
            image_key,
        }]);
        message.target = target.map(str::to_string);
        self.send_card_message(&message).await
    }

    /// Renders `table` and sends it as an image card.
    ///
    /// Never fails: rendering, upload and delivery errors are reported to
    /// the observer and dropped.
    pub async fn send_table_snapshot(
        &self,
        table: &Table,
        title: &str,
        target: Option<&str>,
        renderer: &dyn TableRenderer,
    ) {
        let outcome = match renderer.render_png(table) {
            Ok(bytes) => self.send_image(bytes, title, target).await,
            Err(e) => Err(e),
        };

        if let Err(e) = outcome {
            self.emit(ConnectorEvent::SnapshotFailed {
                title: title.to_string(),
                error: e.to_string(),
            });
        }
    }
}
