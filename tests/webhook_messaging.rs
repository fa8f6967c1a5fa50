// tests/webhook_messaging.rs
//! Card delivery to named webhooks.

mod common;

use common::*;
use feishu_connector::api::types::RequestTarget;
use feishu_connector::{
    AppError, CardMessage, ClientSettings, ConnectorEvent, FeishuConnector, RecordingObserver,
    ScriptedTransport, WebhookDelivery, WebhookRegistry,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

fn webhook_only(registry: WebhookRegistry) -> FeishuConnector<ScriptedTransport> {
    FeishuConnector::with_transport(ScriptedTransport::new(), registry)
}

#[tokio::test]
async fn unknown_target_is_skipped_without_a_request() {
    let observer = Arc::new(RecordingObserver::new());
    let connector = webhook_only(registry()).with_observer(observer.clone());

    let delivery = connector
        .send_card_message(&CardMessage::new("T").target("finance"))
        .await
        .unwrap();

    assert_eq!(
        delivery,
        WebhookDelivery::Skipped {
            target: "finance".to_string()
        }
    );
    assert_eq!(connector.transport().request_count(), 0);
    assert_eq!(
        observer.warnings(),
        vec![ConnectorEvent::WebhookSkipped {
            target: "finance".to_string()
        }]
    );
}

#[tokio::test]
async fn disabled_default_is_skipped() {
    let connector = webhook_only(WebhookRegistry::single("").unwrap());
    let delivery = connector
        .send_card_message(&CardMessage::new("T"))
        .await
        .unwrap();
    assert!(!delivery.is_delivered());
    assert_eq!(connector.transport().request_count(), 0);
}

#[tokio::test]
async fn named_target_posts_to_its_url_without_a_token() {
    let connector = webhook_only(registry());
    connector
        .transport()
        .push_json(json!({"StatusCode": 0, "StatusMessage": "success"}));

    let delivery = connector
        .send_card_message(&CardMessage::new("Deploy").content("done").target("ops"))
        .await
        .unwrap();
    assert!(delivery.is_delivered());

    let request = &connector.transport().requests()[0];
    match &request.target {
        RequestTarget::Absolute(url) => assert_eq!(url.as_str(), "https://hook.example/ops"),
        other => panic!("unexpected target {:?}", other),
    }
    assert!(request.bearer.is_none());
}

#[tokio::test]
async fn bot_error_code_is_a_remote_error() {
    let connector = webhook_only(registry());
    connector
        .transport()
        .push_json(json!({"code": 19021, "msg": "sign match fail or timestamp is not within one hour from current time"}));

    let err = connector
        .send_card_message(&CardMessage::new("T"))
        .await
        .unwrap_err();
    match err {
        AppError::RemoteApi { endpoint, .. } => assert_eq!(endpoint, "webhook:default"),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn failed_card_reaches_the_default_webhook() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/x"))
        .and(header("content-type", "application/json; charset=utf-8"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"StatusCode": 0, "StatusMessage": "success", "code": 0})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let registry = WebhookRegistry::new([("default", format!("{}/x", server.uri()))]).unwrap();
    let connector = FeishuConnector::new(&ClientSettings::default(), registry).unwrap();

    let message = CardMessage::new("T").content("body").success(false);
    let delivery = connector.send_card_message(&message).await.unwrap();
    assert!(delivery.is_delivered());

    let received = server.received_requests().await.unwrap();
    assert_eq!(received.len(), 1);
    let payload: Value = received[0].body_json().unwrap();
    assert_eq!(
        payload,
        json!({
            "msg_type": "interactive",
            "card": {
                "config": {"wide_screen_mode": true},
                "elements": [{"tag": "div", "text": {"content": "body", "tag": "lark_md"}}],
                "header": {"template": "red", "title": {"content": "T", "tag": "plain_text"}}
            }
        })
    );
}
