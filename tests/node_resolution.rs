// tests/node_resolution.rs
//! Resolving wiki nodes to the bitable app that holds a table.

mod common;

use common::*;
use feishu_connector::{AppError, ConnectorEvent, NodeToken, TableId};
use serde_json::{json, Value};

fn sheet_meta(blocks: &[Option<&str>]) -> Value {
    let sheets: Vec<Value> = blocks
        .iter()
        .enumerate()
        .map(|(i, block)| match block {
            Some(token) => json!({
                "sheetId": format!("s{}", i),
                "title": format!("Sheet{}", i),
                "index": i,
                "blockInfo": {"blockToken": token, "blockType": "BITABLE_BLOCK"}
            }),
            None => json!({"sheetId": format!("s{}", i), "title": format!("Sheet{}", i), "index": i}),
        })
        .collect();
    json!({
        "spreadsheetToken": SHEET,
        "properties": {"title": "Weekly metrics", "sheetCount": sheets.len(), "revision": 12},
        "sheets": sheets
    })
}

fn ids() -> (NodeToken, TableId) {
    (NodeToken::parse(NODE).unwrap(), TableId::parse(TABLE).unwrap())
}

#[tokio::test]
async fn bitable_node_resolves_to_its_own_object_token() {
    let connector = authenticated().await;
    connector.transport().push_data(node_data("bitable", APP));

    let (node, table) = ids();
    let app = connector.resolve_table(&node, &table).await.unwrap();
    assert_eq!(app.as_str(), APP);

    let requests = connector.transport().requests();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[1].endpoint(), "/wiki/v2/spaces/get_node");
    assert_eq!(requests[1].query_value("token"), Some(NODE));
    assert_eq!(
        requests[1].bearer.as_ref().map(|t| t.as_str()),
        Some("t-g1044abc")
    );
}

#[tokio::test]
async fn sheet_node_resolves_through_embedded_block() {
    let (connector, observer) = observed().await;
    let transport = connector.transport();
    let embedded = format!("bascnEmbedded_{}", TABLE);
    transport.push_data(node_data("sheet", SHEET));
    transport.push_data(sheet_meta(&[
        None,
        Some("bascnOther_tblOther"),
        Some(embedded.as_str()),
    ]));

    let (node, table) = ids();
    let app = connector.resolve_table(&node, &table).await.unwrap();
    assert_eq!(app.as_str(), "bascnEmbedded");
    assert_eq!(
        transport.requests()[2].endpoint(),
        format!("/sheets/v2/spreadsheets/{}/metainfo", SHEET)
    );

    assert!(observer.events().contains(&ConnectorEvent::TableResolved {
        node: NODE.to_string(),
        kind: "sheet".to_string(),
        object_token: "bascnEmbedded".to_string(),
        table: TABLE.to_string(),
    }));
}

#[tokio::test]
async fn block_token_splits_on_first_underscore_only() {
    let connector = authenticated().await;
    let transport = connector.transport();
    transport.push_data(node_data("sheet", SHEET));
    transport.push_data(sheet_meta(&[Some("bascnA_tbl_with_underscores")]));

    let node = NodeToken::parse(NODE).unwrap();
    let table = TableId::parse("tbl_with_underscores").unwrap();
    let app = connector.resolve_table(&node, &table).await.unwrap();
    assert_eq!(app.as_str(), "bascnA");
}

#[tokio::test]
async fn sheet_without_the_table_is_a_resolution_error() {
    let connector = authenticated().await;
    let transport = connector.transport();
    transport.push_data(node_data("sheet", SHEET));
    transport.push_data(sheet_meta(&[None, Some("bascnOther_tblOther")]));

    let (node, table) = ids();
    let err = connector.resolve_table(&node, &table).await.unwrap_err();
    match err {
        AppError::Resolution { node, table } => {
            assert_eq!(node, NODE);
            assert_eq!(table, TABLE);
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn block_with_blank_app_token_does_not_resolve() {
    let connector = authenticated().await;
    let transport = connector.transport();
    let blank = format!("_{}", TABLE);
    transport.push_data(node_data("sheet", SHEET));
    transport.push_data(sheet_meta(&[Some(blank.as_str())]));

    let (node, table) = ids();
    let err = connector.resolve_table(&node, &table).await.unwrap_err();
    assert!(matches!(err, AppError::Resolution { .. }));
}

#[tokio::test]
async fn document_nodes_hold_no_tables() {
    for kind in ["docx", "mindnote", "slides"] {
        let connector = authenticated().await;
        connector.transport().push_data(node_data(kind, "doxcnZ"));

        let (node, table) = ids();
        let err = connector.resolve_table(&node, &table).await.unwrap_err();
        match err {
            AppError::UnsupportedNodeKind { kind: reported, .. } => assert_eq!(reported, kind),
            other => panic!("unexpected error for {}: {other:?}", kind),
        }
        assert_eq!(connector.transport().request_count(), 2);
    }
}

#[tokio::test]
async fn resolution_is_not_cached() {
    let connector = authenticated().await;
    let transport = connector.transport();
    transport.push_data(node_data("bitable", APP));
    transport.push_data(node_data("bitable", APP));

    let (node, table) = ids();
    connector.resolve_table(&node, &table).await.unwrap();
    connector.resolve_table(&node, &table).await.unwrap();
    assert_eq!(transport.request_count(), 3);
}

#[test]
fn wiki_urls_name_the_node_and_table() {
    let url = format!("https://acme.feishu.cn/wiki/{}?table={}&view=vewA", NODE, TABLE);
    assert_eq!(NodeToken::from_input(&url).unwrap().as_str(), NODE);
    assert_eq!(
        TableId::from_wiki_url(&url).unwrap().map(|t| t.to_string()),
        Some(TABLE.to_string())
    );
}

#[tokio::test]
async fn unauthenticated_connector_makes_no_calls() {
    let connector = feishu_connector::FeishuConnector::with_transport(
        feishu_connector::ScriptedTransport::new(),
        registry(),
    );
    let (node, table) = ids();
    let err = connector.resolve_table(&node, &table).await.unwrap_err();
    assert!(matches!(err, AppError::NotAuthenticated));
    assert_eq!(connector.transport().request_count(), 0);
}
