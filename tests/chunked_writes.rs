// tests/chunked_writes.rs
//! Chunked bitable and sheet writes.

mod common;

use common::*;
use feishu_connector::{
    write_in_chunks, AppError, CellValue, ConnectorEvent, Fields, NewRecord, NodeToken,
    ObjectToken, SheetRange, Table, TableId, ValidationError,
};
use serde_json::json;

fn field_rows(count: usize) -> Vec<Fields> {
    (0..count)
        .map(|i| {
            let mut fields = Fields::new();
            fields.insert("n".to_string(), json!(i));
            fields
        })
        .collect()
}

async fn append_and_count(count: usize) -> (usize, Vec<usize>) {
    let connector = authenticated().await;
    let transport = connector.transport();
    transport.push_data(node_data("bitable", APP));
    for _ in 0..count.div_ceil(100) {
        transport.push_data(json!({"records": []}));
    }

    let written = connector
        .append_bitable_records(
            &NodeToken::parse(NODE).unwrap(),
            &TableId::parse(TABLE).unwrap(),
            field_rows(count),
        )
        .await
        .unwrap();

    let chunk_sizes = transport.requests()[2..]
        .iter()
        .map(|request| {
            assert_eq!(
                request.endpoint(),
                format!("/bitable/v1/apps/{}/tables/{}/records/batch_create", APP, TABLE)
            );
            request.json_body().unwrap()["records"].as_array().unwrap().len()
        })
        .collect();
    (written, chunk_sizes)
}

#[tokio::test]
async fn bitable_appends_are_split_into_hundreds() {
    for (count, expected) in [
        (0, vec![]),
        (1, vec![1]),
        (100, vec![100]),
        (101, vec![100, 1]),
        (1000, vec![100; 10]),
    ] {
        let (written, chunks) = append_and_count(count).await;
        assert_eq!(written, count, "written for {}", count);
        assert_eq!(chunks, expected, "chunks for {}", count);
    }
}

#[tokio::test]
async fn chunks_preserve_record_order() {
    let connector = authenticated().await;
    let transport = connector.transport();
    transport.push_data(node_data("bitable", APP));
    transport.push_data(json!({"records": []}));
    transport.push_data(json!({"records": []}));

    connector
        .append_bitable_records(
            &NodeToken::parse(NODE).unwrap(),
            &TableId::parse(TABLE).unwrap(),
            field_rows(150),
        )
        .await
        .unwrap();

    let requests = transport.requests();
    let second = requests[3].json_body().unwrap()["records"].as_array().unwrap();
    assert_eq!(second[0], json!({"fields": {"n": 100}}));
    assert_eq!(second[49], json!({"fields": {"n": 149}}));
}

#[tokio::test]
async fn failing_chunk_stops_the_write() {
    let (connector, observer) = observed().await;
    let transport = connector.transport();
    transport.push_data(node_data("bitable", APP));
    transport.push_data(json!({"records": []}));
    transport.push_json(json!({"code": 1254103, "msg": "RecordExceedLimit"}));
    transport.push_data(json!({"records": []}));

    let err = connector
        .append_bitable_records(
            &NodeToken::parse(NODE).unwrap(),
            &TableId::parse(TABLE).unwrap(),
            field_rows(250),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::RemoteApi { .. }));
    assert_eq!(transport.request_count(), 4);
    assert_eq!(transport.remaining(), 1);
    assert!(!observer
        .events()
        .iter()
        .any(|e| matches!(e, ConnectorEvent::WriteCompleted { .. })));
}

#[tokio::test]
async fn table_rows_get_generated_ids_and_epoch_dates() {
    let connector = authenticated().await;
    let transport = connector.transport();
    transport.push_data(node_data("bitable", APP));
    transport.push_data(json!({"records": []}));

    let day = chrono::NaiveDate::from_ymd_opt(2021, 10, 1).unwrap();
    let table = Table::new(["team", "day", "score"])
        .with_row(vec!["ops".into(), day.into(), CellValue::Float(f64::NAN)])
        .unwrap();

    let written = connector
        .append_table_records(
            &NodeToken::parse(NODE).unwrap(),
            &TableId::parse(TABLE).unwrap(),
            &table,
        )
        .await
        .unwrap();
    assert_eq!(written, 1);

    let body = transport.requests()[2].json_body().unwrap().clone();
    let record = &body["records"][0];
    let record_id = record["record_id"].as_str().unwrap();
    assert!(record_id.starts_with("rec"));
    assert_eq!(record_id.len(), 35);
    assert_eq!(
        record["fields"],
        json!({"team": "ops", "day": 1633046400000i64, "score": null})
    );
}

#[tokio::test]
async fn sheet_appends_are_split_into_five_thousands() {
    let (connector, observer) = observed().await;
    let transport = connector.transport();
    transport.push_data(node_data("sheet", SHEET));
    transport.push_data(json!({"updates": {"updatedRows": 5000, "updatedCells": 5000}}));
    transport.push_data(json!({"updates": {"updatedRows": 1, "updatedCells": 1}}));

    let rows: Vec<Vec<CellValue>> = (0..5001).map(|i| vec![CellValue::Integer(i)]).collect();
    let range = SheetRange::new("0b7f3c!A1:A1").unwrap();
    let written = connector
        .append_sheet_data(&NodeToken::parse(NODE).unwrap(), &range, &rows)
        .await
        .unwrap();
    assert_eq!(written, 5001);

    let requests = transport.requests();
    assert_eq!(requests.len(), 4);
    let sizes: Vec<usize> = requests[2..]
        .iter()
        .map(|r| {
            assert_eq!(
                r.endpoint(),
                format!("/sheets/v2/spreadsheets/{}/values_append", SHEET)
            );
            r.json_body().unwrap()["valueRange"]["values"]
                .as_array()
                .unwrap()
                .len()
        })
        .collect();
    assert_eq!(sizes, vec![5000, 1]);

    assert!(observer.events().contains(&ConnectorEvent::WriteCompleted {
        destination: format!("{}/0b7f3c!A1:A1", NODE),
        requests: 2,
        written: 5001,
        submitted: 5001,
    }));
}

#[tokio::test]
async fn zero_chunk_size_is_rejected() {
    let err = write_in_chunks("dest", &[1, 2, 3], 0, |_, _| async { Ok(()) })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::Validation(ValidationError::ZeroChunkSize)
    ));
}

#[tokio::test]
async fn single_requests_report_to_the_observer() {
    let (connector, observer) = observed().await;
    let transport = connector.transport();
    transport.push_data(json!({"updates": {"updatedRows": 2, "updatedCells": 4}}));
    transport.push_data(json!({"records": [record("recA", json!({"n": 0}))]}));

    let sheet = ObjectToken::parse(SHEET).unwrap();
    let range = SheetRange::new("0b7f3c!A1:B2").unwrap();
    let rows = vec![vec![CellValue::from("a"), CellValue::from(1i64)]; 2];
    connector.append_sheet_rows(&sheet, &range, &rows).await.unwrap();

    let app = ObjectToken::parse(APP).unwrap();
    let table = TableId::parse(TABLE).unwrap();
    let records = field_rows(1).into_iter().map(NewRecord::new).collect::<Vec<_>>();
    connector
        .batch_create_records(&app, &table, &records)
        .await
        .unwrap();

    assert_eq!(
        observer.events(),
        vec![
            ConnectorEvent::RowsAppended {
                sheet: SHEET.to_string(),
                range: "0b7f3c!A1:B2".to_string(),
                updated_rows: 2,
                updated_cells: 4,
            },
            ConnectorEvent::RecordsCreated {
                table: TABLE.to_string(),
                records: 1,
            },
        ]
    );
}
