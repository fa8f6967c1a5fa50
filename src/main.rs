// src/main.rs

use anyhow::Context;
use clap::Parser;
use feishu_connector::config::{read_json_file, Command, CommandLineInput};
use feishu_connector::{
    CardMessage, CellValue, ConnectorConfig, FeishuConnector, Fields, NodeToken, SheetRange,
    SpaceId, TableId,
};
use log::LevelFilter;
use log4rs::{
    append::console::ConsoleAppender,
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use serde::Serialize;
use serde_json::Value;
use std::fs;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("feishu_connector.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    // Command output goes to stdout; logs stay on stderr.
    let console_appender = ConsoleAppender::builder()
        .target(log4rs::append::console::Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("console", Box::new(console_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("console")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn to_fields(pairs: Vec<(String, Value)>) -> Fields {
    pairs.into_iter().collect()
}

/// Authenticates a connector for API subcommands.
async fn authenticated(config: &ConnectorConfig) -> anyhow::Result<FeishuConnector> {
    FeishuConnector::connect(
        &config.settings,
        config.webhooks.clone(),
        config.require_credentials()?,
    )
    .await
    .context("authentication failed")
}

/// Posts a card message; needs no credentials.
async fn send_notification(config: &ConnectorConfig, message: CardMessage) -> anyhow::Result<()> {
    let connector = FeishuConnector::new(&config.settings, config.webhooks.clone())?;
    let delivery = connector
        .send_card_message(&message)
        .await
        .context("sending card message")?;
    if delivery.is_delivered() {
        println!("✓ Card message sent");
    } else {
        eprintln!("⚠️  No webhook configured for target; message skipped");
    }
    Ok(())
}

/// Dispatches one subcommand.
async fn execute(config: &ConnectorConfig, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Notify {
            target,
            title,
            content,
            failed,
            buttons,
        } => {
            let mut message = CardMessage::new(title).content(content).success(!failed);
            message.target = target;
            message.buttons = buttons;
            send_notification(config, message).await
        }
        Command::Spaces => print_json(&authenticated(config).await?.list_wiki_spaces().await?),
        Command::Nodes { space } => {
            let space = SpaceId::parse(&space)?;
            print_json(&authenticated(config).await?.list_wiki_nodes(&space).await?)
        }
        Command::Node { node } => {
            let node = NodeToken::from_input(&node)?;
            print_json(&authenticated(config).await?.get_node(&node).await?)
        }
        Command::Records { node, table } => {
            let node = NodeToken::from_input(&node)?;
            let table = TableId::parse(&table)?;
            let records = authenticated(config)
                .await?
                .get_bitable_records(&node, &table)
                .await
                .with_context(|| format!("reading {} table {}", node, table))?;
            print_json(&records)
        }
        Command::AppendRecords { node, table, file } => {
            let node = NodeToken::from_input(&node)?;
            let table = TableId::parse(&table)?;
            let records: Vec<Fields> = read_json_file(&file)?;
            let written = authenticated(config)
                .await?
                .append_bitable_records(&node, &table, records)
                .await
                .with_context(|| format!("appending to {} table {}", node, table))?;
            println!("✓ {} records appended to {}", written, table);
            Ok(())
        }
        Command::UpdateRecords {
            node,
            table,
            conditions,
            updates,
        } => {
            let node = NodeToken::from_input(&node)?;
            let table = TableId::parse(&table)?;
            let report = authenticated(config)
                .await?
                .update_records(&node, &table, &to_fields(conditions), &to_fields(updates))
                .await
                .with_context(|| format!("updating {} table {}", node, table))?;

            println!("✓ {}/{} matching records updated", report.updated, report.matched);
            for failure in &report.failures {
                eprintln!("⚠️  {}: {}", failure.record_id, failure.error);
            }
            if !report.is_complete() {
                anyhow::bail!("{} record updates failed", report.failures.len());
            }
            Ok(())
        }
        Command::SheetRead { node, range } => {
            let node = NodeToken::from_input(&node)?;
            let range = SheetRange::new(range)?;
            print_json(&authenticated(config).await?.get_sheet_data(&node, &range).await?)
        }
        Command::SheetAppend { node, range, file } => {
            let node = NodeToken::from_input(&node)?;
            let range = SheetRange::new(range)?;
            let rows: Vec<Vec<Value>> = read_json_file(&file)?;
            let rows: Vec<Vec<CellValue>> = rows
                .into_iter()
                .map(|row| row.into_iter().map(CellValue::from_json).collect())
                .collect();
            let written = authenticated(config)
                .await?
                .append_sheet_data(&node, &range, &rows)
                .await
                .with_context(|| format!("appending to {} sheet {}", node, range))?;
            println!("✓ {} rows appended to {}", written, range);
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    setup_logging(cli.verbose).map_err(|e| anyhow::anyhow!("logging setup failed: {}", e))?;

    let config = ConnectorConfig::resolve(&cli)?;

    execute(&config, cli.command).await
}
