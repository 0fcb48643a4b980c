use crate::cli::commands::history_service;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::AppResult;
use crate::models::history::HistoryRecord;
use crate::ui::messages::info;
use crate::utils::date::display_local;
use crate::utils::formatting::duration_label;
use crate::utils::table::Table;
use serde_json::Value;

pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::List { tag, json } = cmd {
        let service = history_service(cfg)?;

        let records = match tag {
            Some(t) => service.filter(Some(t)).await?,
            None => service.list().await?,
        };

        if *json {
            println!("{}", serde_json::to_string_pretty(&records)?);
            return Ok(());
        }

        if records.is_empty() {
            info("No history entries.");
            return Ok(());
        }

        print!("{}", render(&records));
    }
    Ok(())
}

fn render(records: &[HistoryRecord]) -> String {
    let mut table = Table::new(["ID", "Start", "End", "Duration", "Tags", "Description"]);
    for r in records {
        table.add_row(vec![
            r.get("id").map(cell).unwrap_or_default(),
            display_local(r.start_time()),
            display_local(r.end_time()),
            duration_label(r.duration()),
            r.tags.join(", "),
            r.description().unwrap_or_default().to_string(),
        ]);
    }
    table.render()
}

fn cell(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
