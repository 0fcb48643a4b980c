use crate::cli::commands::history_service;
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::history::{CreateHistoryRequest, TagsInput};
use crate::ui::messages::success;
use crate::utils::date::{parse_timestamp, to_iso};
use crate::utils::formatting::{parse_seconds, secs2readable};
use chrono::{DateTime, TimeDelta, Utc};

/// Record a finished session.
pub async fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Add {
        description,
        duration,
        tags,
        start,
        end,
    } = cmd
    {
        let request = build_request(
            description,
            duration,
            tags.as_deref(),
            start.as_deref(),
            end.as_deref(),
            Utc::now(),
        )?;

        let service = history_service(cfg)?;
        let record = service.create(request).await?;

        let secs = record.duration().and_then(|d| d.as_f64()).unwrap_or(0.0);
        let id = record
            .id()
            .map_or_else(|| "?".to_string(), |id| id.to_string());
        success(format!("Added entry #{} ({})", id, secs2readable(secs)));
    }
    Ok(())
}

fn timestamp(raw: &str) -> AppResult<DateTime<Utc>> {
    parse_timestamp(raw)
        .map(|t| t.with_timezone(&Utc))
        .ok_or_else(|| AppError::InvalidInput(format!("not an RFC 3339 timestamp: {raw}")))
}

/// `millis` as a time span, `None` when chrono cannot represent it.
fn span_of(millis: f64) -> Option<TimeDelta> {
    let millis = millis.round();
    if !millis.is_finite() || millis.abs() >= i64::MAX as f64 {
        return None;
    }
    TimeDelta::try_milliseconds(millis as i64)
}

/// Fill in missing times: `end` defaults to `now`, `start` to `end - duration`.
fn build_request(
    description: &str,
    duration: &str,
    tags: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
    now: DateTime<Utc>,
) -> AppResult<CreateHistoryRequest> {
    let seconds = parse_seconds(duration)
        .ok_or_else(|| AppError::InvalidInput(format!("duration must be seconds: {duration}")))?;

    let end = end.map(timestamp).transpose()?.unwrap_or(now);
    let start = match start {
        Some(raw) => timestamp(raw)?,
        None => seconds
            .as_f64()
            .and_then(|secs| span_of(secs * 1000.0))
            .and_then(|span| end.checked_sub_signed(span))
            .ok_or_else(|| AppError::InvalidInput(format!("duration out of range: {duration}")))?,
    };

    let tags = tags.map(|t| TagsInput::List(t.split(',').map(str::to_string).collect()));

    Ok(CreateHistoryRequest {
        description: Some(description.to_string()),
        duration: Some(seconds),
        tags,
        start_time: Some(to_iso(start)),
        end_time: Some(to_iso(end)),
    })
}
