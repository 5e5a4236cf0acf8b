//! Periodic maintenance jobs. Each run appends plain-text lines to its own
//! log file; failures are written to that file as well and never propagate
//! past the scheduler.

pub mod heartbeat;
pub mod low_stock;
pub mod reminders;
pub mod report;
pub mod scheduler;

use std::path::{Path, PathBuf};

use async_graphql::Request;
use chrono::{DateTime, FixedOffset, Offset, Utc};
use serde::de::DeserializeOwned;
use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use crate::graphql::CrmSchema;

pub use scheduler::Scheduler;

/// East Africa Time, UTC+3 all year round.
const EAT_OFFSET_SECS: i32 = 3 * 60 * 60;

#[derive(Debug, Error)]
pub enum JobError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GraphQL error: {0}")]
    GraphQl(String),

    #[error("Unexpected response: {0}")]
    Decode(String),
}

pub fn east_africa() -> FixedOffset {
    FixedOffset::east_opt(EAT_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

pub fn eat_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&east_africa())
}

/// Append-only text file a job writes its lines to.
#[derive(Debug, Clone)]
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, line: &str) -> Result<(), JobError> {
        self.append_all(&[line.to_string()]).await
    }

    pub async fn append_all(&self, lines: &[String]) -> Result<(), JobError> {
        if lines.is_empty() {
            return Ok(());
        }
        let mut buf = String::new();
        for line in lines {
            buf.push_str(line);
            buf.push('\n');
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(buf.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }
}

/// Executes a document against the schema and decodes `data` into `T`.
pub(crate) async fn execute<T: DeserializeOwned>(
    schema: &CrmSchema,
    request: impl Into<Request>,
) -> Result<T, JobError> {
    let response = schema.execute(request).await;
    if !response.errors.is_empty() {
        let messages: Vec<String> = response.errors.into_iter().map(|e| e.message).collect();
        return Err(JobError::GraphQl(messages.join("; ")));
    }
    let data = response
        .data
        .into_json()
        .map_err(|e| JobError::Decode(e.to_string()))?;
    serde_json::from_value(data).map_err(|e| JobError::Decode(e.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn eat_is_three_hours_ahead_of_utc() {
        let utc = Utc.with_ymd_and_hms(2024, 1, 31, 22, 30, 0).unwrap();
        let eat = utc.with_timezone(&east_africa());
        assert_eq!(eat.format("%Y-%m-%d %H:%M").to_string(), "2024-02-01 01:30");
    }

    #[tokio::test]
    async fn sink_appends_lines_without_truncating() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LogSink::new(dir.path().join("job.txt"));

        sink.append("first").await.unwrap();
        sink.append_all(&["second".to_string(), "third".to_string()])
            .await
            .unwrap();

        let contents = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(contents, "first\nsecond\nthird\n");
    }

    #[tokio::test]
    async fn sink_reports_unwritable_paths() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LogSink::new(dir.path().join("missing").join("job.txt"));

        let err = sink.append("line").await.unwrap_err();
        assert!(matches!(err, JobError::Io(_)));
    }
}
