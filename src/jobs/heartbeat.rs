use chrono::{DateTime, FixedOffset};
use serde_json::json;

use super::{eat_now, JobError, LogSink};

const HELLO_QUERY: &str = "query { hello }";

/// Result of one heartbeat. The alive line is always written; the endpoint
/// ping is informational only.
#[derive(Debug)]
pub struct HeartbeatOutcome {
    pub line: String,
    pub ping: Result<(), JobError>,
}

pub fn heartbeat_line(at: DateTime<FixedOffset>) -> String {
    format!("{} CRM is alive", at.format("%d/%m/%Y-%H:%M:%S"))
}

/// Posts the `hello` query and checks that the endpoint answered it.
pub async fn ping(client: &reqwest::Client, url: &str) -> Result<(), JobError> {
    let body: serde_json::Value = client
        .post(url)
        .json(&json!({ "query": HELLO_QUERY }))
        .send()
        .await?
        .error_for_status()?
        .json()
        .await?;

    match body.pointer("/data/hello").and_then(|v| v.as_str()) {
        Some(_) => Ok(()),
        None => Err(JobError::Decode(format!("no hello in response: {}", body))),
    }
}

pub async fn run(
    client: &reqwest::Client,
    url: &str,
    sink: &LogSink,
) -> Result<HeartbeatOutcome, JobError> {
    let ping = ping(client, url).await;
    if let Err(e) = &ping {
        log::warn!("Heartbeat ping of {} failed: {}", url, e);
    }

    let line = heartbeat_line(eat_now());
    sink.append(&line).await?;
    log::debug!("Heartbeat written to {}", sink.path().display());

    Ok(HeartbeatOutcome { line, ping })
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::jobs::east_africa;

    #[test]
    fn line_uses_day_first_timestamp() {
        let at = east_africa()
            .with_ymd_and_hms(2024, 3, 7, 9, 5, 1)
            .unwrap();
        assert_eq!(heartbeat_line(at), "07/03/2024-09:05:01 CRM is alive");
    }

    #[tokio::test]
    async fn unreachable_endpoint_still_logs_alive_line() {
        let dir = tempfile::tempdir().unwrap();
        let sink = LogSink::new(dir.path().join("heartbeat.txt"));
        let client = reqwest::Client::new();

        let outcome = run(&client, "http://127.0.0.1:9/graphql", &sink)
            .await
            .expect("heartbeat should not fail on a dead endpoint");

        assert!(outcome.ping.is_err());
        assert!(outcome.line.ends_with(" CRM is alive"));
        let contents = std::fs::read_to_string(sink.path()).unwrap();
        assert_eq!(contents, format!("{}\n", outcome.line));
    }
}
