use async_graphql::{Request, Variables};
use chrono::{DateTime, Duration, FixedOffset};
use serde::Deserialize;
use serde_json::json;

use crate::graphql::CrmSchema;

use super::{eat_now, execute, JobError, LogSink};

/// How far back an order still gets a reminder.
pub const REMINDER_WINDOW_DAYS: i64 = 7;

const RECENT_ORDERS_QUERY: &str = r#"
query RecentOrders($since: DateTime!) {
  orders(filter: { orderDateGte: $since }) {
    id
    customer { email }
  }
}
"#;

#[derive(Debug, Deserialize)]
struct RecentOrders {
    orders: Vec<RecentOrder>,
}

#[derive(Debug, Deserialize)]
struct RecentOrder {
    id: String,
    customer: OrderCustomer,
}

#[derive(Debug, Deserialize)]
struct OrderCustomer {
    email: String,
}

pub fn reminder_line(at: DateTime<FixedOffset>, order_id: &str, email: &str) -> String {
    format!(
        "[{}] Order ID: {}, Customer Email: {}",
        at.format("%Y-%m-%d %H:%M:%S"),
        order_id,
        email
    )
}

/// Logs a reminder line for every order placed in the last seven days.
pub async fn run(schema: &CrmSchema, sink: &LogSink) -> Result<Vec<String>, JobError> {
    let now = eat_now();
    let since = now - Duration::days(REMINDER_WINDOW_DAYS);
    let request = Request::new(RECENT_ORDERS_QUERY)
        .variables(Variables::from_json(json!({ "since": since.to_rfc3339() })));

    let recent = match execute::<RecentOrders>(schema, request).await {
        Ok(data) => data.orders,
        Err(e) => {
            sink.append(&format!("[{}] ERROR: {}", now.format("%Y-%m-%d %H:%M:%S"), e))
                .await?;
            return Err(e);
        }
    };

    let lines: Vec<String> = recent
        .iter()
        .map(|o| reminder_line(now, &o.id, &o.customer.email))
        .collect();
    sink.append_all(&lines).await?;
    log::info!("Order reminders processed: {} order(s)", lines.len());
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::jobs::east_africa;

    #[test]
    fn line_format() {
        let at = east_africa()
            .with_ymd_and_hms(2024, 5, 20, 8, 0, 0)
            .unwrap();
        assert_eq!(
            reminder_line(at, "abc", "alice@example.com"),
            "[2024-05-20 08:00:00] Order ID: abc, Customer Email: alice@example.com"
        );
    }
}
