use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::graphql::CrmSchema;

use super::{eat_now, execute, JobError, LogSink};

const REPORT_QUERY: &str = "query { customersCount ordersCount totalRevenue }";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReportData {
    customers_count: i64,
    orders_count: i64,
    total_revenue: String,
}

pub fn report_line(
    at: DateTime<FixedOffset>,
    customers: i64,
    orders: i64,
    revenue: &str,
) -> String {
    format!(
        "{} - Report: {} customers, {} orders, {} revenue",
        at.format("%Y-%m-%d %H:%M:%S"),
        customers,
        orders,
        revenue
    )
}

/// Writes one summary line. A failed query is written as an ERROR line in
/// its place.
pub async fn run(schema: &CrmSchema, sink: &LogSink) -> Result<String, JobError> {
    let at = eat_now();
    match execute::<ReportData>(schema, REPORT_QUERY).await {
        Ok(data) => {
            let line = report_line(
                at,
                data.customers_count,
                data.orders_count,
                &data.total_revenue,
            );
            sink.append(&line).await?;
            log::info!("CRM report generated");
            Ok(line)
        }
        Err(e) => {
            sink.append(&format!("{} - ERROR: {}", at.format("%Y-%m-%d %H:%M:%S"), e))
                .await?;
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;
    use crate::jobs::east_africa;

    #[test]
    fn line_format() {
        let at = east_africa()
            .with_ymd_and_hms(2024, 6, 2, 6, 0, 0)
            .unwrap();
        assert_eq!(
            report_line(at, 3, 2, "25.50"),
            "2024-06-02 06:00:00 - Report: 3 customers, 2 orders, 25.50 revenue"
        );
    }
}
