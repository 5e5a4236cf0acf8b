use chrono::{DateTime, FixedOffset};
use serde::Deserialize;

use crate::graphql::CrmSchema;

use super::{eat_now, execute, JobError, LogSink};

const RESTOCK_MUTATION: &str = r#"
mutation {
  updateLowStockProducts {
    message
    products { name stock }
  }
}
"#;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RestockData {
    update_low_stock_products: RestockPayload,
}

#[derive(Debug, Deserialize)]
struct RestockPayload {
    message: String,
    products: Vec<RestockedProduct>,
}

#[derive(Debug, Deserialize)]
struct RestockedProduct {
    name: String,
    stock: i32,
}

pub fn restock_line(at: DateTime<FixedOffset>, name: &str, stock: i32) -> String {
    format!(
        "[{}] Product: {}, New stock: {}",
        at.format("%Y-%m-%d %H:%M:%S"),
        name,
        stock
    )
}

/// Replenishes low-stock products and logs one line per updated product.
/// Returns the lines written.
pub async fn run(schema: &CrmSchema, sink: &LogSink) -> Result<Vec<String>, JobError> {
    let at = eat_now();
    let data = match execute::<RestockData>(schema, RESTOCK_MUTATION).await {
        Ok(data) => data.update_low_stock_products,
        Err(e) => {
            sink.append(&format!("[{}] ERROR: {}", at.format("%Y-%m-%d %H:%M:%S"), e))
                .await?;
            return Err(e);
        }
    };

    let lines: Vec<String> = data
        .products
        .iter()
        .map(|p| restock_line(at, &p.name, p.stock))
        .collect();
    sink.append_all(&lines).await?;
    log::info!("Low-stock job: {}", data.message);
    Ok(lines)
}
