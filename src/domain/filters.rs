//! Query filters for list operations.
//!
//! Each filter is a conjunction of its set fields; an empty filter matches
//! everything. The `matches` methods define the semantics that SQL-backed
//! repositories reproduce.

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::customer::Customer;
use super::order::Order;
use super::product::Product;

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    pub name_icontains: Option<String>,
    pub email_icontains: Option<String>,
    pub created_at_gte: Option<DateTime<Utc>>,
    pub created_at_lte: Option<DateTime<Utc>>,
    pub phone_pattern: Option<String>,
}

impl CustomerFilter {
    pub fn matches(&self, c: &Customer) -> bool {
        self.name_icontains
            .as_deref()
            .map_or(true, |n| contains_ci(&c.name, n))
            && self
                .email_icontains
                .as_deref()
                .map_or(true, |e| contains_ci(&c.email, e))
            && self.created_at_gte.map_or(true, |t| c.created_at >= t)
            && self.created_at_lte.map_or(true, |t| c.created_at <= t)
            && self.phone_pattern.as_deref().map_or(true, |p| {
                c.phone.as_deref().is_some_and(|phone| phone.starts_with(p))
            })
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub name_icontains: Option<String>,
    pub price_gte: Option<BigDecimal>,
    pub price_lte: Option<BigDecimal>,
    pub stock_gte: Option<i32>,
    pub stock_lte: Option<i32>,
}

impl ProductFilter {
    pub fn matches(&self, p: &Product) -> bool {
        self.name_icontains
            .as_deref()
            .map_or(true, |n| contains_ci(&p.name, n))
            && self.price_gte.as_ref().map_or(true, |v| &p.price >= v)
            && self.price_lte.as_ref().map_or(true, |v| &p.price <= v)
            && self.stock_gte.map_or(true, |v| p.stock >= v)
            && self.stock_lte.map_or(true, |v| p.stock <= v)
    }
}

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub total_amount_gte: Option<BigDecimal>,
    pub total_amount_lte: Option<BigDecimal>,
    pub order_date_gte: Option<DateTime<Utc>>,
    pub order_date_lte: Option<DateTime<Utc>>,
    pub customer_name: Option<String>,
    pub product_name: Option<String>,
    pub product_id: Option<Uuid>,
}

impl OrderFilter {
    pub fn placed_since(since: DateTime<Utc>) -> Self {
        Self {
            order_date_gte: Some(since),
            ..Self::default()
        }
    }

    pub fn matches(&self, o: &Order) -> bool {
        self.total_amount_gte
            .as_ref()
            .map_or(true, |v| &o.total_amount >= v)
            && self
                .total_amount_lte
                .as_ref()
                .map_or(true, |v| &o.total_amount <= v)
            && self.order_date_gte.map_or(true, |t| o.order_date >= t)
            && self.order_date_lte.map_or(true, |t| o.order_date <= t)
            && self
                .customer_name
                .as_deref()
                .map_or(true, |n| contains_ci(&o.customer.name, n))
            && self
                .product_name
                .as_deref()
                .map_or(true, |n| o.products.iter().any(|p| contains_ci(&p.name, n)))
            && self
                .product_id
                .map_or(true, |id| o.products.iter().any(|p| p.id == id))
    }
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use chrono::Duration;

    use super::*;

    fn customer(name: &str, phone: Option<&str>) -> Customer {
        Customer {
            id: Uuid::new_v4(),
            name: name.into(),
            email: format!("{}@example.com", name.to_lowercase()),
            phone: phone.map(Into::into),
            created_at: Utc::now(),
        }
    }

    fn product(name: &str, price: &str, stock: i32) -> Product {
        Product {
            id: Uuid::new_v4(),
            name: name.into(),
            price: BigDecimal::from_str(price).unwrap(),
            stock,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_filters_match_everything() {
        assert!(CustomerFilter::default().matches(&customer("Alice", None)));
        assert!(ProductFilter::default().matches(&product("Pen", "1.00", 0)));
    }

    #[test]
    fn customer_filter_is_case_insensitive_and_prefix_matches_phone() {
        let alice = customer("Alice", Some("+254700000000"));
        let filter = CustomerFilter {
            name_icontains: Some("LIC".into()),
            phone_pattern: Some("+254".into()),
            ..Default::default()
        };
        assert!(filter.matches(&alice));

        let no_phone = customer("Alice", None);
        assert!(!filter.matches(&no_phone));
    }

    #[test]
    fn product_filter_applies_ranges() {
        let laptop = product("Laptop", "999.99", 3);
        let filter = ProductFilter {
            price_gte: Some(BigDecimal::from(500)),
            stock_lte: Some(5),
            ..Default::default()
        };
        assert!(filter.matches(&laptop));
        assert!(!filter.matches(&product("Mouse", "19.99", 3)));
        assert!(!filter.matches(&product("Server", "5000.00", 50)));
    }

    #[test]
    fn order_filter_checks_related_rows() {
        let pen = product("Blue Pen", "1.50", 10);
        let order = Order {
            id: Uuid::new_v4(),
            customer: customer("Bob", None),
            products: vec![pen.clone()],
            total_amount: BigDecimal::from_str("1.50").unwrap(),
            order_date: Utc::now(),
        };

        assert!(OrderFilter {
            product_name: Some("pen".into()),
            customer_name: Some("bo".into()),
            product_id: Some(pen.id),
            ..Default::default()
        }
        .matches(&order));

        assert!(!OrderFilter {
            product_id: Some(Uuid::new_v4()),
            ..Default::default()
        }
        .matches(&order));

        assert!(!OrderFilter::placed_since(Utc::now() + Duration::days(1)).matches(&order));
    }
}
