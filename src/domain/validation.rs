//! Field-level business rules shared by the services.
//!
//! Every rule returns [`DomainError::Validation`] with the message that is
//! surfaced to API callers unchanged.

use std::str::FromStr;

use bigdecimal::{BigDecimal, RoundingMode, Zero};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::Uuid;

use super::errors::DomainError;

/// International form: `+` followed by 10 to 15 digits.
static INTERNATIONAL_PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[0-9]{10,15}$").expect("valid phone regex"));

/// Local form: `ddd-ddd-dddd`.
static LOCAL_PHONE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[0-9]{3}-[0-9]{3}-[0-9]{4}$").expect("valid phone regex"));

/// Largest value a `numeric(10, 2)` column holds.
pub static MAX_AMOUNT: Lazy<BigDecimal> =
    Lazy::new(|| BigDecimal::from_str("99999999.99").expect("valid decimal literal"));

/// Digits left of the point in a `numeric(10, 2)` column.
const MAX_INTEGER_DIGITS: i64 = 8;

/// Longest decimal literal accepted, sign and exponent included.
const MAX_DECIMAL_LEN: usize = 40;

pub const MAX_NAME_LEN: usize = 255;
pub const MAX_EMAIL_LEN: usize = 254;

pub fn validate_name(name: &str) -> Result<String, DomainError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::validation("Name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "Name must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(name.to_string())
}

/// Accepts `local@domain` with both parts non-empty and no whitespace.
pub fn validate_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.is_empty()
                && !domain.contains('@')
                && !email.chars().any(char::is_whitespace)
        }
        None => false,
    };
    if !valid || email.len() > MAX_EMAIL_LEN {
        return Err(DomainError::validation("Invalid email address"));
    }
    Ok(email.to_string())
}

/// Blank phones count as absent.
pub fn validate_phone(phone: Option<&str>) -> Result<Option<String>, DomainError> {
    let Some(phone) = phone.map(str::trim).filter(|p| !p.is_empty()) else {
        return Ok(None);
    };
    if INTERNATIONAL_PHONE.is_match(phone) || LOCAL_PHONE.is_match(phone) {
        Ok(Some(phone.to_string()))
    } else {
        Err(DomainError::validation(
            "Invalid phone format. Use +1234567890 or 123-456-7890",
        ))
    }
}

/// A parsed decimal literal whose magnitude is known before any rescaling.
struct DecimalLiteral {
    value: BigDecimal,
    negative: bool,
    /// Digits left of the point; zero or negative below 1 (0.05 has -1).
    integer_digits: i64,
}

/// Parses a short decimal literal. The exponent is only inspected, never
/// expanded, so `1e999999999` is cheap to reject.
fn parse_decimal(raw: &str) -> Option<DecimalLiteral> {
    let raw = raw.trim();
    if raw.is_empty() || raw.len() > MAX_DECIMAL_LEN {
        return None;
    }
    let value = BigDecimal::from_str(raw).ok()?;
    let (mantissa, scale) = value.as_bigint_and_exponent();
    let mantissa = mantissa.to_string();
    let negative = mantissa.starts_with('-');
    let precision = mantissa.trim_start_matches('-').len() as i64;
    Some(DecimalLiteral {
        value,
        negative,
        integer_digits: precision.saturating_sub(scale),
    })
}

fn amount_limit_error(what: &str) -> DomainError {
    DomainError::validation(format!("{} must not exceed {}", what, *MAX_AMOUNT))
}

/// Parses a decimal price string, requires it to be positive and rounds it
/// half-up to cents.
pub fn parse_price(raw: &str) -> Result<BigDecimal, DomainError> {
    let literal = parse_decimal(raw)
        .ok_or_else(|| DomainError::validation(format!("Invalid price '{}'", raw.trim())))?;
    if literal.negative || literal.value.is_zero() {
        return Err(DomainError::validation("Price must be positive"));
    }
    if literal.integer_digits > MAX_INTEGER_DIGITS {
        return Err(amount_limit_error("Price"));
    }
    // Below 0.001 the price rounds to zero.
    if literal.integer_digits < -2 {
        return Err(DomainError::validation("Price must be positive"));
    }
    let price = literal.value.with_scale_round(2, RoundingMode::HalfUp);
    if price.is_zero() {
        return Err(DomainError::validation("Price must be positive"));
    }
    if price > *MAX_AMOUNT {
        return Err(amount_limit_error("Price"));
    }
    Ok(price)
}

/// Parses a range-filter bound on a money column, rounded half-up to cents.
pub fn parse_amount_bound(raw: &str) -> Result<BigDecimal, DomainError> {
    let literal = parse_decimal(raw)
        .ok_or_else(|| DomainError::validation(format!("Invalid decimal '{}'", raw.trim())))?;
    if literal.value.is_zero() || literal.integer_digits < -2 {
        return Ok(BigDecimal::zero().with_scale(2));
    }
    if literal.integer_digits > MAX_INTEGER_DIGITS {
        return Err(DomainError::validation(format!(
            "Amount must be between -{0} and {0}",
            *MAX_AMOUNT
        )));
    }
    Ok(literal.value.with_scale_round(2, RoundingMode::HalfUp))
}

/// Order totals are stored in the same `numeric(10, 2)` column type as prices.
pub fn validate_order_total(total: &BigDecimal) -> Result<(), DomainError> {
    if *total > *MAX_AMOUNT {
        return Err(amount_limit_error("Order total"));
    }
    Ok(())
}

pub fn validate_stock(stock: i32) -> Result<i32, DomainError> {
    if stock < 0 {
        return Err(DomainError::validation("Stock cannot be negative"));
    }
    Ok(stock)
}

/// Accepts RFC 3339, a naive `YYYY-MM-DDTHH:MM:SS[.f]` (UTC) or a bare date
/// (midnight UTC).
pub fn parse_order_date(raw: &str) -> Result<DateTime<Utc>, DomainError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Some(naive) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(naive.and_utc());
    }
    Err(DomainError::validation(format!(
        "Invalid order date '{raw}', expected an ISO-8601 timestamp"
    )))
}

pub fn parse_id(raw: &str) -> Option<Uuid> {
    Uuid::parse_str(raw.trim()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};

    fn message(err: DomainError) -> String {
        match err {
            DomainError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn accepts_international_and_local_phone_forms() {
        assert_eq!(
            validate_phone(Some("+1234567890")).unwrap().as_deref(),
            Some("+1234567890")
        );
        assert_eq!(
            validate_phone(Some("+123456789012345")).unwrap().as_deref(),
            Some("+123456789012345")
        );
        assert_eq!(
            validate_phone(Some("123-456-7890")).unwrap().as_deref(),
            Some("123-456-7890")
        );
    }

    #[test]
    fn rejects_malformed_phones() {
        for bad in [
            "1234567890",
            "+123456789",
            "+1234567890123456",
            "123-4567-890",
            "(123) 456-7890",
            "+12345abcde",
            "123-456-78901",
            "+١٢٣٤٥٦٧٨٩٠",
            "١٢٣-456-7890",
        ] {
            let err = validate_phone(Some(bad)).expect_err(bad);
            assert!(message(err).starts_with("Invalid phone format"), "{bad}");
        }
    }

    #[test]
    fn blank_phone_is_absent() {
        assert_eq!(validate_phone(None).unwrap(), None);
        assert_eq!(validate_phone(Some("")).unwrap(), None);
        assert_eq!(validate_phone(Some("   ")).unwrap(), None);
    }

    #[test]
    fn email_requires_local_and_domain_parts() {
        assert_eq!(
            validate_email("  alice@example.com ").unwrap(),
            "alice@example.com"
        );
        for bad in ["", "alice", "@example.com", "alice@", "a@b@c", "al ice@example.com"] {
            assert!(validate_email(bad).is_err(), "{bad}");
        }
    }

    #[test]
    fn name_is_trimmed_and_required() {
        assert_eq!(validate_name("  Alice ").unwrap(), "Alice");
        assert_eq!(message(validate_name("   ").unwrap_err()), "Name is required");
    }

    #[test]
    fn price_must_be_positive() {
        assert_eq!(message(parse_price("0").unwrap_err()), "Price must be positive");
        assert_eq!(message(parse_price("-1.50").unwrap_err()), "Price must be positive");
        assert_eq!(message(parse_price("0.001").unwrap_err()), "Price must be positive");
        assert!(message(parse_price("abc").unwrap_err()).starts_with("Invalid price"));
        assert!(parse_price("100000000").is_err());
    }

    #[test]
    fn huge_exponents_are_rejected_without_expansion() {
        let started = std::time::Instant::now();
        for raw in ["1e999999999", "1E9999999", "-1e999999999"] {
            assert!(parse_price(raw).is_err(), "{raw}");
            assert!(parse_amount_bound(raw).is_err(), "{raw}");
        }
        assert_eq!(parse_amount_bound("1e-999999999").unwrap().to_string(), "0.00");
        assert_eq!(
            message(parse_price("1e999999999").unwrap_err()),
            "Price must not exceed 99999999.99"
        );
        assert_eq!(
            message(parse_price("-1e999999999").unwrap_err()),
            "Price must be positive"
        );
        assert_eq!(
            message(parse_price("1e-999999999").unwrap_err()),
            "Price must be positive"
        );
        assert!(started.elapsed() < std::time::Duration::from_secs(1));
    }

    #[test]
    fn overlong_literals_are_invalid() {
        let long = format!("1.{}", "0".repeat(60));
        assert!(message(parse_price(&long).unwrap_err()).starts_with("Invalid price"));
        assert!(message(parse_amount_bound(&long).unwrap_err()).starts_with("Invalid decimal"));
    }

    #[test]
    fn price_limit_is_inclusive() {
        assert_eq!(parse_price("99999999.99").unwrap().to_string(), "99999999.99");
        assert_eq!(parse_price("9.999999999e7").unwrap().to_string(), "99999999.99");
        assert!(parse_price("99999999.995").is_err());
    }

    #[test]
    fn amount_bounds_are_rounded_and_capped() {
        assert_eq!(parse_amount_bound("20").unwrap().to_string(), "20.00");
        assert_eq!(parse_amount_bound("-5.005").unwrap().to_string(), "-5.01");
        assert_eq!(parse_amount_bound("1e-50").unwrap().to_string(), "0.00");
        assert_eq!(
            message(parse_amount_bound("1e12").unwrap_err()),
            "Amount must be between -99999999.99 and 99999999.99"
        );
    }

    #[test]
    fn order_total_limit() {
        assert!(validate_order_total(&BigDecimal::from_str("99999999.99").unwrap()).is_ok());
        assert_eq!(
            message(validate_order_total(&BigDecimal::from_str("120000000.00").unwrap()).unwrap_err()),
            "Order total must not exceed 99999999.99"
        );
    }

    #[test]
    fn price_is_rounded_to_cents() {
        assert_eq!(parse_price("15.5").unwrap().to_string(), "15.50");
        assert_eq!(parse_price("9.995").unwrap().to_string(), "10.00");
        assert_eq!(parse_price(" 10 ").unwrap().to_string(), "10.00");
    }

    #[test]
    fn stock_cannot_be_negative() {
        assert_eq!(validate_stock(0).unwrap(), 0);
        assert_eq!(validate_stock(42).unwrap(), 42);
        assert_eq!(message(validate_stock(-1).unwrap_err()), "Stock cannot be negative");
    }

    #[test]
    fn order_date_accepts_iso_forms() {
        let with_offset = parse_order_date("2024-03-01T12:30:00+03:00").unwrap();
        assert_eq!(with_offset.hour(), 9);

        let naive = parse_order_date("2024-03-01T12:30:00").unwrap();
        assert_eq!(naive.hour(), 12);

        let fractional = parse_order_date("2024-03-01T12:30:00.250").unwrap();
        assert_eq!(fractional.minute(), 30);

        let date_only = parse_order_date("2024-03-01").unwrap();
        assert_eq!((date_only.day(), date_only.hour()), (1, 0));
    }

    #[test]
    fn order_date_rejects_garbage() {
        for bad in ["yesterday", "2024-13-01", "01/03/2024", ""] {
            let err = parse_order_date(bad).expect_err(bad);
            assert!(message(err).starts_with("Invalid order date"), "{bad}");
        }
    }

    #[test]
    fn parse_id_ignores_garbage() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id(&id.to_string()), Some(id));
        assert_eq!(parse_id("42"), None);
    }
}
