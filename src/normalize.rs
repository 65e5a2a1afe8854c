//! # Field Normalizer
//!
//! Converts a [`LabelRecord`] into a [`CanonicalLabel`]: the strict, fully
//! typed model the layout engine consumes.
//!
//! ## Rules
//!
//! | Field | Rule |
//! |-------|------|
//! | title | first non-empty name field, trimmed, internal whitespace collapsed; required |
//! | quantity | `""` without an amount, else `<amount> <unit>` with trailing zeros dropped |
//! | unit | plural form when amount ≠ 1 and one is given, else the singular form, else omitted |
//! | dates | `YYYY-MM-DD` (a trailing time is dropped), other text passed through |
//! | qr payload | the grocycode, or empty |
//!
//! Container/weight items suppress the quantity and both dates, whatever the
//! record contains.

use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::LabelError;
use crate::record::LabelRecord;

/// Normalized label content. Built once per request, then only read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalLabel {
    /// Product name, never empty when produced by [`normalize`]
    pub title: String,
    /// Quantity line, e.g. `"2 pieces"`; empty when unknown or suppressed
    pub quantity: String,
    pub best_before: Option<String>,
    pub purchased: Option<String>,
    /// Grocycode encoded into the QR block; empty draws a placeholder
    pub qr_payload: String,
    /// Container/weight item: quantity and dates are never printed
    pub suppress_details: bool,
}

/// Normalize a raw record.
///
/// Fails only when no product name is present.
pub fn normalize(record: &LabelRecord) -> Result<CanonicalLabel, LabelError> {
    let title = record
        .name()
        .map(|name| collapse_whitespace(&name))
        .filter(|t| !t.is_empty())
        .ok_or_else(|| LabelError::InvalidRecord("Product name required".to_string()))?;

    let qr_payload = record.grocycode().map(|code| code.into_owned()).unwrap_or_default();
    let suppress_details = record.is_container_item();

    let label = if suppress_details {
        CanonicalLabel {
            title,
            qr_payload,
            suppress_details,
            ..Default::default()
        }
    } else {
        CanonicalLabel {
            title,
            quantity: quantity_text(record),
            best_before: record.best_before_date().map(display_date),
            purchased: record.purchased_date().map(display_date),
            qr_payload,
            suppress_details,
        }
    };

    debug!(?label, "normalized label record");
    Ok(label)
}

/// Trim and collapse runs of whitespace into single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn quantity_text(record: &LabelRecord) -> String {
    let Some(raw) = record.amount() else {
        return String::new();
    };
    let Some(amount) = raw.to_decimal() else {
        warn!(amount = ?raw, "ignoring unparseable amount");
        return String::new();
    };

    format_quantity(amount, record.unit_name(), record.unit_name_plural())
}

/// Format an amount with its unit.
///
/// ```
/// use grocy_label::normalize::format_quantity;
/// use rust_decimal::Decimal;
///
/// assert_eq!(format_quantity(Decimal::ONE, Some("piece"), Some("pieces")), "1 piece");
/// assert_eq!(format_quantity(Decimal::new(250, 2), Some("kg"), None), "2.5 kg");
/// ```
pub fn format_quantity(amount: Decimal, singular: Option<&str>, plural: Option<&str>) -> String {
    let number = amount.normalize().to_string();
    let unit = if amount == Decimal::ONE {
        singular
    } else {
        plural.or(singular)
    };

    match unit.map(collapse_whitespace).filter(|u| !u.is_empty()) {
        Some(unit) => format!("{} {}", number, unit),
        None => number,
    }
}

/// Render a date for printing. Grocy sometimes sends a full timestamp.
fn display_date(raw: &str) -> String {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%Y-%m-%d").to_string();
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return datetime.date().format("%Y-%m-%d").to_string();
    }
    collapse_whitespace(raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::str::FromStr;

    fn record(value: serde_json::Value) -> LabelRecord {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_flat_record() {
        let label = normalize(&record(json!({
            "product": "Organic Whole Milk 2L",
            "grocycode": "123456",
            "amount": 1,
            "qu_name": "liter",
            "qu_name_plural": "liters"
        })))
        .unwrap();

        assert_eq!(
            label,
            CanonicalLabel {
                title: "Organic Whole Milk 2L".into(),
                quantity: "1 liter".into(),
                best_before: None,
                purchased: None,
                qr_payload: "123456".into(),
                suppress_details: false,
            }
        );
    }

    #[test]
    fn test_grocy_webhook_record() {
        let label = normalize(&record(json!({
            "product": "Test Item",
            "grocycode": "123456",
            "stock_entry": {
                "amount": "2",
                "best_before_date": "2024-12-31",
                "purchased_date": "2024-10-05"
            },
            "quantity_unit_stock": {"name": "piece", "name_plural": "pieces"}
        })))
        .unwrap();

        assert_eq!(label.title, "Test Item");
        assert_eq!(label.quantity, "2 pieces");
        assert_eq!(label.best_before.as_deref(), Some("2024-12-31"));
        assert_eq!(label.purchased.as_deref(), Some("2024-10-05"));
    }

    #[test]
    fn test_container_item_suppresses_quantity_and_dates() {
        let label = normalize(&record(json!({
            "product": "Test Item",
            "grocycode": "123456",
            "stock_entry": {
                "amount": "2",
                "best_before_date": "2024-12-31",
                "purchased_date": "2024-10-05"
            },
            "stock_entry_userfields": {"StockEntryContainerWeight": "100.5"}
        })))
        .unwrap();

        assert!(label.suppress_details);
        assert_eq!(label.quantity, "");
        assert_eq!(label.best_before, None);
        assert_eq!(label.purchased, None);
        assert_eq!(label.qr_payload, "123456");
    }

    #[test]
    fn test_missing_name_is_invalid() {
        let err = normalize(&record(json!({"grocycode": "123"}))).unwrap_err();
        assert!(matches!(err, LabelError::InvalidRecord(_)));

        let err = normalize(&record(json!({"product": "   \t "}))).unwrap_err();
        assert!(err.is_client_error());
    }

    #[test]
    fn test_only_name_is_enough() {
        let label = normalize(&record(json!({"product": "Salt"}))).unwrap();
        assert_eq!(label.title, "Salt");
        assert_eq!(label.quantity, "");
        assert_eq!(label.qr_payload, "");
        assert!(!label.suppress_details);
    }

    #[test]
    fn test_numeric_grocycode_is_encoded() {
        let label = normalize(&record(json!({"product": "Milk", "grocycode": 123456}))).unwrap();
        assert_eq!(label.qr_payload, "123456");

        let label = normalize(&record(json!({"product": 2024}))).unwrap();
        assert_eq!(label.title, "2024");
    }

    #[test]
    fn test_title_whitespace_collapsed() {
        let label = normalize(&record(json!({"product": "  Greek \t Yogurt\n  500g "}))).unwrap();
        assert_eq!(label.title, "Greek Yogurt 500g");
    }

    #[test]
    fn test_quantity_pluralization() {
        let one = Decimal::ONE;
        let three = Decimal::from(3);
        assert_eq!(format_quantity(one, Some("piece"), Some("pieces")), "1 piece");
        assert_eq!(format_quantity(three, Some("piece"), Some("pieces")), "3 pieces");
        assert_eq!(format_quantity(Decimal::ZERO, Some("piece"), Some("pieces")), "0 pieces");
        assert_eq!(format_quantity(three, Some("g"), None), "3 g");
        assert_eq!(format_quantity(one, None, Some("pieces")), "1");
        assert_eq!(format_quantity(three, None, None), "3");
    }

    #[test]
    fn test_quantity_trailing_zeros() {
        let amount = Decimal::from_str("2.500").unwrap();
        assert_eq!(format_quantity(amount, Some("kg"), None), "2.5 kg");

        let amount = Decimal::from_str("1.0").unwrap();
        assert_eq!(format_quantity(amount, Some("liter"), Some("liters")), "1 liter");

        let label = normalize(&record(json!({"product": "Oil", "amount": 2.0}))).unwrap();
        assert_eq!(label.quantity, "2");
    }

    #[test]
    fn test_unparseable_amount_is_absent() {
        let label = normalize(&record(json!({
            "product": "Oil",
            "amount": "a few",
            "qu_name": "bottle"
        })))
        .unwrap();
        assert_eq!(label.quantity, "");
    }

    #[test]
    fn test_dates_keep_date_part() {
        let label = normalize(&record(json!({
            "product": "Eggs",
            "best_before_date": "2024-12-31 00:00:00",
            "purchased_date": "next week"
        })))
        .unwrap();
        assert_eq!(label.best_before.as_deref(), Some("2024-12-31"));
        assert_eq!(label.purchased.as_deref(), Some("next week"));
    }
}
