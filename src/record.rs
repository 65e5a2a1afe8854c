//! # Label Records
//!
//! The loosely-typed input accepted from Grocy. Grocy posts either a flat set
//! of fields or its webhook shape with nested `stock_entry`,
//! `stock_entry_userfields` and `quantity_unit_stock` objects:
//!
//! ```json
//! {
//!   "product": "Test Product",
//!   "grocycode": "grcy:p:42",
//!   "stock_entry": { "amount": "2", "best_before_date": "2024-12-31" },
//!   "quantity_unit_stock": { "name": "piece", "name_plural": "pieces" }
//! }
//! ```
//!
//! Every field is optional and lenient: `null`, a missing key, or a value of
//! the wrong shape all deserialize as `None`. Names and the grocycode may be
//! numbers and are printed as their decimal text. Unknown keys are ignored. The
//! record is converted once, by [`crate::normalize`], into a strict
//! [`crate::normalize::CanonicalLabel`].

use rust_decimal::Decimal;
use serde::de::{Deserializer, IgnoredAny};
use serde::Deserialize;
use std::borrow::Cow;
use std::str::FromStr;

/// A number or a string. Form fields always arrive as strings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Number(f64),
    Text(String),
}

impl Scalar {
    /// Parse as a decimal. Empty strings and non-numeric text give `None`.
    pub fn to_decimal(&self) -> Option<Decimal> {
        match self {
            // f64 Display never uses exponent notation, so this round-trips
            Scalar::Number(n) if n.is_finite() => Decimal::from_str(&n.to_string()).ok(),
            Scalar::Number(_) => None,
            Scalar::Text(s) => {
                let s = s.trim();
                Decimal::from_str(s)
                    .or_else(|_| Decimal::from_scientific(s))
                    .ok()
            }
        }
    }

    /// Whether the value is present and reads as a number.
    pub fn is_numeric(&self) -> bool {
        self.to_decimal().is_some()
    }

    /// Trimmed text of the value, `None` when blank.
    pub fn to_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Scalar::Number(n) if n.is_finite() => Some(Cow::Owned(n.to_string())),
            Scalar::Number(_) => None,
            Scalar::Text(s) => Some(s.trim()).filter(|s| !s.is_empty()).map(Cow::Borrowed),
        }
    }

    /// Whether the value is an empty (or whitespace-only) string.
    pub fn is_blank(&self) -> bool {
        matches!(self, Scalar::Text(s) if s.trim().is_empty())
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lenient<T> {
    Value(T),
    #[allow(dead_code)]
    Ignored(IgnoredAny),
}

/// Deserialize an optional field, turning values of the wrong shape into `None`.
fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(match Option::<Lenient<T>>::deserialize(deserializer)? {
        Some(Lenient::Value(value)) => Some(value),
        _ => None,
    })
}

/// Stock entry block of the Grocy webhook payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StockEntry {
    #[serde(default, deserialize_with = "lenient")]
    pub amount: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub best_before_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub purchased_date: Option<String>,
}

/// User-defined fields attached to a stock entry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StockEntryUserfields {
    #[serde(
        rename = "StockEntryContainerWeight",
        default,
        deserialize_with = "lenient"
    )]
    pub container_weight: Option<Scalar>,
}

/// Quantity unit names.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct QuantityUnit {
    #[serde(default, deserialize_with = "lenient")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub name_plural: Option<String>,
}

/// Product details block, where older Grocy versions put the stock unit.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ProductDetails {
    #[serde(default, deserialize_with = "lenient")]
    pub quantity_unit_stock: Option<QuantityUnit>,
}

/// Raw label data as sent by Grocy.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct LabelRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub product: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub battery: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub chore: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub recipe: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub grocycode: Option<Scalar>,

    #[serde(default, deserialize_with = "lenient")]
    pub amount: Option<Scalar>,
    #[serde(default, deserialize_with = "lenient")]
    pub qu_name: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub qu_name_plural: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub best_before_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub purchased_date: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub container_weight: Option<Scalar>,

    #[serde(default, deserialize_with = "lenient")]
    pub stock_entry: Option<StockEntry>,
    #[serde(default, deserialize_with = "lenient")]
    pub stock_entry_userfields: Option<StockEntryUserfields>,
    #[serde(default, deserialize_with = "lenient")]
    pub quantity_unit_stock: Option<QuantityUnit>,
    #[serde(default, deserialize_with = "lenient")]
    pub details: Option<ProductDetails>,
}

/// Trimmed, non-empty view of an optional string.
fn filled(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl LabelRecord {
    /// True when no recognized field was supplied at all.
    pub fn is_empty(&self) -> bool {
        *self == LabelRecord::default()
    }

    /// First non-empty of product, battery, chore, recipe.
    pub fn name(&self) -> Option<Cow<'_, str>> {
        [&self.product, &self.battery, &self.chore, &self.recipe]
            .into_iter()
            .find_map(|field| field.as_ref()?.to_text())
    }

    pub fn grocycode(&self) -> Option<Cow<'_, str>> {
        self.grocycode.as_ref()?.to_text()
    }

    pub fn amount(&self) -> Option<&Scalar> {
        self.amount
            .as_ref()
            .filter(|a| !a.is_blank())
            .or_else(|| self.stock_entry.as_ref()?.amount.as_ref())
            .filter(|a| !a.is_blank())
    }

    pub fn best_before_date(&self) -> Option<&str> {
        filled(&self.best_before_date)
            .or_else(|| filled(&self.stock_entry.as_ref()?.best_before_date))
    }

    pub fn purchased_date(&self) -> Option<&str> {
        filled(&self.purchased_date).or_else(|| filled(&self.stock_entry.as_ref()?.purchased_date))
    }

    /// Stock unit, checking `quantity_unit_stock` before `details.quantity_unit_stock`.
    fn unit(&self) -> Option<&QuantityUnit> {
        self.quantity_unit_stock
            .as_ref()
            .or_else(|| self.details.as_ref()?.quantity_unit_stock.as_ref())
    }

    pub fn unit_name(&self) -> Option<&str> {
        filled(&self.qu_name).or_else(|| filled(&self.unit()?.name))
    }

    pub fn unit_name_plural(&self) -> Option<&str> {
        filled(&self.qu_name_plural).or_else(|| filled(&self.unit()?.name_plural))
    }

    /// Container/weight items carry a numeric container weight.
    pub fn is_container_item(&self) -> bool {
        let nested = self
            .stock_entry_userfields
            .as_ref()
            .and_then(|u| u.container_weight.as_ref());
        self.container_weight
            .as_ref()
            .into_iter()
            .chain(nested)
            .any(Scalar::is_numeric)
    }
}
