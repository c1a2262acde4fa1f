//! Normalization from raw Lightspeed units to [`unitsync_core::NormalizedProduct`].

use unitsync_core::{NormalizedProduct, StockFlag, PRODUCT_TYPE_SIMPLE};

use crate::error::LightspeedError;
use crate::types::RawUnitRecord;

/// Fields that must be present for a unit to become a product, in the order
/// they are reported when missing.
pub const REQUIRED_FIELDS: [&str; 4] = ["Make", "Model", "StockNumber", "WebPrice"];

/// A normalized product plus the optional attributes that were filled with
/// the empty-string default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedUnit {
    pub product: NormalizedProduct,
    pub defaulted: Vec<&'static str>,
}

/// Normalizes a raw unit into a [`NormalizedProduct`].
///
/// `OnHold` equal to the empty string means the unit is in stock; any other
/// value, `null`, or absence means it is not.
///
/// # Errors
///
/// Returns [`LightspeedError::MissingFields`] listing every absent required
/// field.
pub fn normalize_unit(unit: &RawUnitRecord) -> Result<NormalizedUnit, LightspeedError> {
    let missing: Vec<&'static str> = REQUIRED_FIELDS
        .into_iter()
        .filter(|field| !unit.has(field))
        .collect();
    if !missing.is_empty() {
        return Err(LightspeedError::MissingFields { fields: missing });
    }

    let required = |key: &'static str| unit.text(key).unwrap_or_default();

    let mut defaulted = Vec::new();
    let mut optional = |key: &'static str| {
        unit.text(key).unwrap_or_else(|| {
            defaulted.push(key);
            String::new()
        })
    };

    let vin = optional("VIN");
    let model_year = optional("ModelYear");
    let condition = optional("Condition");
    let color = optional("Color");
    let length = optional("Length");
    let width = optional("Width");

    let product = NormalizedProduct {
        title: format!("{} {}", required("Make"), required("Model")),
        description: unit.text("CodeName").unwrap_or_default(),
        sku: required("StockNumber"),
        price: required("WebPrice"),
        stock: stock_flag(unit),
        vin,
        model_year,
        condition,
        color,
        length,
        width,
        product_type: PRODUCT_TYPE_SIMPLE.to_owned(),
    };

    Ok(NormalizedUnit { product, defaulted })
}

fn stock_flag(unit: &RawUnitRecord) -> StockFlag {
    match unit.get("OnHold") {
        Some(serde_json::Value::String(s)) if s.is_empty() => StockFlag::InStock,
        _ => StockFlag::OutOfStock,
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
