//! Item operations

mod add;
mod get;
mod list;
mod update;

pub use add::AddItem;
pub use get::GetItem;
pub use list::ListItems;
pub use update::UpdateItem;

use kompello_fields::FieldMap;
use serde_json::Value;

use crate::custom_fields::with_custom_fields;
use crate::error::{BillingError, Result};
use crate::types::Item;

/// `price_per_unit` must be a non-negative number and `price_max`, when set,
/// at least `price_per_unit`.
fn validate_prices(price_per_unit: f64, price_max: Option<f64>) -> Result<()> {
    if !price_per_unit.is_finite() || price_per_unit < 0.0 {
        return Err(BillingError::validation("price_per_unit", "must be a non-negative number"));
    }
    if let Some(price_max) = price_max {
        if !price_max.is_finite() || price_max < price_per_unit {
            return Err(BillingError::validation(
                "price_max",
                "maximum price must be greater than or equal to the base price",
            ));
        }
    }
    Ok(())
}

fn item_json(item: &Item, fields: FieldMap) -> Result<Value> {
    with_custom_fields(serde_json::to_value(item)?, fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_price_rules() {
        assert!(validate_prices(0.0, None).is_ok());
        assert!(validate_prices(10.0, Some(10.0)).is_ok());
        assert!(validate_prices(10.0, Some(25.5)).is_ok());
        assert!(validate_prices(-1.0, None).is_err());
        assert!(validate_prices(f64::NAN, None).is_err());

        match validate_prices(10.0, Some(5.0)) {
            Err(BillingError::Validation { field, .. }) => assert_eq!(field, "price_max"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
