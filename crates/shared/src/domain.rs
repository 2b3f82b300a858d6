use serde::{Deserialize, Serialize};

/// One product line in the basket. Product identifiers are unique within a
/// basket; repeated additions increment `quantity` instead of appending.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BasketEntry {
    pub product: String,
    pub quantity: u32,
}

impl BasketEntry {
    pub fn new(product: impl Into<String>, quantity: u32) -> Self {
        Self {
            product: product.into(),
            quantity,
        }
    }
}

/// Sum of all entry quantities, the number the indicator badge displays.
pub fn total_quantity(basket: &[BasketEntry]) -> u32 {
    basket.iter().map(|entry| entry.quantity).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_quantities_across_entries() {
        let basket = vec![BasketEntry::new("apple", 2), BasketEntry::new("banana", 1)];
        assert_eq!(total_quantity(&basket), 3);
    }

    #[test]
    fn empty_basket_totals_zero() {
        assert_eq!(total_quantity(&[]), 0);
    }

    #[test]
    fn serializes_to_object_form() {
        let entry = BasketEntry::new("apple", 2);
        let json = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(json["product"], "apple");
        assert_eq!(json["quantity"], 2);
    }
}
