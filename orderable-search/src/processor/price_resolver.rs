//! Price resolution.
//!
//! Applies at most one customer adjustment and at most one group adjustment to an
//! offering's base price. A customer override short-circuits everything; otherwise
//! the group adjustment is applied first and the customer adjustment second.

use rust_decimal::Decimal;

use orderable_search_shared::{Adjustment, AdjustmentType};

/// The adjustments that apply to one hit for one customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceAdjustments {
    pub customer: Option<Adjustment>,
    pub group: Option<Adjustment>,
}

impl PriceAdjustments {
    pub fn new(customer: Option<Adjustment>, group: Option<Adjustment>) -> Self {
        Self { customer, group }
    }

    /// Whether the customer adjustment alone decides the price.
    pub fn is_customer_override(&self) -> bool {
        self.customer.is_some_and(|a| a.is_override())
    }

    pub fn resolve(&self, base_price: Decimal) -> Decimal {
        resolve_price(base_price, self.customer, self.group)
    }
}

/// Compute the price a customer sees.
///
/// Arithmetic is exact decimal and the result is not rounded. Unrecognized
/// adjustment types leave the price unchanged.
pub fn resolve_price(
    base_price: Decimal,
    customer: Option<Adjustment>,
    group: Option<Adjustment>,
) -> Decimal {
    if let Some(adjustment) = customer.filter(Adjustment::is_override) {
        return adjustment.amount;
    }

    let mut price = base_price;

    if let Some(adjustment) = group {
        price = apply(price, adjustment);
    }

    if let Some(adjustment) = customer {
        price = apply(price, adjustment);
    }

    price
}

fn apply(price: Decimal, adjustment: Adjustment) -> Decimal {
    match adjustment.kind {
        AdjustmentType::ValueOverride => adjustment.amount,
        AdjustmentType::ValueAdjustment => price.saturating_add(adjustment.amount),
        AdjustmentType::PercentageAdjustment => {
            price.saturating_mul(adjustment.amount / Decimal::ONE_HUNDRED)
        }
        AdjustmentType::Unrecognized => price,
    }
}
