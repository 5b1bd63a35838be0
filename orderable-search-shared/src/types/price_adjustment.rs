//! Membership and price adjustment types.
//!
//! These are read fresh from the customer and supplier services for every priced
//! search request.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How an adjustment changes a price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdjustmentType {
    /// Replace the price outright.
    ValueOverride,
    /// Add a fixed amount (possibly negative) to the price.
    ValueAdjustment,
    /// Scale the price to `amount` percent of itself.
    PercentageAdjustment,
    /// Any type this service does not know; applied as a no-op.
    #[serde(other)]
    Unrecognized,
}

/// The part of an adjustment record the price resolver needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Adjustment {
    pub kind: AdjustmentType,
    pub amount: Decimal,
}

/// A customer's enrollment with a supplier.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Membership {
    pub id: String,
    pub supplier_id: String,
    pub price_adjustment_group_id: String,
}

/// A price adjustment granted to one customer membership for one offering.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CustomerPriceAdjustment {
    pub linked_product_id: String,
    #[serde(rename = "type")]
    pub kind: AdjustmentType,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "_metadata", default)]
    pub metadata: CustomerAdjustmentMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CustomerAdjustmentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub membership_id: Option<String>,
}

/// A price adjustment granted to every member of a supplier's price adjustment group.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupPriceAdjustment {
    pub price_adjustment_group_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_product_id: Option<String>,
    #[serde(rename = "type")]
    pub kind: AdjustmentType,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "_metadata", default)]
    pub metadata: GroupAdjustmentMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct GroupAdjustmentMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linked_product_id: Option<String>,
}

impl Adjustment {
    pub fn new(kind: AdjustmentType, amount: Decimal) -> Self {
        Self { kind, amount }
    }

    pub fn is_override(&self) -> bool {
        self.kind == AdjustmentType::ValueOverride
    }
}

impl CustomerPriceAdjustment {
    pub fn adjustment(&self) -> Adjustment {
        Adjustment::new(self.kind, self.amount)
    }

    pub fn membership_id(&self) -> Option<&str> {
        self.metadata.membership_id.as_deref()
    }

    /// Whether this adjustment belongs to the given offering under the given membership.
    pub fn applies_to(&self, linked_product_id: &str, membership_id: &str) -> bool {
        self.linked_product_id == linked_product_id
            && self.membership_id() == Some(membership_id)
    }
}

impl GroupPriceAdjustment {
    pub fn adjustment(&self) -> Adjustment {
        Adjustment::new(self.kind, self.amount)
    }

    /// The offering this adjustment targets, top-level or nested under `_metadata`.
    pub fn linked_product_id(&self) -> Option<&str> {
        self.linked_product_id
            .as_deref()
            .or(self.metadata.linked_product_id.as_deref())
    }

    /// Whether this adjustment belongs to the given offering within the given group.
    pub fn applies_to(&self, linked_product_id: &str, group_id: &str) -> bool {
        self.linked_product_id() == Some(linked_product_id)
            && self.price_adjustment_group_id == group_id
    }
}
