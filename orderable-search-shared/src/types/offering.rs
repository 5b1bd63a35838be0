//! Supplier offering types.
//!
//! An offering (a "linked product" in the supplier service) is one supplier's sellable
//! instance of a catalog product. Its id doubles as the search document id.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A supplier's offering of a catalog product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Offering {
    /// Offering id, also the `objectID` of its search document.
    pub id: String,
    pub supplier_id: String,
    /// The catalog product this offering sells.
    pub product_id: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(
        default,
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub was_price: Option<Decimal>,
}

/// The commercial facts of an offering that only the supplier service owns.
///
/// Every field is optional because documents already in the index may predate
/// some of them. Absent fields are omitted from built documents, never defaulted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CommercialFields {
    pub supplier_id: Option<String>,
    pub price: Option<Decimal>,
    pub was_price: Option<Decimal>,
}

/// One entry of `GET /suppliers?supplies_product={product_id}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierLink {
    /// The supplier's id.
    pub id: String,
    #[serde(rename = "_metadata")]
    pub metadata: SupplierLinkMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierLinkMetadata {
    /// The supplier's offering of the product, i.e. the search document id.
    pub linked_product_id: String,
}

impl Offering {
    /// Project the offering onto its commercial fields.
    pub fn commercial_fields(&self) -> CommercialFields {
        CommercialFields {
            supplier_id: Some(self.supplier_id.clone()),
            price: Some(self.price),
            was_price: self.was_price,
        }
    }
}

impl SupplierLink {
    pub fn linked_product_id(&self) -> &str {
        &self.metadata.linked_product_id
    }
}
