//! Search document types.
//!
//! A search document is the denormalized projection of an offering and its catalog
//! product. Apart from its identity the document is an open field map: catalog
//! products carry arbitrary attributes and every one of them is indexed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::types::decimal::{decimal_from_value, decimal_to_value};
use crate::types::offering::CommercialFields;

/// Field name under which the index reports a document's identity.
pub const OBJECT_ID: &str = "objectID";

pub const SUPPLIER_ID: &str = "supplier_id";
pub const PRICE: &str = "price";
pub const WAS_PRICE: &str = "was_price";

/// A document as stored in, and returned by, the search index.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchDocument {
    /// Document identity; always the offering id.
    #[serde(rename = "objectID")]
    pub object_id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Response of `POST /indexes/{name}/query`.
///
/// Response metadata other than `hits` (paging, counts, timings) is carried through
/// untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct SearchHits {
    #[serde(default)]
    pub hits: Vec<SearchDocument>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl SearchDocument {
    pub fn new(object_id: impl Into<String>) -> Self {
        Self {
            object_id: object_id.into(),
            fields: Map::new(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn supplier_id(&self) -> Option<&str> {
        self.fields.get(SUPPLIER_ID).and_then(Value::as_str)
    }

    /// The document's price, read exactly. `None` if absent or not numeric.
    pub fn price(&self) -> Option<Decimal> {
        self.fields.get(PRICE).and_then(decimal_from_value)
    }

    pub fn was_price(&self) -> Option<Decimal> {
        self.fields.get(WAS_PRICE).and_then(decimal_from_value)
    }

    /// Replace the document price, leaving every other field as is.
    pub fn set_price(&mut self, price: Decimal) {
        self.fields
            .insert(PRICE.to_string(), decimal_to_value(price));
    }

    /// The commercial fields already recorded on this document.
    pub fn commercial_fields(&self) -> CommercialFields {
        CommercialFields {
            supplier_id: self.supplier_id().map(str::to_string),
            price: self.price(),
            was_price: self.was_price(),
        }
    }
}

impl SearchHits {
    pub fn new(hits: Vec<SearchDocument>) -> Self {
        Self {
            hits,
            extra: Map::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    pub fn len(&self) -> usize {
        self.hits.len()
    }
}
