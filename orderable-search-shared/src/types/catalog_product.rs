//! Catalog product types.
//!
//! A catalog product is owned by the catalog service and only ever read here. Its
//! well-known blocks (`category`, `product_type_attributes`, `_metadata`) are typed;
//! every other descriptive attribute is kept verbatim in `attributes`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A product as returned by `GET /products/{id}?expand[]=category`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CatalogProduct {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_type_attributes: Option<Vec<ProductTypeAttribute>>,
    #[serde(rename = "_metadata", default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProductMetadata>,
    /// Free-form descriptive attributes (name, brand, images, ...).
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

/// The expanded category a product belongs to.
///
/// Values are kept as the catalog sent them, whatever their JSON type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Category {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(rename = "_metadata", default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<CategoryMetadata>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct CategoryMetadata {
    /// Ancestor path from the root category down to this one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy: Option<Value>,
}

/// A named attribute defined by the product's type, e.g. `colour: ["red", "blue"]`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductTypeAttribute {
    pub name: String,
    #[serde(default)]
    pub values: Vec<Value>,
}

/// Bookkeeping the catalog service attaches to each product.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct ProductMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Category {
    /// The category's ancestor path, if the catalog expanded it.
    pub fn hierarchy(&self) -> Option<&Value> {
        self.metadata.as_ref().and_then(|m| m.hierarchy.as_ref())
    }
}

impl CatalogProduct {
    /// Product type attributes in catalog order; empty when the product has none.
    pub fn type_attributes(&self) -> &[ProductTypeAttribute] {
        self.product_type_attributes.as_deref().unwrap_or_default()
    }

    /// The `_metadata.created` timestamp, exactly as the catalog reported it.
    pub fn created(&self) -> Option<&Value> {
        self.metadata.as_ref().and_then(|m| m.created.as_ref())
    }
}
