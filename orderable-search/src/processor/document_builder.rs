//! Document builder implementation.
//!
//! Projects an offering's commercial fields and its catalog product into the flat
//! field map the search index stores. The projection is a fixed sequence of merge
//! steps; a later step overwrites any key an earlier step wrote.

use serde_json::{Map, Value};
use tracing::trace;

use orderable_search_shared::types::search_document::OBJECT_ID;
use orderable_search_shared::{decimal_to_value, CatalogProduct, CommercialFields, SearchDocument};

pub const CATEGORY_ID: &str = "category_id";
pub const CATEGORY_NAME: &str = "category_name";
pub const CATEGORY_HIERARCHY: &str = "category_hierarchy";
pub const CREATED: &str = "created";

/// One stage of the document projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStep {
    /// `supplier_id`, `price` and `was_price`, each only when known.
    Commercial,
    /// `category_id`, `category_name` and `category_hierarchy`, `null` when absent.
    Category,
    /// Each product type attribute as a top-level `name -> values` field.
    TypeAttributes,
    /// `created`, copied from the catalog metadata.
    Created,
    /// The product id and every free-form catalog attribute.
    CatalogAttributes,
}

/// Order in which the merge steps run.
pub const MERGE_ORDER: [MergeStep; 5] = [
    MergeStep::Commercial,
    MergeStep::Category,
    MergeStep::TypeAttributes,
    MergeStep::Created,
    MergeStep::CatalogAttributes,
];

/// Accumulates document fields from one commercial record and one catalog product.
pub struct DocumentBuilder<'a> {
    commercial: &'a CommercialFields,
    product: &'a CatalogProduct,
    fields: Map<String, Value>,
}

impl<'a> DocumentBuilder<'a> {
    pub fn new(commercial: &'a CommercialFields, product: &'a CatalogProduct) -> Self {
        Self {
            commercial,
            product,
            fields: Map::new(),
        }
    }

    /// Apply a single merge step.
    pub fn apply(mut self, step: MergeStep) -> Self {
        match step {
            MergeStep::Commercial => self.merge_commercial(),
            MergeStep::Category => self.merge_category(),
            MergeStep::TypeAttributes => self.merge_type_attributes(),
            MergeStep::Created => self.merge_created(),
            MergeStep::CatalogAttributes => self.merge_catalog_attributes(),
        }
        self
    }

    /// Finish the document under the given identity.
    ///
    /// The identity always comes from the caller; an `objectID` attribute
    /// carried by the catalog product never reaches the field map.
    pub fn finish(mut self, object_id: impl Into<String>) -> SearchDocument {
        self.fields.remove(OBJECT_ID);
        SearchDocument {
            object_id: object_id.into(),
            fields: self.fields,
        }
    }

    fn set(&mut self, key: &str, value: Value) {
        self.fields.insert(key.to_string(), value);
    }

    fn merge_commercial(&mut self) {
        let commercial = self.commercial;
        if let Some(ref supplier_id) = commercial.supplier_id {
            self.set("supplier_id", Value::String(supplier_id.clone()));
        }
        if let Some(price) = commercial.price {
            self.set("price", decimal_to_value(price));
        }
        if let Some(was_price) = commercial.was_price {
            self.set("was_price", decimal_to_value(was_price));
        }
    }

    fn merge_category(&mut self) {
        let category = self.product.category.as_ref();

        let id = category.and_then(|c| c.id.clone()).unwrap_or(Value::Null);
        let name = category.and_then(|c| c.name.clone()).unwrap_or(Value::Null);
        let hierarchy = category
            .and_then(|c| c.hierarchy().cloned())
            .unwrap_or(Value::Null);

        self.set(CATEGORY_ID, id);
        self.set(CATEGORY_NAME, name);
        self.set(CATEGORY_HIERARCHY, hierarchy);
    }

    fn merge_type_attributes(&mut self) {
        let product = self.product;
        for attribute in product.type_attributes() {
            if self.fields.contains_key(&attribute.name) {
                trace!(attribute = %attribute.name, "Type attribute overwrites earlier field");
            }
            self.set(&attribute.name, Value::Array(attribute.values.clone()));
        }
    }

    fn merge_created(&mut self) {
        let created = self.product.created().cloned().unwrap_or(Value::Null);
        self.set(CREATED, created);
    }

    fn merge_catalog_attributes(&mut self) {
        let product = self.product;
        self.set("id", Value::String(product.id.clone()));
        for (key, value) in &product.attributes {
            self.set(key, value.clone());
        }
    }
}

/// Build the index document for one offering of a catalog product.
///
/// Total and deterministic: the same inputs always produce a deep-equal document.
pub fn build_document(
    object_id: &str,
    commercial: &CommercialFields,
    product: &CatalogProduct,
) -> SearchDocument {
    MERGE_ORDER
        .iter()
        .fold(DocumentBuilder::new(commercial, product), |builder, step| {
            builder.apply(*step)
        })
        .finish(object_id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn updated_product() -> CatalogProduct {
        serde_json::from_value(json!({
            "id": "p1",
            "name": "new product name",
            "category": {"id": "c1", "name": "category", "_metadata": {"hierarchy": ["c", "c.c1"]}},
            "brand": "mars",
            "product_type_attributes": [
                {"name": "attribute1", "values": ["one", "two"]},
                {"name": "attribute2", "values": [1, 2]}
            ],
            "_metadata": {"created": "2016-03-01T10:00:00.000Z"}
        }))
        .unwrap()
    }

    fn commercial() -> CommercialFields {
        CommercialFields {
            supplier_id: Some("s1".to_string()),
            price: Some(dec!(15.50)),
            was_price: Some(dec!(21.99)),
        }
    }

    #[test]
    fn test_build_full_document() {
        let document = build_document("s1p", &commercial(), &updated_product());

        assert_eq!(document.object_id, "s1p");
        assert_eq!(
            Value::Object(document.fields),
            json!({
                "supplier_id": "s1",
                "price": 15.5,
                "was_price": 21.99,
                "category_id": "c1",
                "category_name": "category",
                "category_hierarchy": ["c", "c.c1"],
                "attribute1": ["one", "two"],
                "attribute2": [1, 2],
                "created": "2016-03-01T10:00:00.000Z",
                "id": "p1",
                "name": "new product name",
                "brand": "mars"
            })
        );
    }

    #[test]
    fn test_structural_keys_never_copied() {
        let document = build_document("s1p", &commercial(), &updated_product());

        assert!(!document.fields.contains_key("category"));
        assert!(!document.fields.contains_key("product_type_attributes"));
        assert!(!document.fields.contains_key("_metadata"));
    }

    #[test]
    fn test_missing_category_and_metadata_become_null() {
        let product: CatalogProduct =
            serde_json::from_value(json!({"id": "p2", "name": "plain"})).unwrap();

        let document = build_document("x", &commercial(), &product);

        assert_eq!(document.get(CATEGORY_ID), Some(&Value::Null));
        assert_eq!(document.get(CATEGORY_NAME), Some(&Value::Null));
        assert_eq!(document.get(CATEGORY_HIERARCHY), Some(&Value::Null));
        assert_eq!(document.get(CREATED), Some(&Value::Null));
    }

    #[test]
    fn test_category_without_hierarchy() {
        let product: CatalogProduct = serde_json::from_value(json!({
            "id": "p2",
            "category": {"id": "c1", "name": "category"}
        }))
        .unwrap();

        let document = build_document("x", &commercial(), &product);

        assert_eq!(document.get(CATEGORY_ID), Some(&json!("c1")));
        assert_eq!(document.get(CATEGORY_HIERARCHY), Some(&Value::Null));
    }

    #[test]
    fn test_category_values_are_copied_verbatim() {
        let product: CatalogProduct = serde_json::from_value(json!({
            "id": "p4",
            "category": {"id": 7, "name": {"en": "Tins"}, "_metadata": {"hierarchy": ["a", 2]}}
        }))
        .unwrap();

        let document = build_document("x", &commercial(), &product);

        assert_eq!(document.get(CATEGORY_ID), Some(&json!(7)));
        assert_eq!(document.get(CATEGORY_NAME), Some(&json!({"en": "Tins"})));
        assert_eq!(document.get(CATEGORY_HIERARCHY), Some(&json!(["a", 2])));
    }

    #[test]
    fn test_absent_commercial_fields_are_omitted() {
        let document = build_document("x", &CommercialFields::default(), &updated_product());

        assert!(!document.fields.contains_key("supplier_id"));
        assert!(!document.fields.contains_key("price"));
        assert!(!document.fields.contains_key("was_price"));
    }

    #[test]
    fn test_later_steps_overwrite_earlier_fields() {
        let product: CatalogProduct = serde_json::from_value(json!({
            "id": "p3",
            "brand": "catalog brand",
            "product_type_attributes": [
                {"name": "price", "values": ["pivoted"]},
                {"name": "brand", "values": ["pivoted brand"]}
            ]
        }))
        .unwrap();

        let document = build_document("x", &commercial(), &product);

        // type attribute beats commercial, plain attribute beats type attribute
        assert_eq!(document.get("price"), Some(&json!(["pivoted"])));
        assert_eq!(document.get("brand"), Some(&json!("catalog brand")));
    }

    #[test]
    fn test_identity_comes_from_caller() {
        let product: CatalogProduct =
            serde_json::from_value(json!({"id": "p4", "objectID": "stale"})).unwrap();

        let document = build_document("s9p", &commercial(), &product);

        assert_eq!(document.object_id, "s9p");
        assert!(!document.fields.contains_key("objectID"));
        let body = serde_json::to_value(&document).unwrap();
        assert_eq!(body["objectID"], json!("s9p"));
    }

    #[test]
    fn test_build_is_deterministic() {
        let product = updated_product();
        let first = build_document("s1p", &commercial(), &product);
        let second = build_document("s1p", &commercial(), &product);

        assert_eq!(first, second);
    }

    #[test]
    fn test_steps_applied_one_by_one() {
        let commercial = commercial();
        let product = updated_product();

        let partial = DocumentBuilder::new(&commercial, &product)
            .apply(MergeStep::Commercial)
            .apply(MergeStep::Created)
            .finish("s1p");

        assert_eq!(partial.fields.len(), 4);
        assert_eq!(partial.get(CREATED), Some(&json!("2016-03-01T10:00:00.000Z")));
    }
}
