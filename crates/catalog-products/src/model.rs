use bson::{Bson, Document};
use serde::{Deserialize, Serialize, Serializer};

use crate::error::ProductError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Store-assigned; `None` until the product is inserted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub commercial_name: String,
    pub ingredients: Vec<Ingredient>,
    pub quantity: Quantity,
    #[serde(serialize_with = "number")]
    pub amount: f64,
    pub category: String,
    pub list_type: ListType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    pub concentration: Concentration,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Concentration {
    pub unit: String,
    #[serde(serialize_with = "number")]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(serialize_with = "number")]
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListType {
    pub description: String,
    pub require_recipe: bool,
}

/// Whole numbers are written without a fraction (`30`, not `30.0`).
fn number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    // 2^53: every integer below it is exact in f64.
    if value.fract() == 0.0 && value.abs() < 9_007_199_254_740_992.0 {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

// ── Document mapping ────────────────────────────────────────────
//
// Stored documents use the same key names as the JSON shape, except the
// identifier, which lives under `_id`.

impl Product {
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();
        if let Some(id) = &self.id {
            doc.insert("_id", id.as_str());
        }
        doc.insert("commercialName", self.commercial_name.as_str());
        doc.insert(
            "ingredients",
            self.ingredients
                .iter()
                .map(|i| Bson::Document(i.to_document()))
                .collect::<Vec<_>>(),
        );
        doc.insert("quantity", self.quantity.to_document());
        doc.insert("amount", self.amount);
        doc.insert("category", self.category.as_str());
        doc.insert("listType", self.list_type.to_document());
        doc
    }

    pub fn from_document(doc: &Document) -> Result<Self, ProductError> {
        let id = match doc.get("_id") {
            None | Some(Bson::Null) => None,
            Some(Bson::String(s)) => Some(s.clone()),
            Some(Bson::ObjectId(oid)) => Some(oid.to_hex()),
            Some(other) => Some(other.to_string()),
        };

        let ingredients = get_array(doc, "ingredients")?
            .iter()
            .map(|item| match item {
                Bson::Document(d) => Ingredient::from_document(d),
                other => Err(ProductError::Decode(format!(
                    "ingredients: expected document, got {other}"
                ))),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Product {
            id,
            commercial_name: get_string(doc, "commercialName")?,
            ingredients,
            quantity: Quantity::from_document(get_document(doc, "quantity")?)?,
            amount: get_number(doc, "amount")?,
            category: get_string(doc, "category")?,
            list_type: ListType::from_document(get_document(doc, "listType")?)?,
        })
    }
}

impl Ingredient {
    fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("name", self.name.as_str());
        doc.insert("concentration", self.concentration.to_document());
        doc
    }

    fn from_document(doc: &Document) -> Result<Self, ProductError> {
        Ok(Ingredient {
            name: get_string(doc, "name")?,
            concentration: Concentration::from_document(get_document(doc, "concentration")?)?,
        })
    }
}

impl Concentration {
    fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("unit", self.unit.as_str());
        doc.insert("value", self.value);
        doc
    }

    fn from_document(doc: &Document) -> Result<Self, ProductError> {
        Ok(Concentration {
            unit: get_string(doc, "unit")?,
            value: get_number(doc, "value")?,
        })
    }
}

impl Quantity {
    fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("type", self.kind.as_str());
        doc.insert("value", self.value);
        doc
    }

    fn from_document(doc: &Document) -> Result<Self, ProductError> {
        Ok(Quantity {
            kind: get_string(doc, "type")?,
            value: get_number(doc, "value")?,
        })
    }
}

impl ListType {
    fn to_document(&self) -> Document {
        let mut doc = Document::new();
        doc.insert("description", self.description.as_str());
        doc.insert("requireRecipe", self.require_recipe);
        doc
    }

    fn from_document(doc: &Document) -> Result<Self, ProductError> {
        let require_recipe = match doc.get("requireRecipe") {
            Some(Bson::Boolean(b)) => *b,
            other => return Err(mismatch("requireRecipe", "boolean", other)),
        };
        Ok(ListType {
            description: get_string(doc, "description")?,
            require_recipe,
        })
    }
}

fn get_string(doc: &Document, key: &str) -> Result<String, ProductError> {
    match doc.get(key) {
        Some(Bson::String(s)) => Ok(s.clone()),
        other => Err(mismatch(key, "string", other)),
    }
}

/// Any BSON numeric type widens to `f64`.
fn get_number(doc: &Document, key: &str) -> Result<f64, ProductError> {
    match doc.get(key) {
        Some(Bson::Double(v)) => Ok(*v),
        Some(Bson::Int32(v)) => Ok(f64::from(*v)),
        Some(Bson::Int64(v)) => Ok(*v as f64),
        other => Err(mismatch(key, "number", other)),
    }
}

fn get_document<'a>(doc: &'a Document, key: &str) -> Result<&'a Document, ProductError> {
    match doc.get(key) {
        Some(Bson::Document(d)) => Ok(d),
        other => Err(mismatch(key, "document", other)),
    }
}

fn get_array<'a>(doc: &'a Document, key: &str) -> Result<&'a [Bson], ProductError> {
    match doc.get(key) {
        Some(Bson::Array(items)) => Ok(items.as_slice()),
        other => Err(mismatch(key, "array", other)),
    }
}

fn mismatch(key: &str, expected: &str, found: Option<&Bson>) -> ProductError {
    match found {
        None => ProductError::Decode(format!("{key}: missing")),
        Some(value) => ProductError::Decode(format!(
            "{key}: expected {expected}, got {:?}",
            value.element_type()
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bson::doc;

    fn sample() -> Product {
        Product {
            id: None,
            commercial_name: "Teste".into(),
            ingredients: vec![Ingredient {
                name: "Teste".into(),
                concentration: Concentration {
                    unit: "mg".into(),
                    value: 100.0,
                },
            }],
            quantity: Quantity {
                kind: "cp".into(),
                value: 30.0,
            },
            amount: 1.0,
            category: "TESTE".into(),
            list_type: ListType {
                description: "D1".into(),
                require_recipe: true,
            },
        }
    }

    #[test]
    fn document_keys_match_json_names() {
        let doc = sample().to_document();
        let keys: Vec<&str> = doc.keys().map(String::as_str).collect();
        assert_eq!(
            keys,
            [
                "commercialName",
                "ingredients",
                "quantity",
                "amount",
                "category",
                "listType"
            ]
        );
        assert_eq!(doc.get_document("quantity").unwrap().get_str("type").unwrap(), "cp");
        assert!(doc.get_document("listType").unwrap().get_bool("requireRecipe").unwrap());
    }

    #[test]
    fn id_maps_to_underscore_id() {
        let mut product = sample();
        product.id = Some("p-1".into());
        let doc = product.to_document();
        assert_eq!(doc.get_str("_id").unwrap(), "p-1");
        assert_eq!(Product::from_document(&doc).unwrap(), product);
    }

    #[test]
    fn object_id_decodes_as_hex() {
        let oid = bson::oid::ObjectId::new();
        let mut doc = sample().to_document();
        doc.insert("_id", oid);
        let product = Product::from_document(&doc).unwrap();
        assert_eq!(product.id, Some(oid.to_hex()));
    }

    #[test]
    fn integer_numbers_widen() {
        let doc = doc! {
            "commercialName": "X",
            "ingredients": [],
            "quantity": { "type": "cp", "value": 30_i32 },
            "amount": 2_i64,
            "category": "C",
            "listType": { "description": "D1", "requireRecipe": false },
        };
        let product = Product::from_document(&doc).unwrap();
        assert_eq!(product.quantity.value, 30.0);
        assert_eq!(product.amount, 2.0);
        assert!(product.ingredients.is_empty());
    }

    #[test]
    fn missing_key_is_reported() {
        let mut doc = sample().to_document();
        doc.remove("category");
        let err = Product::from_document(&doc).unwrap_err();
        assert_eq!(err.to_string(), "malformed product document: category: missing");
    }

    #[test]
    fn wrong_type_is_reported() {
        let mut doc = sample().to_document();
        doc.insert("amount", "cheap");
        let err = Product::from_document(&doc).unwrap_err();
        assert!(err.to_string().contains("amount: expected number"), "{err}");
    }

    #[test]
    fn json_shape_is_camel_case_without_id() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["commercialName"], "Teste");
        assert_eq!(json["quantity"]["type"], "cp");
        assert_eq!(json["listType"]["requireRecipe"], true);
        assert_eq!(json["ingredients"][0]["concentration"]["unit"], "mg");
    }

    #[test]
    fn json_puts_id_first() {
        let mut product = sample();
        product.id = Some("abc".into());
        let json = serde_json::to_string(&product).unwrap();
        assert!(json.starts_with(r#"{"id":"abc","commercialName":"Teste""#), "{json}");
    }

    #[test]
    fn whole_numbers_serialize_without_fraction() {
        let mut product = sample();
        product.amount = 39.7;
        let json = serde_json::to_string(&product).unwrap();
        assert!(json.contains(r#""quantity":{"type":"cp","value":30}"#), "{json}");
        assert!(json.contains(r#""amount":39.7"#), "{json}");

        let back: Product = serde_json::from_str(&json).unwrap();
        assert_eq!(back, product);
    }
}
