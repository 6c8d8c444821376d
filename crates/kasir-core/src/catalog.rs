//! # Catalog
//!
//! Maps loosely typed product records from the backend into validated
//! [`Product`] values, and serves lookups for the product grid.
//!
//! ## Mapping Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Backend record → Product                             │
//! │                                                                         │
//! │  { "_id": 7, "itemName": "Kopi", "harga": "25000", "stok": 3 }         │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  RawProduct          (serde, aliases, every field a JSON Value)        │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  coerce              id: 7 → "7"      price: "25000" → 25000            │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Product::new        validation.rs rules                               │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Catalog             unique ids, insertion order                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The cart engine only ever receives `Product`, so backend schema drift
//! stops here.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{CatalogError, CatalogResult, ValidationError};
use crate::money::Money;
use crate::types::{Product, ProductId};
use crate::validation::ValidationResult;

// =============================================================================
// Raw Product
// =============================================================================

/// A product record exactly as the backend sends it.
///
/// Every field is optional and untyped; [`Product::try_from`] decides what is
/// acceptable. Unknown fields are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawProduct {
    #[serde(default, alias = "_id")]
    pub id: Option<Value>,

    #[serde(default, alias = "itemName")]
    pub name: Option<Value>,

    #[serde(default, alias = "harga")]
    pub price: Option<Value>,

    #[serde(default, alias = "stok")]
    pub stock: Option<Value>,

    #[serde(default, alias = "kategori")]
    pub category: Option<Value>,
}

impl TryFrom<RawProduct> for Product {
    type Error = CatalogError;

    fn try_from(raw: RawProduct) -> CatalogResult<Self> {
        let id = coerce_id(raw.id.as_ref())?;
        let name = coerce_text("name", raw.name.as_ref())?.unwrap_or_default();
        let price = match raw.price.as_ref() {
            None | Some(Value::Null) => {
                return Err(ValidationError::Required {
                    field: "price".to_string(),
                }
                .into())
            }
            Some(value) => coerce_whole_number("price", value)?,
        };
        let stock = match raw.stock.as_ref() {
            None | Some(Value::Null) => 0,
            Some(value) => coerce_whole_number("stock", value)?,
        };
        let category = coerce_text("category", raw.category.as_ref())?.unwrap_or_default();

        Ok(Product::new(id, name, Money::from_minor(price), stock, category)?)
    }
}

fn coerce_id(value: Option<&Value>) -> ValidationResult<ProductId> {
    let required = || ValidationError::Required {
        field: "id".to_string(),
    };

    match value {
        None | Some(Value::Null) => Err(required()),
        Some(Value::String(s)) if s.trim().is_empty() => Err(required()),
        Some(Value::String(s)) => Ok(ProductId::new(s.as_str())),
        Some(Value::Number(n)) => {
            if let Some(i) = n.as_i64() {
                Ok(ProductId::from(i))
            } else if let Some(u) = n.as_u64() {
                Ok(ProductId::from(u))
            } else {
                Err(ValidationError::InvalidFormat {
                    field: "id".to_string(),
                    reason: "numeric id must be a whole number".to_string(),
                })
            }
        }
        Some(other) => Err(ValidationError::InvalidFormat {
            field: "id".to_string(),
            reason: format!("expected string or number, got {}", json_kind(other)),
        }),
    }
}

fn coerce_text(field: &str, value: Option<&Value>) -> ValidationResult<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("expected string, got {}", json_kind(other)),
        }),
    }
}

/// Accepts `25000`, `25000.0` and `"25000"`; rejects fractions and text.
fn coerce_whole_number(field: &str, value: &Value) -> ValidationResult<i64> {
    match value {
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                Ok(i)
            } else if n.is_u64() {
                Err(out_of_range(field))
            } else {
                float_to_whole(field, n.as_f64().unwrap_or(f64::NAN))
            }
        }
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Ok(i);
            }
            match s.parse::<f64>() {
                Ok(f) => float_to_whole(field, f),
                Err(_) => Err(ValidationError::InvalidFormat {
                    field: field.to_string(),
                    reason: format!("'{}' is not a number", s),
                }),
            }
        }
        other => Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: format!("expected number, got {}", json_kind(other)),
        }),
    }
}

fn float_to_whole(field: &str, f: f64) -> ValidationResult<i64> {
    if !f.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }
    if f.fract() != 0.0 {
        return Err(ValidationError::MustBeInteger {
            field: field.to_string(),
        });
    }
    if f < i64::MIN as f64 || f >= i64::MAX as f64 {
        return Err(out_of_range(field));
    }
    Ok(f as i64)
}

fn out_of_range(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Catalog
// =============================================================================

/// The list of purchasable products, keyed by id, in backend order.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    products: Vec<Product>,
    index: HashMap<ProductId, usize>,
}

impl Catalog {
    /// Builds a catalog, rejecting duplicate ids.
    pub fn from_products(products: Vec<Product>) -> CatalogResult<Self> {
        let mut index = HashMap::with_capacity(products.len());
        for (i, product) in products.iter().enumerate() {
            if index.insert(product.id.clone(), i).is_some() {
                return Err(CatalogError::DuplicateId(product.id.to_string()));
            }
        }
        Ok(Catalog { products, index })
    }

    /// Maps raw backend records. The first bad record fails the whole load.
    pub fn from_raw(records: Vec<RawProduct>) -> CatalogResult<Self> {
        let products = records
            .into_iter()
            .enumerate()
            .map(|(i, raw)| Product::try_from(raw).map_err(|e| e.at_index(i)))
            .collect::<CatalogResult<Vec<_>>>()?;
        Self::from_products(products)
    }

    /// Parses a backend payload: either a JSON array of product records or
    /// the `{ "data": [...] }` envelope the list endpoint returns.
    ///
    /// ```rust
    /// use kasir_core::catalog::Catalog;
    /// use kasir_core::types::ProductId;
    ///
    /// let catalog = Catalog::from_json_str(
    ///     r#"{ "data": [ { "id": 1, "name": "Kopi", "price": "25000" } ] }"#,
    /// ).unwrap();
    /// assert_eq!(catalog.get(&ProductId::from("1")).unwrap().price.minor(), 25000);
    /// ```
    pub fn from_json_str(payload: &str) -> CatalogResult<Self> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| CatalogError::Malformed(e.to_string()))?;

        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("data") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(CatalogError::Malformed(
                        "expected an array or an object with a 'data' array".to_string(),
                    ))
                }
            },
            other => {
                return Err(CatalogError::Malformed(format!(
                    "expected an array, got {}",
                    json_kind(&other)
                )))
            }
        };

        let records = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                serde_json::from_value::<RawProduct>(item)
                    .map_err(|e| CatalogError::Malformed(format!("record #{}: {}", i, e)))
            })
            .collect::<CatalogResult<Vec<_>>>()?;

        Self::from_raw(records)
    }

    /// Looks up a product by id.
    pub fn get(&self, id: &ProductId) -> Option<&Product> {
        self.index.get(id).map(|&i| &self.products[i])
    }

    /// All products in backend order.
    pub fn iter(&self) -> impl Iterator<Item = &Product> {
        self.products.iter()
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Distinct category labels in first-seen order.
    pub fn categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for product in &self.products {
            if !seen.iter().any(|c| c.eq_ignore_ascii_case(&product.category)) {
                seen.push(product.category.as_str());
            }
        }
        seen
    }

    /// Products whose category matches `category`, ignoring case.
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Product> {
        let category = category.trim();
        self.products
            .iter()
            .filter(move |p| p.category.eq_ignore_ascii_case(category))
    }

    /// Products whose name contains `query`, ignoring case. An empty query
    /// matches everything.
    pub fn search(&self, query: &str) -> Vec<&Product> {
        let needle = query.trim().to_lowercase();
        self.products
            .iter()
            .filter(|p| needle.is_empty() || p.name.to_lowercase().contains(&needle))
            .collect()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
