//! # Domain Types
//!
//! Value types shared by the cart engine, the catalog and checkout.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    CartLine     │   │  OrderSummary   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │──►│  product_id     │──►│  subtotal       │       │
//! │  │  name           │   │  name (frozen)  │   │  tax            │       │
//! │  │  price          │   │  unit_price     │   │  total          │       │
//! │  │  stock          │   │  quantity ≥ 1   │   └─────────────────┘       │
//! │  │  category       │   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                              │
//! │  │    TaxRate      │   │ PaymentMethod   │                              │
//! │  │  bps (u32)      │   │  Cash           │                              │
//! │  │  1000 = 10%     │   │  NonCash        │                              │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{
    validate_category, validate_price, validate_product_id, validate_product_name, validate_stock,
};

/// Category assigned to products the backend left uncategorized.
pub const DEFAULT_CATEGORY: &str = "Uncategorized";

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so the standard 10% rate is 1000 bps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (`10.0` → 1000 bps).
    ///
    /// Negative or non-finite input yields a zero rate.
    pub fn from_percentage(pct: f64) -> Self {
        if !pct.is_finite() || pct <= 0.0 {
            return TaxRate(0);
        }
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        crate::DEFAULT_TAX_RATE
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}%", self.percentage())
        }
    }
}

// =============================================================================
// Product Identifier
// =============================================================================

/// Opaque product identifier, unique within a catalog.
///
/// The backend sends ids as numbers on some endpoints and strings on others;
/// both normalize to the same decimal text, so `ProductId::from(1)` equals
/// `ProductId::from("1")`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductId(String);

impl ProductId {
    /// Creates an identifier, trimming surrounding whitespace.
    pub fn new(id: impl Into<String>) -> Self {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.len() == id.len() {
            ProductId(id)
        } else {
            ProductId(trimmed.to_string())
        }
    }

    /// Returns the identifier text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProductId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProductId {
    fn from(id: &str) -> Self {
        ProductId::new(id)
    }
}

impl From<String> for ProductId {
    fn from(id: String) -> Self {
        ProductId::new(id)
    }
}

impl From<i64> for ProductId {
    fn from(id: i64) -> Self {
        ProductId(id.to_string())
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        ProductId(id.to_string())
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product available for sale, as supplied by the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Product {
    /// Unique identifier within the catalog.
    pub id: ProductId,

    /// Display name shown to the cashier and on the receipt.
    pub name: String,

    /// Unit price in the smallest currency unit.
    pub price: Money,

    /// Stock on hand. Informational; the cart never decrements it.
    pub stock: i64,

    /// Category label used to group the product grid.
    pub category: String,
}

impl Product {
    /// Creates a validated product.
    ///
    /// An empty category becomes [`DEFAULT_CATEGORY`].
    ///
    /// ```rust
    /// use kasir_core::types::Product;
    /// use kasir_core::money::Money;
    ///
    /// let kopi = Product::new("1", "Kopi Susu", Money::from_minor(25000), 12, "Minuman")
    ///     .unwrap();
    /// assert_eq!(kopi.id.as_str(), "1");
    ///
    /// assert!(Product::new("2", "Es Teh", Money::from_minor(-1), 0, "").is_err());
    /// ```
    pub fn new(
        id: impl Into<ProductId>,
        name: impl Into<String>,
        price: Money,
        stock: i64,
        category: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let id = id.into();
        let name = name.into();
        let category = category.into();

        validate_product_id(id.as_str())?;
        validate_product_name(&name)?;
        validate_price(price.minor())?;
        validate_stock(stock)?;
        validate_category(&category)?;

        let category = match category.trim() {
            "" => DEFAULT_CATEGORY.to_string(),
            trimmed => trimmed.to_string(),
        };

        Ok(Product {
            id,
            name: name.trim().to_string(),
            price,
            stock,
            category,
        })
    }

    /// Checks whether the stock count covers `quantity`.
    ///
    /// Only used for display hints; the cart accepts any quantity.
    pub fn in_stock(&self, quantity: i64) -> bool {
        self.stock >= quantity
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One product's quantity within the current checkout session.
///
/// Name and unit price are frozen when the line is created, so a catalog
/// refresh mid-sale does not reprice lines already rung up.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    pub product_id: ProductId,
    /// Product name at time of adding (frozen).
    pub name: String,
    /// Unit price at time of adding (frozen), never negative.
    pub unit_price: Money,
    /// Always ≥ 1 while the line exists.
    pub quantity: i64,
}

impl CartLine {
    /// Opens a line at quantity 1. A negative price (possible when `Product`
    /// is built as a literal instead of through [`Product::new`]) is clamped
    /// to zero.
    pub(crate) fn from_product(product: &Product) -> Self {
        CartLine {
            product_id: product.id.clone(),
            name: product.name.clone(),
            unit_price: product.price.max(Money::zero()),
            quantity: 1,
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Order Summary
// =============================================================================

/// Derived pricing totals for a cart. Never stored, always recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OrderSummary {
    pub subtotal: Money,
    pub tax: Money,
    /// Always `subtotal + tax`.
    pub total: Money,
    /// Number of distinct lines.
    pub item_count: usize,
    /// Sum of line quantities.
    pub total_quantity: i64,
}

impl OrderSummary {
    /// Builds a summary from a subtotal, deriving tax and total.
    pub fn from_subtotal(
        subtotal: Money,
        rate: TaxRate,
        item_count: usize,
        total_quantity: i64,
    ) -> Self {
        let tax = subtotal.calculate_tax(rate);
        OrderSummary {
            subtotal,
            tax,
            total: subtotal + tax,
            item_count,
            total_quantity,
        }
    }

    /// Checks if there is nothing to pay for.
    pub fn is_empty(&self) -> bool {
        self.item_count == 0
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash; tendered amount and change are recorded.
    Cash,
    /// Card, QR or transfer settled outside the register; always exact.
    NonCash,
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaymentMethod::Cash => write!(f, "cash"),
            PaymentMethod::NonCash => write!(f, "non-cash"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tax_rate_from_bps() {
        let rate = TaxRate::from_bps(1000);
        assert_eq!(rate.bps(), 1000);
        assert!((rate.percentage() - 10.0).abs() < 0.001);
        assert_eq!(rate.to_string(), "10%");
        assert_eq!(TaxRate::from_bps(1150).to_string(), "11.5%");
    }

    #[test]
    fn test_tax_rate_from_percentage() {
        assert_eq!(TaxRate::from_percentage(10.0).bps(), 1000);
        assert_eq!(TaxRate::from_percentage(11.5).bps(), 1150);
        assert_eq!(TaxRate::from_percentage(-3.0).bps(), 0);
        assert_eq!(TaxRate::from_percentage(f64::NAN).bps(), 0);
    }

    #[test]
    fn test_tax_rate_default_is_ten_percent() {
        assert_eq!(TaxRate::default().bps(), 1000);
    }

    #[test]
    fn test_product_id_normalizes_numbers_and_whitespace() {
        assert_eq!(ProductId::from(1i64), ProductId::from("1"));
        assert_eq!(ProductId::from(" 1 "), ProductId::from("1"));
        assert_eq!(ProductId::from(42u64).as_str(), "42");
    }

    #[test]
    fn test_product_new_defaults_category() {
        let product =
            Product::new("9", "  Roti Bakar ", Money::from_minor(18000), 0, "  ").unwrap();
        assert_eq!(product.name, "Roti Bakar");
        assert_eq!(product.category, DEFAULT_CATEGORY);
    }

    #[test]
    fn test_product_new_rejects_invalid_fields() {
        assert!(Product::new("", "Kopi", Money::from_minor(1), 0, "").is_err());
        assert!(Product::new("1", "", Money::from_minor(1), 0, "").is_err());
        assert!(Product::new("1", "Kopi", Money::from_minor(-1), 0, "").is_err());
        assert!(Product::new("1", "Kopi", Money::from_minor(1), -1, "").is_err());
    }

    #[test]
    fn test_product_in_stock() {
        let product = Product::new("1", "Kopi", Money::from_minor(1), 3, "").unwrap();
        assert!(product.in_stock(3));
        assert!(!product.in_stock(4));
    }

    #[test]
    fn test_summary_total_is_subtotal_plus_tax() {
        let summary =
            OrderSummary::from_subtotal(Money::from_minor(55000), TaxRate::from_bps(1000), 2, 3);
        assert_eq!(summary.tax, Money::from_minor(5500));
        assert_eq!(summary.total, Money::from_minor(60500));
        assert_eq!(summary.total, summary.subtotal + summary.tax);
    }

    #[test]
    fn test_payment_method_serialization() {
        assert_eq!(serde_json::to_string(&PaymentMethod::Cash).unwrap(), "\"cash\"");
        assert_eq!(serde_json::to_string(&PaymentMethod::NonCash).unwrap(), "\"non_cash\"");
    }
}
