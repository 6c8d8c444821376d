//! # Cart Engine
//!
//! Tracks selected products and quantities for one checkout session and
//! derives priced totals.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Cashier Action           Operation                 Cart Change         │
//! │  ──────────────           ─────────                 ───────────         │
//! │                                                                         │
//! │  Tap product ───────────► add_product() ──────────► qty + 1 or new line │
//! │                                                                         │
//! │  Tap + / − ─────────────► change_quantity() ──────► qty + delta, ≥ 0    │
//! │                                                     (0 removes line)    │
//! │                                                                         │
//! │  Swipe to remove ───────► remove_product() ───────► line removed        │
//! │                                                                         │
//! │  Cancel sale ───────────► reset() ────────────────► all lines cleared   │
//! │                                                                         │
//! │  Any time ──────────────► compute_totals() ───────► (read only)         │
//! │                                                                         │
//! │  NOTE: No operation fails. Unknown ids are no-ops, quantities clamp.   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust
//! use kasir_core::cart::Cart;
//! use kasir_core::money::Money;
//! use kasir_core::types::Product;
//!
//! let kopi = Product::new("1", "Kopi", Money::from_minor(25000), 10, "Minuman").unwrap();
//! let teh = Product::new("2", "Teh", Money::from_minor(15000), 10, "Minuman").unwrap();
//!
//! let mut cart = Cart::new();
//! cart.add_product(&kopi);
//! cart.add_product(&teh);
//! cart.add_product(&teh);
//!
//! let totals = cart.compute_totals();
//! assert_eq!(totals.subtotal.minor(), 55000);
//! assert_eq!(totals.tax.minor(), 5500);
//! assert_eq!(totals.total.minor(), 60500);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{CartLine, OrderSummary, Product, ProductId, TaxRate};
use crate::validation::{validate_price, validate_tax_rate_bps};

/// The shopping cart for one checkout session.
///
/// ## Invariants
/// - Lines are unique by `product_id` (adding the same product bumps quantity)
/// - Every line has quantity ≥ 1; reaching 0 removes the line
/// - Lines keep insertion order
/// - Totals are recomputed from the lines on every call, never cached
///
/// Deserializing re-checks these invariants, so a stored cart that breaks
/// them is rejected instead of loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CartRecord")]
pub struct Cart {
    lines: Vec<CartLine>,
    tax_rate: TaxRate,
}

impl Cart {
    /// Creates an empty cart taxed at [`crate::DEFAULT_TAX_RATE`].
    pub fn new() -> Self {
        Cart::with_tax_rate(crate::DEFAULT_TAX_RATE)
    }

    /// Creates an empty cart taxed at `tax_rate`.
    pub fn with_tax_rate(tax_rate: TaxRate) -> Self {
        Cart {
            lines: Vec::new(),
            tax_rate,
        }
    }

    /// Adds one unit of `product`.
    ///
    /// ## Behavior
    /// - Product already in cart: quantity + 1, frozen name and price kept
    /// - Product not in cart: new line with quantity 1, appended at the end
    pub fn add_product(&mut self, product: &Product) {
        match self.position(&product.id) {
            Some(idx) => {
                let line = &mut self.lines[idx];
                line.quantity = line.quantity.saturating_add(1);
            }
            None => self.lines.push(CartLine::from_product(product)),
        }
    }

    /// Adds `delta` to the quantity of the line for `product_id`.
    ///
    /// ## Behavior
    /// - Result clamps at 0; a line that reaches 0 is removed
    /// - No line for `product_id`: no-op
    /// - `delta == 0`: no-op
    pub fn change_quantity(&mut self, product_id: &ProductId, delta: i64) {
        let Some(idx) = self.position(product_id) else {
            return;
        };

        let quantity = self.lines[idx].quantity.saturating_add(delta).max(0);
        if quantity == 0 {
            self.lines.remove(idx);
        } else {
            self.lines[idx].quantity = quantity;
        }
    }

    /// Removes the line for `product_id` if there is one.
    pub fn remove_product(&mut self, product_id: &ProductId) {
        self.lines.retain(|line| &line.product_id != product_id);
    }

    /// Computes subtotal, tax and total from the current lines.
    ///
    /// ```text
    /// subtotal = Σ unit_price × quantity
    /// tax      = round_half_up(subtotal × rate)
    /// total    = subtotal + tax
    /// ```
    pub fn compute_totals(&self) -> OrderSummary {
        let subtotal: Money = self.lines.iter().map(CartLine::line_total).sum();
        OrderSummary::from_subtotal(
            subtotal,
            self.tax_rate,
            self.lines.len(),
            self.total_quantity(),
        )
    }

    /// Clears all lines. Calling it on an empty cart does nothing.
    pub fn reset(&mut self) {
        self.lines.clear();
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line for `product_id`, if present.
    pub fn line(&self, product_id: &ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| &line.product_id == product_id)
    }

    /// Quantity of `product_id` in the cart, 0 when absent.
    pub fn quantity_of(&self, product_id: &ProductId) -> i64 {
        self.line(product_id).map_or(0, |line| line.quantity)
    }

    /// Sum of all line quantities.
    pub fn total_quantity(&self) -> i64 {
        self.lines
            .iter()
            .fold(0i64, |acc, line| acc.saturating_add(line.quantity))
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| &line.product_id == product_id)
    }
}

impl Default for Cart {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialized shape of a [`Cart`], checked before it becomes one.
#[derive(Deserialize)]
struct CartRecord {
    lines: Vec<CartLine>,
    tax_rate: TaxRate,
}

impl TryFrom<CartRecord> for Cart {
    type Error = ValidationError;

    fn try_from(record: CartRecord) -> Result<Self, Self::Error> {
        validate_tax_rate_bps(record.tax_rate.bps())?;

        for (i, line) in record.lines.iter().enumerate() {
            if line.quantity < 1 {
                return Err(ValidationError::OutOfRange {
                    field: "quantity".to_string(),
                    min: 1,
                    max: i64::MAX,
                });
            }
            validate_price(line.unit_price.minor())?;
            if record.lines[..i]
                .iter()
                .any(|earlier| earlier.product_id == line.product_id)
            {
                return Err(ValidationError::InvalidFormat {
                    field: "lines".to_string(),
                    reason: format!("product '{}' appears more than once", line.product_id),
                });
            }
        }

        Ok(Cart {
            lines: record.lines,
            tax_rate: record.tax_rate,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_product(id: i64, price: i64) -> Product {
        Product::new(
            id,
            format!("Product {}", id),
            Money::from_minor(price),
            5,
            "Test",
        )
        .unwrap()
    }

    fn id(id: i64) -> ProductId {
        ProductId::from(id)
    }

    #[test]
    fn test_add_same_product_counts_calls() {
        let mut cart = Cart::new();
        let product = test_product(1, 999);

        for expected in 1..=7 {
            cart.add_product(&product);
            assert_eq!(cart.quantity_of(&id(1)), expected);
        }
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_scenario_two_products() {
        let mut cart = Cart::new();
        cart.add_product(&test_product(1, 25000));
        cart.add_product(&test_product(2, 15000));
        cart.add_product(&test_product(2, 15000));

        let totals = cart.compute_totals();
        assert_eq!(totals.subtotal, Money::from_minor(55000));
        assert_eq!(totals.tax, Money::from_minor(5500));
        assert_eq!(totals.total, Money::from_minor(60500));
        assert_eq!(totals.item_count, 2);
        assert_eq!(totals.total_quantity, 3);
    }

    #[test]
    fn test_scenario_decrement_twice() {
        let mut cart = Cart::new();
        let product = test_product(1, 10000);
        for _ in 0..3 {
            cart.add_product(&product);
        }

        cart.change_quantity(&id(1), -1);
        cart.change_quantity(&id(1), -1);

        assert_eq!(cart.quantity_of(&id(1)), 1);
        assert_eq!(cart.compute_totals().subtotal, Money::from_minor(10000));
    }

    #[test]
    fn test_change_quantity_to_zero_removes_line() {
        let mut cart = Cart::new();
        cart.add_product(&test_product(1, 10000));
        cart.add_product(&test_product(1, 10000));
        cart.add_product(&test_product(2, 3000));

        let quantity = cart.quantity_of(&id(1));
        cart.change_quantity(&id(1), -quantity);

        assert!(cart.line(&id(1)).is_none());
        assert_eq!(cart.compute_totals().subtotal, Money::from_minor(3000));
    }

    #[test]
    fn test_change_quantity_clamps_below_zero() {
        let mut cart = Cart::new();
        cart.add_product(&test_product(1, 10000));

        cart.change_quantity(&id(1), -50);
        assert!(cart.is_empty());

        cart.add_product(&test_product(2, 10000));
        cart.change_quantity(&id(2), i64::MIN);
        assert!(cart.is_empty());
    }

    #[test]
    fn test_change_quantity_increments() {
        let mut cart = Cart::new();
        cart.add_product(&test_product(1, 500));
        cart.change_quantity(&id(1), 4);
        assert_eq!(cart.quantity_of(&id(1)), 5);

        cart.change_quantity(&id(1), 0);
        assert_eq!(cart.quantity_of(&id(1)), 5);

        cart.change_quantity(&id(1), i64::MAX);
        assert_eq!(cart.quantity_of(&id(1)), i64::MAX);
    }

    #[test]
    fn test_change_quantity_unknown_id_is_noop() {
        let mut cart = Cart::new();
        cart.add_product(&test_product(1, 500));
        let before = cart.clone();

        cart.change_quantity(&id(99), 3);
        cart.change_quantity(&id(99), -3);

        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_unknown_id_leaves_cart_unchanged() {
        let mut cart = Cart::new();
        cart.add_product(&test_product(1, 500));
        let before = cart.clone();

        cart.remove_product(&id(42));

        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_product() {
        let mut cart = Cart::new();
        cart.add_product(&test_product(1, 500));
        cart.add_product(&test_product(2, 700));
        cart.add_product(&test_product(2, 700));

        cart.remove_product(&id(2));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.compute_totals().subtotal, Money::from_minor(500));
    }

    #[test]
    fn test_reset_yields_zero_totals() {
        let mut cart = Cart::new();
        cart.add_product(&test_product(1, 25000));
        cart.add_product(&test_product(2, 15000));

        cart.reset();
        let totals = cart.compute_totals();
        assert_eq!(totals.subtotal, Money::zero());
        assert_eq!(totals.tax, Money::zero());
        assert_eq!(totals.total, Money::zero());

        cart.reset();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_lines_keep_insertion_order() {
        let mut cart = Cart::new();
        cart.add_product(&test_product(3, 100));
        cart.add_product(&test_product(1, 100));
        cart.add_product(&test_product(2, 100));
        cart.add_product(&test_product(3, 100));
        cart.change_quantity(&id(1), 2);

        let order: Vec<&str> = cart.lines().iter().map(|l| l.product_id.as_str()).collect();
        assert_eq!(order, vec!["3", "1", "2"]);
    }

    #[test]
    fn test_price_frozen_at_first_add() {
        let mut cart = Cart::new();
        cart.add_product(&test_product(1, 10000));
        cart.add_product(&test_product(1, 12000));

        let line = cart.line(&id(1)).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.unit_price, Money::from_minor(10000));
        assert_eq!(cart.compute_totals().subtotal, Money::from_minor(20000));
    }

    #[test]
    fn test_total_is_always_subtotal_plus_tax() {
        let mut cart = Cart::new();
        let prices = [1, 5, 14, 15, 999, 25000, 33333];
        for (i, price) in prices.iter().enumerate() {
            cart.add_product(&test_product(i as i64, *price));
            let totals = cart.compute_totals();
            assert_eq!(totals.total, totals.subtotal + totals.tax);
        }
        cart.change_quantity(&id(2), 9);
        let totals = cart.compute_totals();
        assert_eq!(totals.total, totals.subtotal + totals.tax);
    }

    #[test]
    fn test_tax_rounding_half_up() {
        let mut cart = Cart::new();
        cart.add_product(&test_product(1, 5));
        assert_eq!(cart.compute_totals().tax, Money::from_minor(1));

        cart.reset();
        cart.add_product(&test_product(1, 4));
        assert_eq!(cart.compute_totals().tax, Money::zero());
    }

    #[test]
    fn test_custom_tax_rate() {
        let mut cart = Cart::with_tax_rate(TaxRate::from_bps(1100));
        cart.add_product(&test_product(1, 10000));

        let totals = cart.compute_totals();
        assert_eq!(totals.tax, Money::from_minor(1100));
        assert_eq!(totals.total, Money::from_minor(11100));
    }

    #[test]
    fn test_negative_price_literal_is_clamped() {
        let broken = Product {
            id: id(1),
            name: "Salah Harga".to_string(),
            price: Money::from_minor(-10000),
            stock: 1,
            category: "Test".to_string(),
        };
        let mut cart = Cart::new();
        cart.add_product(&broken);
        cart.add_product(&test_product(2, 5000));

        assert_eq!(cart.line(&id(1)).unwrap().unit_price, Money::zero());
        let totals = cart.compute_totals();
        assert_eq!(totals.subtotal, Money::from_minor(5000));
        assert_eq!(totals.tax, Money::from_minor(500));
        assert_eq!(totals.total, Money::from_minor(5500));
    }

    #[test]
    fn test_deserialize_keeps_valid_cart() {
        let mut cart = Cart::with_tax_rate(TaxRate::from_bps(1100));
        cart.add_product(&test_product(1, 2500));
        cart.add_product(&test_product(1, 2500));

        let json = serde_json::to_string(&cart).unwrap();
        let restored: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, cart);
    }

    #[test]
    fn test_deserialize_rejects_broken_lines() {
        let line = |quantity: i64, price: i64| {
            serde_json::json!({
                "product_id": "1",
                "name": "Kopi",
                "unit_price": price,
                "quantity": quantity
            })
        };
        let cart_json = |lines: Vec<serde_json::Value>| {
            serde_json::json!({ "lines": lines, "tax_rate": 1000 })
        };

        let zero_quantity = cart_json(vec![line(0, 100)]);
        assert!(serde_json::from_value::<Cart>(zero_quantity).is_err());

        let negative_quantity = cart_json(vec![line(-3, 100)]);
        assert!(serde_json::from_value::<Cart>(negative_quantity).is_err());

        let duplicate = cart_json(vec![line(1, 100), line(2, 100)]);
        let err = serde_json::from_value::<Cart>(duplicate).unwrap_err();
        assert!(err.to_string().contains("appears more than once"));

        let negative_price = cart_json(vec![line(1, -100)]);
        assert!(serde_json::from_value::<Cart>(negative_price).is_err());

        let bad_rate = serde_json::json!({ "lines": [], "tax_rate": 20000 });
        assert!(serde_json::from_value::<Cart>(bad_rate).is_err());
    }

    #[test]
    fn test_compute_totals_is_pure() {
        let mut cart = Cart::new();
        cart.add_product(&test_product(1, 2500));
        let before = cart.clone();

        let first = cart.compute_totals();
        let second = cart.compute_totals();

        assert_eq!(first, second);
        assert_eq!(cart, before);
    }
}
