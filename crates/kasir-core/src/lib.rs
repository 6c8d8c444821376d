//! # kasir-core: Checkout Logic for Kasir POS
//!
//! The mobile client's screens are thin views over REST calls. The one place
//! with real business rules is the transaction screen: adding products,
//! adjusting quantities, pricing the order and taking payment. That logic
//! lives here, as plain synchronous Rust with no I/O.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Kasir POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │         Mobile screens / kasir-register (excluded glue)         │   │
//! │  │    Product grid ──► Cart ──► Payment modal ──► Receipt          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ plain data                             │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ kasir-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────────────┐  │   │
//! │  │   │ catalog  │ │   cart   │ │  tender  │ │     session      │  │   │
//! │  │   │ RawProd. │►│  Cart    │►│ settle() │►│ CheckoutSession  │  │   │
//! │  │   │ Catalog  │ │ Summary  │ │ change   │ │ Receipt          │  │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   types • money • validation • error                            │   │
//! │  │   NO I/O • NO NETWORK • NO SHARED STATE                         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, CartLine, OrderSummary, TaxRate)
//! - [`money`] - Integer money with half-up tax rounding
//! - [`cart`] - The cart engine
//! - [`catalog`] - Backend record mapping and product lookup
//! - [`tender`] - Payment confirmation and change
//! - [`session`] - Owned checkout session and receipt
//! - [`validation`] - Field rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use kasir_core::{CheckoutSession, Money, Product, Tender, DEFAULT_TAX_RATE};
//!
//! let nasi = Product::new("1", "Nasi Goreng", Money::from_minor(25000), 8, "Makanan")
//!     .unwrap();
//!
//! let mut session = CheckoutSession::new(DEFAULT_TAX_RATE);
//! session.cart_mut().add_product(&nasi);
//! assert_eq!(session.summary().total.minor(), 27500);
//!
//! let receipt = session.checkout(&Tender::cash(Money::from_minor(30000))).unwrap();
//! assert_eq!(receipt.settlement.change.minor(), 2500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod catalog;
pub mod error;
pub mod money;
pub mod session;
pub mod tender;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::Cart;
pub use catalog::{Catalog, RawProduct};
pub use error::{CatalogError, CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use session::{CheckoutRejected, CheckoutSession, Receipt};
pub use tender::{settle, Settlement, Tender};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Tax applied to every order unless the register is configured otherwise.
pub const DEFAULT_TAX_RATE: TaxRate = TaxRate::from_bps(1000);
