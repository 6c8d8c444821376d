//! # Checkout Session
//!
//! Owns the cart for one customer from first scan to payment.
//!
//! ## Session Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Lifecycle                                    │
//! │                                                                         │
//! │  ┌──────────┐     ┌──────────┐     ┌──────────┐     ┌──────────┐       │
//! │  │  new()   │────►│ In Cart  │────►│checkout()│────►│ Receipt  │       │
//! │  │ (empty)  │     │          │     │          │     │          │       │
//! │  └──────────┘     └──────────┘     └────┬─────┘     └──────────┘       │
//! │                        │  ▲             │                               │
//! │                   cart_mut()            │ insufficient tender /         │
//! │                   add / qty / rm        │ empty cart                    │
//! │                   reset                 ▼                               │
//! │                        └───────── CheckoutRejected                      │
//! │                                   (session handed back intact)          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `checkout` takes the session by value: once a sale is paid the cart is
//! gone and the caller must open a new session for the next customer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};
use ts_rs::TS;
use uuid::Uuid;

use crate::cart::Cart;
use crate::error::CoreError;
use crate::tender::{settle, Settlement, Tender};
use crate::types::{CartLine, OrderSummary, TaxRate};

// =============================================================================
// Checkout Session
// =============================================================================

/// One customer's checkout, owning its cart.
#[derive(Debug, Clone)]
pub struct CheckoutSession {
    id: Uuid,
    opened_at: DateTime<Utc>,
    cart: Cart,
}

impl CheckoutSession {
    /// Opens a session with an empty cart taxed at `tax_rate`.
    pub fn new(tax_rate: TaxRate) -> Self {
        let session = CheckoutSession {
            id: Uuid::new_v4(),
            opened_at: Utc::now(),
            cart: Cart::with_tax_rate(tax_rate),
        };
        debug!(session_id = %session.id, tax_rate = %tax_rate, "Checkout session opened");
        session
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn cart_mut(&mut self) -> &mut Cart {
        &mut self.cart
    }

    /// Current totals; shorthand for `cart().compute_totals()`.
    pub fn summary(&self) -> OrderSummary {
        self.cart.compute_totals()
    }

    /// Confirms payment and closes the session.
    ///
    /// ## Returns
    /// - `Ok(Receipt)` when the tender covers the total; the session is consumed
    /// - `Err(CheckoutRejected)` on an empty cart or insufficient cash; the
    ///   rejection hands the untouched session back for another attempt
    pub fn checkout(self, tender: &Tender) -> Result<Receipt, CheckoutRejected> {
        if self.cart.is_empty() {
            debug!(session_id = %self.id, "Checkout rejected: empty cart");
            return Err(CheckoutRejected {
                session: self,
                error: CoreError::EmptyCart,
            });
        }

        let summary = self.cart.compute_totals();
        let settlement = match settle(&summary, tender) {
            Ok(settlement) => settlement,
            Err(error) => {
                debug!(session_id = %self.id, %error, "Checkout rejected");
                return Err(CheckoutRejected {
                    session: self,
                    error,
                });
            }
        };

        info!(
            session_id = %self.id,
            method = %settlement.method,
            total = %summary.total,
            change = %settlement.change,
            "Checkout completed"
        );

        Ok(Receipt {
            id: self.id,
            lines: self.cart.lines().to_vec(),
            summary,
            settlement,
            opened_at: self.opened_at,
            completed_at: Utc::now(),
        })
    }
}

impl Default for CheckoutSession {
    fn default() -> Self {
        Self::new(crate::DEFAULT_TAX_RATE)
    }
}

/// A checkout that did not go through, carrying the session back.
#[derive(Debug, Error)]
#[error("Checkout rejected: {error}")]
pub struct CheckoutRejected {
    pub session: CheckoutSession,
    #[source]
    pub error: CoreError,
}

impl CheckoutRejected {
    /// Splits into the session (to retry) and the reason.
    pub fn into_parts(self) -> (CheckoutSession, CoreError) {
        (self.session, self.error)
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// Immutable record of a paid checkout, ready to be posted to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// Same id as the session that produced it.
    #[ts(as = "String")]
    pub id: Uuid,
    pub lines: Vec<CartLine>,
    pub summary: OrderSummary,
    pub settlement: Settlement,
    #[ts(as = "String")]
    pub opened_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub completed_at: DateTime<Utc>,
}

impl Receipt {
    /// Serializes the receipt as JSON for the transaction endpoint.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
