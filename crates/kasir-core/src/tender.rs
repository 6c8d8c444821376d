//! # Tender
//!
//! Payment confirmation: checks what the customer hands over against the
//! order total and works out change.
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Payment modal                                                          │
//! │                                                                         │
//! │  TOTAL                                            60500                 │
//! │                                                                         │
//! │  [ Cash ]  tendered: 100000  ──► settle() ──► change 39500              │
//! │  [ Cash ]  tendered:  50000  ──► settle() ──► InsufficientTender        │
//! │  [ Card/QR ]                 ──► settle() ──► exact, change 0           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{OrderSummary, PaymentMethod};

/// What the customer offers at the payment step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Tender {
    pub method: PaymentMethod,
    /// Cash handed over. `None` for non-cash payments.
    pub tendered: Option<Money>,
}

impl Tender {
    /// Cash payment of `amount`.
    pub fn cash(amount: Money) -> Self {
        Tender {
            method: PaymentMethod::Cash,
            tendered: Some(amount),
        }
    }

    /// Card, QR or transfer payment; always covers the total exactly.
    pub fn non_cash() -> Self {
        Tender {
            method: PaymentMethod::NonCash,
            tendered: None,
        }
    }
}

/// Outcome of a confirmed payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Settlement {
    pub method: PaymentMethod,
    /// The order total.
    pub amount_due: Money,
    /// What the customer handed over (equals `amount_due` for non-cash).
    pub tendered: Money,
    /// `tendered - amount_due`, never negative.
    pub change: Money,
}

/// Confirms payment of `summary` with `tender`.
///
/// ## Rules
/// - Cash: tendered must be ≥ total, change = tendered − total
/// - Non-cash: paid amount is the total, change is 0
///
/// ```rust
/// use kasir_core::money::Money;
/// use kasir_core::tender::{settle, Tender};
/// use kasir_core::types::{OrderSummary, TaxRate};
///
/// let rate = TaxRate::from_bps(1000);
/// let summary = OrderSummary::from_subtotal(Money::from_minor(55000), rate, 2, 3);
/// let settlement = settle(&summary, &Tender::cash(Money::from_minor(100000))).unwrap();
/// assert_eq!(settlement.change.minor(), 39500);
///
/// assert!(settle(&summary, &Tender::cash(Money::from_minor(60000))).is_err());
/// ```
pub fn settle(summary: &OrderSummary, tender: &Tender) -> CoreResult<Settlement> {
    let due = summary.total;

    match (tender.method, tender.tendered) {
        (PaymentMethod::Cash, tendered) => {
            let tendered = tendered.unwrap_or_else(Money::zero);
            let change = tendered
                .checked_change(due)
                .ok_or(CoreError::InsufficientTender {
                    total: due,
                    tendered,
                })?;
            Ok(Settlement {
                method: PaymentMethod::Cash,
                amount_due: due,
                tendered,
                change,
            })
        }
        (PaymentMethod::NonCash, _) => Ok(Settlement {
            method: PaymentMethod::NonCash,
            amount_due: due,
            tendered: due,
            change: Money::zero(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TaxRate;

    fn summary(subtotal: i64) -> OrderSummary {
        OrderSummary::from_subtotal(Money::from_minor(subtotal), TaxRate::from_bps(1000), 1, 1)
    }

    #[test]
    fn test_cash_with_change() {
        let settlement = settle(&summary(55000), &Tender::cash(Money::from_minor(100000))).unwrap();
        assert_eq!(settlement.amount_due, Money::from_minor(60500));
        assert_eq!(settlement.tendered, Money::from_minor(100000));
        assert_eq!(settlement.change, Money::from_minor(39500));
    }

    #[test]
    fn test_cash_exact_amount_gives_zero_change() {
        let settlement = settle(&summary(55000), &Tender::cash(Money::from_minor(60500))).unwrap();
        assert!(settlement.change.is_zero());
    }

    #[test]
    fn test_cash_insufficient() {
        let err = settle(&summary(55000), &Tender::cash(Money::from_minor(60499))).unwrap_err();
        match err {
            CoreError::InsufficientTender { total, tendered } => {
                assert_eq!(total, Money::from_minor(60500));
                assert_eq!(tendered, Money::from_minor(60499));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_cash_without_amount_counts_as_zero() {
        let tender = Tender {
            method: PaymentMethod::Cash,
            tendered: None,
        };
        assert!(settle(&summary(1000), &tender).is_err());
        assert!(settle(&OrderSummary::default(), &tender).is_ok());
    }

    #[test]
    fn test_non_cash_is_exact() {
        let settlement = settle(&summary(55000), &Tender::non_cash()).unwrap();
        assert_eq!(settlement.method, PaymentMethod::NonCash);
        assert_eq!(settlement.tendered, settlement.amount_due);
        assert!(settlement.change.is_zero());
    }
}
