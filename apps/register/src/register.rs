//! # Register
//!
//! Owns the catalog and the open checkout session, and turns each
//! [`Command`] into calls on `kasir-core`.
//!
//! ## User Workflow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Cashier types                  Register does                           │
//! │  ─────────────                  ─────────────                           │
//! │  add 1                ────►     open session if none                   │
//! │                                 catalog.get(1) ─► cart.add_product     │
//! │  qty 2 -1             ────►     cart.change_quantity(2, -1)            │
//! │  cart                 ────►     cart.compute_totals() ─► print         │
//! │  pay cash 100000      ────►     session.checkout(Tender::cash)         │
//! │                                   ├─ Ok: print receipt, session closed │
//! │                                   └─ Err: keep session, print reason   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A session opens with the first product added for a customer and closes
//! when that customer pays. Output goes to any `Write` so the loop can be
//! driven from tests.

use kasir_core::{
    Cart, Catalog, CheckoutSession, Money, OrderSummary, Product, ProductId, Receipt, TaxRate,
    Tender,
};
use std::io::{BufRead, Write};
use tracing::{debug, info};

use crate::command::{Command, HELP};
use crate::config::RegisterConfig;
use crate::error::{RegisterError, RegisterResult};

/// Whether the command loop keeps reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// A register terminal serving one customer at a time.
#[derive(Debug)]
pub struct Register {
    config: RegisterConfig,
    catalog: Catalog,
    /// `None` between customers.
    session: Option<CheckoutSession>,
}

impl Register {
    pub fn new(config: RegisterConfig, catalog: Catalog) -> Self {
        Register {
            config,
            catalog,
            session: None,
        }
    }

    pub fn config(&self) -> &RegisterConfig {
        &self.config
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The current customer's session, if one is open.
    pub fn session(&self) -> Option<&CheckoutSession> {
        self.session.as_ref()
    }

    /// The current cart, if a session is open.
    pub fn cart(&self) -> Option<&Cart> {
        self.session.as_ref().map(CheckoutSession::cart)
    }

    // =========================================================================
    // Command Loop
    // =========================================================================

    /// Reads commands from `input` until `quit` or end of input.
    ///
    /// Input mistakes and rejected payments are printed and the loop goes on;
    /// I/O failures stop it.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> RegisterResult<()> {
        writeln!(
            out,
            "{} | {} products | tax {} | type 'help' for commands",
            self.config.store_name,
            self.catalog.len(),
            self.config.tax_rate()
        )?;

        for line in input.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }

            let result = line
                .parse::<Command>()
                .and_then(|command| self.execute(command, out));

            match result {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) if !e.is_fatal() => writeln!(out, "error: {}", e)?,
                Err(e) => return Err(e),
            }
        }

        out.flush()?;
        Ok(())
    }

    /// Executes one command, writing its output to `out`.
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> RegisterResult<Flow> {
        match command {
            Command::List { category } => self.list(category.as_deref(), out)?,
            Command::Search { query } => {
                let found = self.catalog.search(&query);
                if found.is_empty() {
                    writeln!(out, "No products match '{}'", query)?;
                }
                for product in found {
                    self.write_product(product, out)?;
                }
            }
            Command::Add { id } => self.add(&id, out)?,
            Command::ChangeQuantity { id, delta } => self.change_quantity(&id, delta, out)?,
            Command::Remove { id } => match self.session.as_mut() {
                Some(session) if session.cart().line(&id).is_some() => {
                    session.cart_mut().remove_product(&id);
                    debug!(product_id = %id, "Removed from cart");
                    writeln!(out, "Removed {}", id)?;
                }
                _ => writeln!(out, "{} is not in the cart", id)?,
            },
            Command::ShowCart => self.write_cart(out)?,
            Command::PayCash { amount } => {
                let amount = self.config.parse_amount(&amount)?;
                self.checkout(Tender::cash(amount), out)?
            }
            Command::PayCard => self.checkout(Tender::non_cash(), out)?,
            Command::Reset => {
                if let Some(session) = self.session.as_mut() {
                    session.cart_mut().reset();
                    debug!(session_id = %session.id(), "Cart reset");
                }
                writeln!(out, "Cart cleared")?;
            }
            Command::Help => writeln!(out, "{}", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    // =========================================================================
    // Command Handlers
    // =========================================================================

    fn list<W: Write>(&self, category: Option<&str>, out: &mut W) -> RegisterResult<()> {
        let products: Vec<&Product> = match category {
            Some(category) => self.catalog.in_category(category).collect(),
            None => self.catalog.iter().collect(),
        };

        if products.is_empty() {
            match category {
                Some(category) => writeln!(
                    out,
                    "No products in '{}'. Categories: {}",
                    category,
                    self.catalog.categories().join(", ")
                )?,
                None => writeln!(out, "Catalog is empty")?,
            }
        }

        for product in products {
            self.write_product(product, out)?;
        }
        Ok(())
    }

    fn add<W: Write>(&mut self, id: &ProductId, out: &mut W) -> RegisterResult<()> {
        let product = self
            .catalog
            .get(id)
            .ok_or_else(|| RegisterError::NotFound(id.to_string()))?;

        let tax_rate = self.config.tax_rate();
        let cart = open_session(&mut self.session, tax_rate).cart_mut();
        cart.add_product(product);
        let quantity = cart.quantity_of(id);
        debug!(product_id = %id, quantity, "Added to cart");

        write!(out, "+ {} x{}", product.name, quantity)?;
        if !product.in_stock(quantity) {
            write!(out, " (only {} in stock)", product.stock)?;
        }
        writeln!(out)?;
        Ok(())
    }

    fn change_quantity<W: Write>(
        &mut self,
        id: &ProductId,
        delta: i64,
        out: &mut W,
    ) -> RegisterResult<()> {
        let Some(session) = self.session.as_mut().filter(|s| s.cart().line(id).is_some()) else {
            writeln!(out, "{} is not in the cart", id)?;
            return Ok(());
        };

        let cart = session.cart_mut();
        cart.change_quantity(id, delta);
        let quantity = cart.quantity_of(id);
        debug!(product_id = %id, delta, quantity, "Quantity changed");

        if quantity == 0 {
            writeln!(out, "Removed {}", id)?;
        } else {
            writeln!(out, "{} x{}", id, quantity)?;
        }
        Ok(())
    }

    /// Hands the open session to `checkout`. On success the session is closed;
    /// on rejection it is put back untouched.
    fn checkout<W: Write>(&mut self, tender: Tender, out: &mut W) -> RegisterResult<()> {
        let Some(session) = self.session.take() else {
            return Err(kasir_core::CoreError::EmptyCart.into());
        };

        match session.checkout(&tender) {
            Ok(receipt) => {
                let json = receipt.to_json()?;
                debug!(receipt = %json, "Receipt ready for upload");
                self.write_receipt(&receipt, out)
            }
            Err(rejected) => {
                let (session, error) = rejected.into_parts();
                self.session = Some(session);
                Err(error.into())
            }
        }
    }

    // =========================================================================
    // Output
    // =========================================================================

    fn money(&self, amount: Money) -> String {
        self.config.format_currency(amount)
    }

    fn write_product<W: Write>(&self, product: &Product, out: &mut W) -> RegisterResult<()> {
        writeln!(
            out,
            "{:>6}  {:<28} {:>14}  stock {:<5} [{}]",
            product.id,
            product.name,
            self.money(product.price),
            product.stock,
            product.category
        )?;
        Ok(())
    }

    fn write_cart<W: Write>(&self, out: &mut W) -> RegisterResult<()> {
        let Some(cart) = self.cart().filter(|cart| !cart.is_empty()) else {
            writeln!(out, "Cart is empty")?;
            return Ok(());
        };

        for line in cart.lines() {
            writeln!(
                out,
                "{:>6}  {:<28} x{:<4} {:>14}",
                line.product_id,
                line.name,
                line.quantity,
                self.money(line.line_total())
            )?;
        }
        self.write_totals(&cart.compute_totals(), cart.tax_rate(), out)
    }

    fn write_totals<W: Write>(
        &self,
        summary: &OrderSummary,
        tax_rate: TaxRate,
        out: &mut W,
    ) -> RegisterResult<()> {
        writeln!(out, "{:<16} {:>14}", "Subtotal", self.money(summary.subtotal))?;
        writeln!(
            out,
            "{:<16} {:>14}",
            format!("Tax ({})", tax_rate),
            self.money(summary.tax)
        )?;
        writeln!(out, "{:<16} {:>14}", "TOTAL", self.money(summary.total))?;
        Ok(())
    }

    fn write_receipt<W: Write>(&self, receipt: &Receipt, out: &mut W) -> RegisterResult<()> {
        writeln!(out, "==== {} ====", self.config.store_name)?;
        writeln!(out, "Receipt {}", receipt.id)?;
        writeln!(out, "{}", receipt.completed_at.format("%Y-%m-%d %H:%M:%S UTC"))?;
        for line in &receipt.lines {
            writeln!(
                out,
                "{:<28} {:>4} x {:>12} {:>14}",
                line.name,
                line.quantity,
                self.money(line.unit_price),
                self.money(line.line_total())
            )?;
        }

        let summary = &receipt.summary;
        let settlement = &receipt.settlement;
        writeln!(out, "{:<16} {:>14}", "Subtotal", self.money(summary.subtotal))?;
        writeln!(out, "{:<16} {:>14}", "Tax", self.money(summary.tax))?;
        writeln!(out, "{:<16} {:>14}", "TOTAL", self.money(summary.total))?;
        writeln!(
            out,
            "{:<16} {:>14}",
            format!("Paid ({})", settlement.method),
            self.money(settlement.tendered)
        )?;
        writeln!(out, "{:<16} {:>14}", "Change", self.money(settlement.change))?;

        info!(receipt_id = %receipt.id, "Receipt printed");
        Ok(())
    }
}

fn open_session(slot: &mut Option<CheckoutSession>, tax_rate: TaxRate) -> &mut CheckoutSession {
    slot.get_or_insert_with(|| CheckoutSession::new(tax_rate))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const CATALOG: &str = r#"{
        "data": [
            { "id": 1, "name": "Nasi Goreng", "price": 25000, "stock": 8, "category": "Makanan" },
            { "id": 2, "name": "Es Teh Manis", "price": "15000", "stock": 1, "category": "Minuman" },
            { "id": 3, "name": "Kopi Susu", "price": 10000, "stock": 20, "category": "Minuman" }
        ]
    }"#;

    fn test_register() -> Register {
        let catalog = Catalog::from_json_str(CATALOG).unwrap();
        Register::new(RegisterConfig::default(), catalog)
    }

    fn run_script(register: &mut Register, script: &str) -> String {
        let mut out = Vec::new();
        register.run(Cursor::new(script), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn open(register: &Register) -> &CheckoutSession {
        register.session().unwrap()
    }

    fn exec(register: &mut Register, line: &str) -> RegisterResult<String> {
        let mut out = Vec::new();
        register.execute(line.parse()?, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_cart_totals_through_commands() {
        let mut register = test_register();
        let output = run_script(&mut register, "add 1\nadd 2\nadd 2\ncart\n");

        assert!(output.contains("Rp55.000"));
        assert!(output.contains("Tax (10%)"));
        assert!(output.contains("Rp5.500"));
        assert!(output.contains("Rp60.500"));
        assert_eq!(open(&register).summary().total, Money::from_minor(60500));
    }

    #[test]
    fn test_unknown_product_is_reported_and_loop_continues() {
        let mut register = test_register();
        let output = run_script(&mut register, "add 99\nadd 1\n");

        assert!(output.contains("error: Product not found: 99"));
        assert_eq!(open(&register).cart().len(), 1);
    }

    #[test]
    fn test_stock_hint() {
        let mut register = test_register();
        exec(&mut register, "add 2").unwrap();
        let output = exec(&mut register, "add 2").unwrap();
        assert!(output.contains("x2 (only 1 in stock)"));
    }

    #[test]
    fn test_quantity_commands() {
        let mut register = test_register();
        for _ in 0..3 {
            exec(&mut register, "add 3").unwrap();
        }
        exec(&mut register, "dec 3").unwrap();
        assert_eq!(exec(&mut register, "qty 3 -1").unwrap(), "3 x1\n");
        assert_eq!(open(&register).summary().subtotal, Money::from_minor(10000));

        assert_eq!(exec(&mut register, "qty 3 -5").unwrap(), "Removed 3\n");
        assert!(open(&register).cart().is_empty());

        assert_eq!(exec(&mut register, "inc 3").unwrap(), "3 is not in the cart\n");
        assert!(open(&register).cart().is_empty());
    }

    #[test]
    fn test_commands_before_first_scan() {
        let mut register = test_register();
        assert_eq!(exec(&mut register, "inc 1").unwrap(), "1 is not in the cart\n");
        assert_eq!(exec(&mut register, "rm 1").unwrap(), "1 is not in the cart\n");
        assert_eq!(exec(&mut register, "reset").unwrap(), "Cart cleared\n");
        assert_eq!(exec(&mut register, "cart").unwrap(), "Cart is empty\n");
        assert!(register.session().is_none());
    }

    #[test]
    fn test_remove_and_reset() {
        let mut register = test_register();
        exec(&mut register, "add 1").unwrap();
        exec(&mut register, "add 3").unwrap();

        assert_eq!(exec(&mut register, "rm 1").unwrap(), "Removed 1\n");
        assert_eq!(exec(&mut register, "rm 1").unwrap(), "1 is not in the cart\n");

        exec(&mut register, "reset").unwrap();
        assert_eq!(open(&register).summary(), OrderSummary::default());
        assert_eq!(exec(&mut register, "cart").unwrap(), "Cart is empty\n");
    }

    #[test]
    fn test_cash_checkout_closes_session() {
        let mut register = test_register();
        exec(&mut register, "add 1").unwrap();
        exec(&mut register, "add 2").unwrap();
        exec(&mut register, "add 2").unwrap();
        let first_session = open(&register).id();

        let output = exec(&mut register, "pay cash 100.000").unwrap();
        assert!(output.contains("Paid (cash)"));
        assert!(output.contains("Rp39.500"));
        assert!(register.session().is_none());

        exec(&mut register, "add 3").unwrap();
        assert_ne!(open(&register).id(), first_session);
        assert_eq!(open(&register).cart().len(), 1);
    }

    #[test]
    fn test_insufficient_cash_keeps_session() {
        let mut register = test_register();
        exec(&mut register, "add 1").unwrap();
        let session_id = open(&register).id();

        let err = exec(&mut register, "pay cash 20000").unwrap_err();
        assert!(matches!(err, RegisterError::Core(_)));
        assert!(!err.is_fatal());

        assert_eq!(open(&register).id(), session_id);
        assert_eq!(open(&register).cart().len(), 1);

        let output = exec(&mut register, "pay card").unwrap();
        assert!(output.contains("Change"));
        assert!(register.session().is_none());
    }

    #[test]
    fn test_rejected_payment_opens_no_session() {
        let mut register = test_register();
        let output = run_script(&mut register, "pay card\npay cash 5000\n");
        assert_eq!(output.matches("error: Cannot check out an empty cart").count(), 2);
        assert!(register.session().is_none());

        exec(&mut register, "add 1").unwrap();
        exec(&mut register, "rm 1").unwrap();
        let session_id = open(&register).id();
        assert!(exec(&mut register, "pay card").is_err());
        assert_eq!(open(&register).id(), session_id);
    }

    #[test]
    fn test_cash_amount_uses_currency_decimals() {
        let config = RegisterConfig {
            currency_symbol: "$".to_string(),
            currency_decimals: 2,
            tax_rate_bps: 0,
            ..RegisterConfig::default()
        };
        let catalog = Catalog::from_json_str(r#"[{ "id": 1, "name": "Soda", "price": 1250 }]"#)
            .unwrap();
        let mut register = Register::new(config, catalog);
        exec(&mut register, "add 1").unwrap();

        assert!(matches!(
            exec(&mut register, "pay cash 12.5"),
            Err(RegisterError::Command(_))
        ));
        assert_eq!(open(&register).cart().len(), 1);

        let output = exec(&mut register, "pay cash 20,00").unwrap();
        assert!(output.contains("$7,50"));
    }

    #[test]
    fn test_list_and_search() {
        let mut register = test_register();

        let output = exec(&mut register, "list minuman").unwrap();
        assert!(output.contains("Es Teh Manis"));
        assert!(output.contains("Kopi Susu"));
        assert!(!output.contains("Nasi Goreng"));

        let output = exec(&mut register, "list Snack").unwrap();
        assert!(output.contains("Categories: Makanan, Minuman"));

        let output = exec(&mut register, "search kopi").unwrap();
        assert_eq!(output.lines().count(), 1);

        let output = exec(&mut register, "search pizza").unwrap();
        assert_eq!(output, "No products match 'pizza'\n");
    }

    #[test]
    fn test_quit_stops_reading() {
        let mut register = test_register();
        run_script(&mut register, "add 1\nquit\nadd 1\n");
        assert_eq!(open(&register).cart().quantity_of(&ProductId::from(1i64)), 1);
    }

    #[test]
    fn test_tax_rate_from_config() {
        let config = RegisterConfig {
            tax_rate_bps: 0,
            ..RegisterConfig::default()
        };
        let mut register = Register::new(config, Catalog::from_json_str(CATALOG).unwrap());
        exec(&mut register, "add 1").unwrap();
        assert_eq!(open(&register).summary().total, Money::from_minor(25000));
    }
}
