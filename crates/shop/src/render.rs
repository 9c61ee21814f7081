//! Text rendering for the console session.

use core::fmt::Write as _;

use bazaar_cart::{CartEvent, CartLine};
use bazaar_catalog::{Product, ProductKind};
use bazaar_core::Money;
use bazaar_events::{Event, EventEnvelope};
use bazaar_wishlist::WishlistEvent;

use crate::session::SessionEvent;

const RULE_WIDTH: usize = 60;

/// Formats domain values for display, in one currency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Renderer {
    currency: String,
}

impl Renderer {
    pub fn new(currency: impl Into<String>) -> Self {
        Self {
            currency: currency.into(),
        }
    }

    /// `₹1,234.50`
    pub fn money(&self, amount: Money) -> String {
        let plain = amount.to_string();
        let (major, minor) = plain.split_once('.').unwrap_or((plain.as_str(), "00"));
        format!("{}{}.{}", self.currency, group_thousands(major), minor)
    }

    pub fn banner(&self) -> String {
        format!("ONLINE BAZAAR\n{}", self.help())
    }

    pub fn help(&self) -> String {
        [
            "Commands:",
            "  products            (1) list products",
            "  show <id>               product details",
            "  add <id> <qty>      (2) add to cart",
            "  cart                (3) view cart",
            "  edit <id> <qty>     (4) change a cart quantity",
            "  remove <id>         (5) remove from cart",
            "  checkout            (6) check out",
            "  total                   cart total",
            "  wish <id>               add to wishlist",
            "  unwish <id>             remove from wishlist",
            "  wishlist                view wishlist",
            "  history                 session activity",
            "  exit                (7) leave",
        ]
        .join("\n")
    }

    pub fn products<'a>(&self, products: impl Iterator<Item = &'a Product>) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{:<8} {:<36} {:>12} {:>9}", "ID", "Name", "Price", "Available");
        let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH + 8));
        let mut any = false;
        for product in products {
            any = true;
            let _ = writeln!(
                out,
                "{:<8} {:<36} {:>12} {:>9}",
                product.id(),
                product.name(),
                self.money(product.unit_price()),
                stock_label(product.stock()),
            );
        }
        if !any {
            return "No products available at the moment.".to_string();
        }
        out.trim_end().to_string()
    }

    pub fn product_details(&self, product: &Product) -> String {
        let mut out = format!(
            "ID: {}\nName: {}\nPrice: {}\nAvailable: {}",
            product.id(),
            product.name(),
            self.money(product.unit_price()),
            stock_label(product.stock()),
        );
        match product.kind() {
            ProductKind::Generic => {}
            ProductKind::Physical { weight_grams } => {
                let _ = write!(out, "\nWeight: {}", weight_label(*weight_grams));
            }
            ProductKind::Digital { download_link } => {
                let _ = write!(out, "\nDownload: {download_link}");
            }
        }
        let _ = write!(out, "\nType: {}", product.kind().label());
        out
    }

    pub fn cart<'a>(
        &self,
        lines: impl Iterator<Item = CartLine<'a>>,
        units: u64,
        total: Money,
    ) -> String {
        let mut body = String::new();
        for line in lines {
            let _ = writeln!(
                body,
                "- {} [{}] x {} @ {} = {}",
                line.product.name(),
                line.product.id(),
                line.quantity,
                self.money(line.product.unit_price()),
                self.money(line.subtotal),
            );
        }
        if body.is_empty() {
            return "Your shopping cart is empty.".to_string();
        }
        let rule = "-".repeat(RULE_WIDTH);
        format!(
            "Your shopping cart:\n{rule}\n{body}{rule}\nItems: {units}\nGRAND TOTAL: {}",
            self.money(total)
        )
    }

    pub fn total(&self, total: Money) -> String {
        format!("Cart total: {}", self.money(total))
    }

    pub fn wishlist<'a>(&self, products: impl Iterator<Item = &'a Product>) -> String {
        let items: Vec<String> = products
            .map(|p| {
                format!(
                    "- {} [{}] {}",
                    p.name(),
                    p.id(),
                    self.money(p.unit_price())
                )
            })
            .collect();
        if items.is_empty() {
            "Your wishlist is empty.".to_string()
        } else {
            format!("Your wishlist:\n{}", items.join("\n"))
        }
    }

    pub fn history<'a>(
        &self,
        entries: impl Iterator<Item = &'a EventEnvelope<SessionEvent>>,
    ) -> String {
        let lines: Vec<String> = entries
            .map(|envelope| {
                let event = envelope.payload();
                format!(
                    "{} {:<9} #{:<3} {}",
                    event.occurred_at().format("%H:%M:%S"),
                    envelope.aggregate_type(),
                    envelope.sequence_number(),
                    self.describe(event),
                )
            })
            .collect();
        if lines.is_empty() {
            "No activity yet.".to_string()
        } else {
            lines.join("\n")
        }
    }

    fn describe(&self, event: &SessionEvent) -> String {
        match event {
            SessionEvent::Cart(CartEvent::ItemAdded(e)) => {
                format!("ADD {} x {}", e.product_id, e.quantity)
            }
            SessionEvent::Cart(CartEvent::QuantityChanged(e)) => {
                format!("UPDATE {} {} -> {}", e.product_id, e.previous, e.quantity)
            }
            SessionEvent::Cart(CartEvent::ItemRemoved(e)) => {
                format!("REMOVE {} x {}", e.product_id, e.quantity)
            }
            SessionEvent::Cart(CartEvent::CartCheckedOut(e)) => format!(
                "CHECKOUT {} item(s), {}",
                e.units,
                self.money(e.total)
            ),
            SessionEvent::Wishlist(WishlistEvent::ItemAdded(e)) => {
                format!("WISH {}", e.product_id)
            }
            SessionEvent::Wishlist(WishlistEvent::ItemRemoved(e)) => {
                format!("UNWISH {}", e.product_id)
            }
        }
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new("₹")
    }
}

fn stock_label(stock: Option<u32>) -> String {
    stock.map_or_else(|| "-".to_string(), |s| s.to_string())
}

fn weight_label(grams: u32) -> String {
    if grams >= 1_000 {
        format!("{}.{:03} kg", grams / 1_000, grams % 1_000)
    } else {
        format!("{grams} g")
    }
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
