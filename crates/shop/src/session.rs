//! The interactive shopping session: command dispatch and the console loop.

use std::io::{self, BufRead, Write};

use chrono::{DateTime, Utc};
use thiserror::Error;

use bazaar_cart::{Cart, CartCommand, CartEvent};
use bazaar_catalog::{Catalog, ProductId};
use bazaar_core::{Aggregate, AggregateRoot, DomainError, DomainResult, ExpectedVersion, SessionId};
use bazaar_events::{Event, EventJournal};
use bazaar_wishlist::{Wishlist, WishlistCommand, WishlistEvent};

use crate::command::{CommandError, ShopCommand};
use crate::render::Renderer;

pub const CART_STREAM: &str = "cart";
pub const WISHLIST_STREAM: &str = "wishlist";

const PROMPT: &str = "> ";

/// Any event recorded in the session journal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Cart(CartEvent),
    Wishlist(WishlistEvent),
}

impl Event for SessionEvent {
    fn event_type(&self) -> &'static str {
        match self {
            SessionEvent::Cart(e) => e.event_type(),
            SessionEvent::Wishlist(e) => e.event_type(),
        }
    }

    fn version(&self) -> u32 {
        match self {
            SessionEvent::Cart(e) => e.version(),
            SessionEvent::Wishlist(e) => e.version(),
        }
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            SessionEvent::Cart(e) => e.occurred_at(),
            SessionEvent::Wishlist(e) => e.occurred_at(),
        }
    }
}

/// Errors recovered by the session loop and shown to the user.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error("input is not valid UTF-8")]
    InvalidUtf8,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Terminated,
}

/// Result of executing one command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub exit: bool,
}

impl Reply {
    fn say(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            exit: false,
        }
    }

    fn goodbye(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            exit: true,
        }
    }
}

/// One shopper's session over a read-only catalog.
#[derive(Debug)]
pub struct Session {
    id: SessionId,
    catalog: Catalog,
    cart: Cart,
    wishlist: Wishlist,
    journal: EventJournal<SessionEvent>,
    renderer: Renderer,
    state: SessionState,
}

impl Session {
    pub fn new(catalog: Catalog, renderer: Renderer) -> Self {
        let id = SessionId::new();
        Self {
            id,
            catalog,
            cart: Cart::empty(id),
            wishlist: Wishlist::empty(id),
            journal: EventJournal::new(id),
            renderer,
            state: SessionState::Running,
        }
    }

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn wishlist(&self) -> &Wishlist {
        &self.wishlist
    }

    pub fn journal(&self) -> &EventJournal<SessionEvent> {
        &self.journal
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Drive the session until `exit` or end of input.
    ///
    /// Only I/O failures on `input`/`output` are returned; command errors and
    /// undecodable lines are written to `output` and the loop continues.
    pub fn run<R: BufRead, W: Write>(&mut self, mut input: R, mut output: W) -> io::Result<()> {
        writeln!(output, "{}", self.renderer.banner())?;

        let mut buf = Vec::new();
        while self.state == SessionState::Running {
            write!(output, "{PROMPT}")?;
            output.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf)? == 0 {
                tracing::info!(session = %self.id, "input closed; ending session");
                self.state = SessionState::Terminated;
                writeln!(output)?;
                break;
            }

            let reply = match std::str::from_utf8(&buf) {
                Ok(line) => self.handle_line(line),
                Err(_) => self.render_error(&SessionError::InvalidUtf8),
            };
            if !reply.is_empty() {
                writeln!(output, "{reply}")?;
            }
        }

        output.flush()
    }

    /// Parse and execute one input line, rendering any error as text.
    pub fn handle_line(&mut self, line: &str) -> String {
        let command = match line.parse::<ShopCommand>() {
            Ok(command) => command,
            Err(CommandError::Empty) => return String::new(),
            Err(e) => return self.render_error(&SessionError::from(e)),
        };

        match self.execute(command) {
            Ok(reply) => {
                if reply.exit {
                    self.state = SessionState::Terminated;
                }
                reply.text
            }
            Err(e) => self.render_error(&SessionError::from(e)),
        }
    }

    pub fn execute(&mut self, command: ShopCommand) -> DomainResult<Reply> {
        tracing::debug!(session = %self.id, ?command, "executing command");

        let reply = match command {
            ShopCommand::Products => Reply::say(self.renderer.products(self.catalog.list_products())),
            ShopCommand::Show(product_id) => {
                let product = self.catalog.find_by_id(&product_id)?;
                Reply::say(self.renderer.product_details(product))
            }
            ShopCommand::Add {
                product_id,
                quantity,
            } => self.add_to_cart(&product_id, quantity)?,
            ShopCommand::Edit {
                product_id,
                quantity,
            } => self.edit_cart(&product_id, quantity)?,
            ShopCommand::Remove(product_id) => self.remove_from_cart(&product_id)?,
            ShopCommand::Cart => Reply::say(self.renderer.cart(
                self.cart.lines(&self.catalog),
                self.cart.total_units(),
                self.cart.total(&self.catalog),
            )),
            ShopCommand::Total => Reply::say(self.renderer.total(self.cart.total(&self.catalog))),
            ShopCommand::Checkout => self.checkout()?,
            ShopCommand::Wish(product_id) => self.wish(&product_id)?,
            ShopCommand::Unwish(product_id) => self.unwish(&product_id)?,
            ShopCommand::Wishlist => {
                Reply::say(self.renderer.wishlist(self.wishlist.list_items(&self.catalog)))
            }
            ShopCommand::History => Reply::say(self.renderer.history(self.journal.iter())),
            ShopCommand::Help => Reply::say(self.renderer.help()),
            ShopCommand::Exit => {
                Reply::goodbye("Thank you for shopping with us. Have a great day!")
            }
        };
        Ok(reply)
    }

    fn add_to_cart(&mut self, product_id: &ProductId, quantity: i64) -> DomainResult<Reply> {
        self.dispatch_cart(CartCommand::AddItem(bazaar_cart::AddItem {
            product_id: product_id.clone(),
            quantity,
            occurred_at: Utc::now(),
        }))?;

        let name = self.product_name(product_id);
        Ok(Reply::say(format!("Added {quantity} x {name} to your cart.")))
    }

    fn edit_cart(&mut self, product_id: &ProductId, quantity: i64) -> DomainResult<Reply> {
        let events = self.dispatch_cart(CartCommand::EditQuantity(bazaar_cart::EditQuantity {
            product_id: product_id.clone(),
            quantity,
            occurred_at: Utc::now(),
        }))?;

        let name = self.product_name(product_id);
        Ok(Reply::say(match events.first() {
            Some(CartEvent::QuantityChanged(e)) => {
                format!("Updated {name}: {} -> {}.", e.previous, e.quantity)
            }
            _ => format!("{name} already has quantity {quantity}."),
        }))
    }

    fn remove_from_cart(&mut self, product_id: &ProductId) -> DomainResult<Reply> {
        self.dispatch_cart(CartCommand::RemoveItem(bazaar_cart::RemoveItem {
            product_id: product_id.clone(),
            occurred_at: Utc::now(),
        }))?;

        let name = self.product_name(product_id);
        Ok(Reply::say(format!("Removed {name} from your cart.")))
    }

    fn checkout(&mut self) -> DomainResult<Reply> {
        let events = self.dispatch_cart(CartCommand::Checkout(bazaar_cart::Checkout {
            occurred_at: Utc::now(),
        }))?;

        Ok(Reply::say(match events.first() {
            Some(CartEvent::CartCheckedOut(e)) => format!(
                "Checkout complete! {} item(s), total {}.\nThank you for shopping with us!",
                e.units,
                self.renderer.money(e.total)
            ),
            _ => "Checkout complete!".to_string(),
        }))
    }

    fn wish(&mut self, product_id: &ProductId) -> DomainResult<Reply> {
        let events = self.dispatch_wishlist(WishlistCommand::AddItem(bazaar_wishlist::AddItem {
            product_id: product_id.clone(),
            occurred_at: Utc::now(),
        }))?;

        let name = self.product_name(product_id);
        Ok(Reply::say(if events.is_empty() {
            format!("{name} is already on your wishlist.")
        } else {
            format!("Added {name} to your wishlist.")
        }))
    }

    fn unwish(&mut self, product_id: &ProductId) -> DomainResult<Reply> {
        self.dispatch_wishlist(WishlistCommand::RemoveItem(bazaar_wishlist::RemoveItem {
            product_id: product_id.clone(),
            occurred_at: Utc::now(),
        }))?;

        let name = self.product_name(product_id);
        Ok(Reply::say(format!("Removed {name} from your wishlist.")))
    }

    /// Decide, append to the journal, then apply.
    ///
    /// A rejected append leaves the cart untouched.
    fn dispatch_cart(&mut self, command: CartCommand) -> DomainResult<Vec<CartEvent>> {
        let events = self.cart.handle(&self.catalog, &command)?;
        self.journal.append(
            CART_STREAM,
            ExpectedVersion::Exact(self.cart.version()),
            events.iter().cloned().map(SessionEvent::Cart).collect(),
        )?;
        for event in &events {
            self.cart.apply(event);
        }
        Ok(events)
    }

    fn dispatch_wishlist(&mut self, command: WishlistCommand) -> DomainResult<Vec<WishlistEvent>> {
        let events = self.wishlist.handle(&self.catalog, &command)?;
        self.journal.append(
            WISHLIST_STREAM,
            ExpectedVersion::Exact(self.wishlist.version()),
            events.iter().cloned().map(SessionEvent::Wishlist).collect(),
        )?;
        for event in &events {
            self.wishlist.apply(event);
        }
        Ok(events)
    }

    /// Catalog name for messages, falling back to the id for orphans.
    fn product_name(&self, product_id: &ProductId) -> String {
        self.catalog
            .get(product_id)
            .map(|p| p.name().to_string())
            .unwrap_or_else(|| product_id.to_string())
    }

    fn render_error(&self, error: &SessionError) -> String {
        tracing::debug!(session = %self.id, %error, "command failed");
        format!("error: {error}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bazaar_catalog::Product;
    use bazaar_core::Money;

    fn pid(raw: &str) -> ProductId {
        ProductId::new(raw).unwrap()
    }

    fn session() -> Session {
        let catalog = Catalog::new(vec![
            Product::new(pid("1"), "Pen", Money::from_major(2)).unwrap(),
            Product::new(pid("2"), "Book", Money::from_major(10))
                .unwrap()
                .with_stock(3),
        ])
        .unwrap();
        Session::new(catalog, Renderer::new("$"))
    }

    #[test]
    fn scenario_totals_through_commands() {
        let mut s = session();
        s.handle_line("add 1 3");
        s.handle_line("add 2 1");
        assert_eq!(s.handle_line("total"), "Cart total: $16.00");
        s.handle_line("edit 1 5");
        assert_eq!(s.handle_line("total"), "Cart total: $30.00");
        s.handle_line("remove 2");
        assert_eq!(s.handle_line("total"), "Cart total: $10.00");
    }

    #[test]
    fn errors_are_rendered_and_session_keeps_running() {
        let mut s = session();
        assert_eq!(s.handle_line("add 99 1"), "error: product not found: 99");
        assert_eq!(s.handle_line("remove 1"), "error: cart item not found: 1");
        assert!(s.handle_line("add 1 0").starts_with("error: invalid quantity"));
        assert!(s.handle_line("add 1 1.5").starts_with("error: invalid quantity"));
        assert!(s.handle_line("add 2 4").starts_with("error: insufficient stock for Book"));
        assert!(s.handle_line("fly").starts_with("error: unknown command 'fly'"));
        assert_eq!(s.state(), SessionState::Running);
        assert!(s.cart().is_empty());
        assert!(s.journal().is_empty());
    }

    #[test]
    fn blank_lines_produce_no_output() {
        let mut s = session();
        assert_eq!(s.handle_line("   \n"), "");
    }

    #[test]
    fn every_change_is_journaled_per_stream() {
        let mut s = session();
        s.handle_line("add 1 1");
        s.handle_line("wish 2");
        s.handle_line("wish 2");
        s.handle_line("edit 1 4");
        s.handle_line("edit 1 4");

        assert_eq!(s.journal().len(), 3);
        assert_eq!(s.journal().stream_version(CART_STREAM), s.cart().version());
        assert_eq!(s.journal().stream_version(WISHLIST_STREAM), s.wishlist().version());

        let types: Vec<&str> = s.journal().iter().map(|e| e.payload().event_type()).collect();
        assert_eq!(
            types,
            vec!["cart.item.added", "wishlist.item.added", "cart.item.quantity_changed"]
        );
    }

    #[test]
    fn journal_replays_to_current_cart() {
        let mut s = session();
        s.handle_line("add 1 3");
        s.handle_line("add 2 2");
        s.handle_line("remove 2");

        let cart_events: Vec<CartEvent> = s
            .journal()
            .stream(CART_STREAM)
            .filter_map(|e| match e.payload() {
                SessionEvent::Cart(c) => Some(c.clone()),
                SessionEvent::Wishlist(_) => None,
            })
            .collect();
        assert_eq!(&Cart::replay(s.id(), &cart_events), s.cart());
    }

    #[test]
    fn wishlist_commands() {
        let mut s = session();
        assert_eq!(s.handle_line("wish 1"), "Added Pen to your wishlist.");
        assert_eq!(s.handle_line("wish 1"), "Pen is already on your wishlist.");
        assert_eq!(s.handle_line("wishlist"), "Your wishlist:\n- Pen [1] $2.00");
        assert_eq!(s.handle_line("unwish 1"), "Removed Pen from your wishlist.");
        assert_eq!(s.handle_line("unwish 1"), "error: wishlist item not found: 1");
        // Wishlisted products are never priced into the cart.
        assert_eq!(s.handle_line("total"), "Cart total: $0.00");
    }

    #[test]
    fn checkout_clears_cart_and_rejects_empty_cart() {
        let mut s = session();
        assert!(s.handle_line("checkout").starts_with("error: validation failed"));
        s.handle_line("add 2 2");
        let reply = s.handle_line("checkout");
        assert!(reply.contains("total $20.00"), "{reply}");
        assert!(s.cart().is_empty());
        assert_eq!(s.handle_line("cart"), "Your shopping cart is empty.");
    }

    #[test]
    fn exit_terminates() {
        let mut s = session();
        s.handle_line("quit");
        assert_eq!(s.state(), SessionState::Terminated);
    }

    #[test]
    fn run_stops_at_exit_and_ignores_the_rest() {
        let mut s = session();
        let input = io::Cursor::new("add 1 2\nexit\nadd 1 5\n");
        let mut output = Vec::new();
        s.run(input, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("Added 2 x Pen to your cart."));
        assert!(text.contains("Have a great day!"));
        assert_eq!(s.cart().quantity_of(&pid("1")).unwrap().get(), 2);
    }

    #[test]
    fn run_terminates_on_end_of_input() {
        let mut s = session();
        let mut output = Vec::new();
        s.run(io::Cursor::new("products\n"), &mut output).unwrap();
        assert_eq!(s.state(), SessionState::Terminated);
        assert!(String::from_utf8(output).unwrap().contains("Book"));
    }

    #[test]
    fn invalid_utf8_line_is_reported_and_the_loop_continues() {
        let mut s = session();
        let input = io::Cursor::new(b"add 1 1\n\xff\xfe\nadd 1 1\ntotal\n".to_vec());
        let mut output = Vec::new();
        s.run(input, &mut output).unwrap();

        let text = String::from_utf8(output).unwrap();
        assert!(text.contains("error: input is not valid UTF-8"), "{text}");
        assert!(text.contains("Cart total: $4.00"), "{text}");
        assert_eq!(s.cart().quantity_of(&pid("1")).unwrap().get(), 2);
        assert_eq!(s.state(), SessionState::Terminated);
    }

    #[test]
    fn rejected_append_leaves_the_cart_unchanged() {
        let mut s = session();
        // Put the cart stream one event ahead of the cart aggregate.
        let foreign = Cart::empty(s.id()).add_item(&s.catalog, &pid("2"), 1).unwrap();
        s.journal
            .append(
                CART_STREAM,
                ExpectedVersion::Any,
                foreign.into_iter().map(SessionEvent::Cart).collect(),
            )
            .unwrap();

        let reply = s.handle_line("add 1 1");
        assert!(reply.starts_with("error: conflict"), "{reply}");
        assert!(s.cart().is_empty());
        assert_eq!(s.cart().version(), 0);
        assert_eq!(s.journal().len(), 1);
    }

    #[test]
    fn cart_view_shows_units_and_grand_total() {
        let mut s = session();
        s.handle_line("add 1 3");
        s.handle_line("add 2 1");
        let view = s.handle_line("cart");
        assert!(view.contains("Items: 4"), "{view}");
        assert!(view.ends_with("GRAND TOTAL: $16.00"), "{view}");
    }
}
