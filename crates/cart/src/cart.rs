use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazaar_catalog::{Catalog, Product, ProductId};
use bazaar_core::{Aggregate, AggregateRoot, DomainError, DomainResult, Money, Quantity, SessionId};
use bazaar_events::Event;

/// One product in the cart. The quantity is always positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartEntry {
    pub product_id: ProductId,
    pub quantity: Quantity,
}

/// A cart entry resolved against the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CartLine<'a> {
    pub product: &'a Product,
    pub quantity: Quantity,
    pub subtotal: Money,
}

/// Aggregate root: the session's shopping cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cart {
    id: SessionId,
    entries: Vec<CartEntry>,
    version: u64,
}

impl Cart {
    /// Create an empty cart for a session.
    pub fn empty(id: SessionId) -> Self {
        Self {
            id,
            entries: Vec::new(),
            version: 0,
        }
    }

    /// Rebuild a cart by applying previously recorded events in order.
    pub fn replay<'a>(id: SessionId, events: impl IntoIterator<Item = &'a CartEvent>) -> Self {
        let mut cart = Self::empty(id);
        for event in events {
            cart.apply(event);
        }
        cart
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn quantity_of(&self, product_id: &ProductId) -> Option<Quantity> {
        self.entry(product_id).map(|e| e.quantity)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all entry quantities.
    pub fn total_units(&self) -> u64 {
        self.entries
            .iter()
            .map(|e| u64::from(e.quantity.get()))
            .sum()
    }

    /// Entries resolved through the catalog, in the order they were added.
    ///
    /// Entries whose product is no longer in the catalog are skipped.
    pub fn lines<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = CartLine<'a>> + Clone + 'a {
        self.entries.iter().filter_map(move |entry| {
            catalog.get(&entry.product_id).map(|product| CartLine {
                product,
                quantity: entry.quantity,
                subtotal: product.unit_price().times(entry.quantity),
            })
        })
    }

    /// Σ unit_price × quantity, priced from the catalog at call time.
    pub fn total(&self, catalog: &Catalog) -> Money {
        self.lines(catalog).map(|line| line.subtotal).sum()
    }

    /// Ids of entries whose product is missing from the catalog.
    pub fn orphans(&self, catalog: &Catalog) -> Vec<ProductId> {
        self.entries
            .iter()
            .filter(|e| !catalog.contains(&e.product_id))
            .map(|e| e.product_id.clone())
            .collect()
    }

    pub fn add_item(
        &mut self,
        catalog: &Catalog,
        product_id: &ProductId,
        quantity: i64,
    ) -> DomainResult<Vec<CartEvent>> {
        self.execute(
            catalog,
            &CartCommand::AddItem(AddItem {
                product_id: product_id.clone(),
                quantity,
                occurred_at: Utc::now(),
            }),
        )
    }

    /// Set an entry's quantity. Zero is rejected; use `remove_item` instead.
    pub fn edit_quantity(
        &mut self,
        catalog: &Catalog,
        product_id: &ProductId,
        quantity: i64,
    ) -> DomainResult<Vec<CartEvent>> {
        self.execute(
            catalog,
            &CartCommand::EditQuantity(EditQuantity {
                product_id: product_id.clone(),
                quantity,
                occurred_at: Utc::now(),
            }),
        )
    }

    pub fn remove_item(
        &mut self,
        catalog: &Catalog,
        product_id: &ProductId,
    ) -> DomainResult<Vec<CartEvent>> {
        self.execute(
            catalog,
            &CartCommand::RemoveItem(RemoveItem {
                product_id: product_id.clone(),
                occurred_at: Utc::now(),
            }),
        )
    }

    pub fn checkout(&mut self, catalog: &Catalog) -> DomainResult<Vec<CartEvent>> {
        self.execute(
            catalog,
            &CartCommand::Checkout(Checkout {
                occurred_at: Utc::now(),
            }),
        )
    }

    /// Drop every orphaned entry, returning the emitted removals.
    pub fn prune_orphans(&mut self, catalog: &Catalog) -> DomainResult<Vec<CartEvent>> {
        let mut events = Vec::new();
        for product_id in self.orphans(catalog) {
            events.extend(self.remove_item(catalog, &product_id)?);
        }
        Ok(events)
    }

    fn entry(&self, product_id: &ProductId) -> Option<&CartEntry> {
        self.entries.iter().find(|e| &e.product_id == product_id)
    }

    fn require_entry(&self, product_id: &ProductId) -> DomainResult<&CartEntry> {
        self.entry(product_id)
            .ok_or_else(|| DomainError::not_found("cart item", product_id))
    }
}

impl AggregateRoot for Cart {
    type Id = SessionId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddItem {
    pub product_id: ProductId,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: EditQuantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditQuantity {
    pub product_id: ProductId,
    pub quantity: i64,
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Command: Checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checkout {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartCommand {
    AddItem(AddItem),
    EditQuantity(EditQuantity),
    RemoveItem(RemoveItem),
    Checkout(Checkout),
}

/// Event: ItemAdded. `quantity` is the amount added, not the new total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub cart_id: SessionId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub occurred_at: DateTime<Utc>,
}

/// Event: QuantityChanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityChanged {
    pub cart_id: SessionId,
    pub product_id: ProductId,
    pub previous: Quantity,
    pub quantity: Quantity,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub cart_id: SessionId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub occurred_at: DateTime<Utc>,
}

/// Event: CartCheckedOut. Applying it empties the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartCheckedOut {
    pub cart_id: SessionId,
    pub total: Money,
    pub lines: usize,
    pub units: u64,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CartEvent {
    ItemAdded(ItemAdded),
    QuantityChanged(QuantityChanged),
    ItemRemoved(ItemRemoved),
    CartCheckedOut(CartCheckedOut),
}

impl Event for CartEvent {
    fn event_type(&self) -> &'static str {
        match self {
            CartEvent::ItemAdded(_) => "cart.item.added",
            CartEvent::QuantityChanged(_) => "cart.item.quantity_changed",
            CartEvent::ItemRemoved(_) => "cart.item.removed",
            CartEvent::CartCheckedOut(_) => "cart.checked_out",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            CartEvent::ItemAdded(e) => e.occurred_at,
            CartEvent::QuantityChanged(e) => e.occurred_at,
            CartEvent::ItemRemoved(e) => e.occurred_at,
            CartEvent::CartCheckedOut(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Cart {
    type Command = CartCommand;
    type Event = CartEvent;
    type Error = DomainError;
    type Context = Catalog;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            CartEvent::ItemAdded(e) => match self
                .entries
                .iter_mut()
                .find(|entry| entry.product_id == e.product_id)
            {
                Some(entry) => entry.quantity = entry.quantity.saturating_add(e.quantity),
                None => self.entries.push(CartEntry {
                    product_id: e.product_id.clone(),
                    quantity: e.quantity,
                }),
            },
            CartEvent::QuantityChanged(e) => {
                if let Some(entry) = self
                    .entries
                    .iter_mut()
                    .find(|entry| entry.product_id == e.product_id)
                {
                    entry.quantity = e.quantity;
                }
            }
            CartEvent::ItemRemoved(e) => {
                self.entries.retain(|entry| entry.product_id != e.product_id);
            }
            CartEvent::CartCheckedOut(_) => {
                self.entries.clear();
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(
        &self,
        catalog: &Self::Context,
        command: &Self::Command,
    ) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            CartCommand::AddItem(cmd) => self.handle_add(catalog, cmd),
            CartCommand::EditQuantity(cmd) => self.handle_edit(catalog, cmd),
            CartCommand::RemoveItem(cmd) => self.handle_remove(cmd),
            CartCommand::Checkout(cmd) => self.handle_checkout(catalog, cmd),
        }
    }
}

impl Cart {
    fn handle_add(&self, catalog: &Catalog, cmd: &AddItem) -> DomainResult<Vec<CartEvent>> {
        let quantity = Quantity::new(cmd.quantity)?;
        let product = catalog.find_by_id(&cmd.product_id)?;

        let resulting = match self.quantity_of(&cmd.product_id) {
            Some(existing) => existing.checked_add(quantity)?,
            None => quantity,
        };
        product.ensure_available(u64::from(resulting.get()))?;

        Ok(vec![CartEvent::ItemAdded(ItemAdded {
            cart_id: self.id,
            product_id: cmd.product_id.clone(),
            quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_edit(&self, catalog: &Catalog, cmd: &EditQuantity) -> DomainResult<Vec<CartEvent>> {
        let entry = self.require_entry(&cmd.product_id)?;
        let quantity = Quantity::new(cmd.quantity)?;

        if quantity == entry.quantity {
            return Ok(vec![]);
        }

        // The entry may outlive its product; only tracked stock can refuse.
        if let Some(product) = catalog.get(&cmd.product_id) {
            product.ensure_available(u64::from(quantity.get()))?;
        }

        Ok(vec![CartEvent::QuantityChanged(QuantityChanged {
            cart_id: self.id,
            product_id: cmd.product_id.clone(),
            previous: entry.quantity,
            quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_remove(&self, cmd: &RemoveItem) -> DomainResult<Vec<CartEvent>> {
        let entry = self.require_entry(&cmd.product_id)?;

        Ok(vec![CartEvent::ItemRemoved(ItemRemoved {
            cart_id: self.id,
            product_id: cmd.product_id.clone(),
            quantity: entry.quantity,
            occurred_at: cmd.occurred_at,
        })])
    }

    fn handle_checkout(&self, catalog: &Catalog, cmd: &Checkout) -> DomainResult<Vec<CartEvent>> {
        if self.is_empty() {
            return Err(DomainError::validation("cannot check out an empty cart"));
        }

        Ok(vec![CartEvent::CartCheckedOut(CartCheckedOut {
            cart_id: self.id,
            total: self.total(catalog),
            lines: self.lines(catalog).count(),
            units: self.lines(catalog).map(|l| u64::from(l.quantity.get())).sum(),
            occurred_at: cmd.occurred_at,
        })])
    }
}
