use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bazaar_catalog::{Catalog, Product, ProductId};
use bazaar_core::{Aggregate, AggregateRoot, DomainError, DomainResult, SessionId};
use bazaar_events::Event;

/// Aggregate root: the session's wishlist.
///
/// Holds product ids with set semantics, in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Wishlist {
    id: SessionId,
    items: Vec<ProductId>,
    version: u64,
}

impl Wishlist {
    /// Create an empty wishlist for a session.
    pub fn empty(id: SessionId) -> Self {
        Self {
            id,
            items: Vec::new(),
            version: 0,
        }
    }

    pub fn replay<'a>(id: SessionId, events: impl IntoIterator<Item = &'a WishlistEvent>) -> Self {
        let mut wishlist = Self::empty(id);
        for event in events {
            wishlist.apply(event);
        }
        wishlist
    }

    pub fn product_ids(&self) -> &[ProductId] {
        &self.items
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.items.contains(product_id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Wishlisted products resolved through the catalog.
    ///
    /// Lazy and restartable (clone it, or call again). Ids no longer in the
    /// catalog are skipped.
    pub fn list_items<'a>(&'a self, catalog: &'a Catalog) -> impl Iterator<Item = &'a Product> + Clone + 'a {
        self.items.iter().filter_map(move |id| catalog.get(id))
    }

    pub fn orphans(&self, catalog: &Catalog) -> Vec<ProductId> {
        self.items
            .iter()
            .filter(|id| !catalog.contains(id))
            .cloned()
            .collect()
    }

    /// Add a product. Adding one that is already present emits nothing.
    pub fn add_item(
        &mut self,
        catalog: &Catalog,
        product_id: &ProductId,
    ) -> DomainResult<Vec<WishlistEvent>> {
        self.execute(
            catalog,
            &WishlistCommand::AddItem(AddItem {
                product_id: product_id.clone(),
                occurred_at: Utc::now(),
            }),
        )
    }

    pub fn remove_item(
        &mut self,
        catalog: &Catalog,
        product_id: &ProductId,
    ) -> DomainResult<Vec<WishlistEvent>> {
        self.execute(
            catalog,
            &WishlistCommand::RemoveItem(RemoveItem {
                product_id: product_id.clone(),
                occurred_at: Utc::now(),
            }),
        )
    }

    pub fn prune_orphans(&mut self, catalog: &Catalog) -> DomainResult<Vec<WishlistEvent>> {
        let mut events = Vec::new();
        for product_id in self.orphans(catalog) {
            events.extend(self.remove_item(catalog, &product_id)?);
        }
        Ok(events)
    }
}

impl AggregateRoot for Wishlist {
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
    pub occurred_at: DateTime<Utc>,
}

/// Command: RemoveItem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemoveItem {
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WishlistCommand {
    AddItem(AddItem),
    RemoveItem(RemoveItem),
}

/// Event: ItemAdded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemAdded {
    pub wishlist_id: SessionId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

/// Event: ItemRemoved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRemoved {
    pub wishlist_id: SessionId,
    pub product_id: ProductId,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum WishlistEvent {
    ItemAdded(ItemAdded),
    ItemRemoved(ItemRemoved),
}

impl Event for WishlistEvent {
    fn event_type(&self) -> &'static str {
        match self {
            WishlistEvent::ItemAdded(_) => "wishlist.item.added",
            WishlistEvent::ItemRemoved(_) => "wishlist.item.removed",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            WishlistEvent::ItemAdded(e) => e.occurred_at,
            WishlistEvent::ItemRemoved(e) => e.occurred_at,
        }
    }
}

impl Aggregate for Wishlist {
    type Command = WishlistCommand;
    type Event = WishlistEvent;
    type Error = DomainError;
    type Context = Catalog;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            WishlistEvent::ItemAdded(e) => {
                if !self.items.contains(&e.product_id) {
                    self.items.push(e.product_id.clone());
                }
            }
            WishlistEvent::ItemRemoved(e) => {
                self.items.retain(|id| id != &e.product_id);
            }
        }

        self.version += 1;
    }

    fn handle(
        &self,
        catalog: &Self::Context,
        command: &Self::Command,
    ) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            WishlistCommand::AddItem(cmd) => {
                catalog.find_by_id(&cmd.product_id)?;
                if self.contains(&cmd.product_id) {
                    return Ok(vec![]);
                }
                Ok(vec![WishlistEvent::ItemAdded(ItemAdded {
                    wishlist_id: self.id,
                    product_id: cmd.product_id.clone(),
                    occurred_at: cmd.occurred_at,
                })])
            }
            WishlistCommand::RemoveItem(cmd) => {
                if !self.contains(&cmd.product_id) {
                    return Err(DomainError::not_found("wishlist item", &cmd.product_id));
                }
                Ok(vec![WishlistEvent::ItemRemoved(ItemRemoved {
                    wishlist_id: self.id,
                    product_id: cmd.product_id.clone(),
                    occurred_at: cmd.occurred_at,
                })])
            }
        }
    }
}
