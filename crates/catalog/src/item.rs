use serde::{Deserialize, Serialize};

use marketsim_core::{DomainError, DomainResult, Entity, Month};

/// Catalog listing identifier (position of the listing in its catalog).
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(usize);

impl ItemId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl core::fmt::Display for ItemId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Largest accepted unit price. Any `u32` count times this still fits in a `u64`.
pub const MAX_PRICE: u64 = 1_000_000_000;

/// Input for a new listing, before the catalog assigns it an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    pub title: String,
    pub description: String,
    /// Price in smallest currency unit.
    pub price: u64,
    pub quantity: u32,
    pub month: Month,
}

impl NewItem {
    pub fn new(title: impl Into<String>, price: u64, quantity: u32, month: Month) -> Self {
        Self {
            title: title.into(),
            description: String::new(),
            price,
            quantity,
            month,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    fn validate(&self) -> DomainResult<()> {
        if self.title.trim().is_empty() {
            return Err(DomainError::invalid_config("item title cannot be empty"));
        }
        if self.price == 0 {
            return Err(DomainError::invalid_config(format!(
                "item {}: price must be positive",
                self.title
            )));
        }
        if self.price > MAX_PRICE {
            return Err(DomainError::invalid_config(format!(
                "item {}: price {} exceeds {MAX_PRICE}",
                self.title, self.price
            )));
        }
        Ok(())
    }
}

/// Outcome of a stock decrement.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StockChange {
    Applied,
    /// The request exceeded remaining stock; nothing changed.
    Skipped,
}

/// A sellable listing with live inventory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item {
    id: ItemId,
    title: String,
    description: String,
    price: u64,
    quantity: u32,
    sold_count: u32,
    month: Month,
}

impl Item {
    pub(crate) fn from_new(id: ItemId, new: NewItem) -> DomainResult<Self> {
        new.validate()?;
        Ok(Self {
            id,
            title: new.title,
            description: new.description,
            price: new.price,
            quantity: new.quantity,
            sold_count: 0,
            month: new.month,
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> u64 {
        self.price
    }

    /// Units still in stock.
    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn sold_count(&self) -> u32 {
        self.sold_count
    }

    /// Stock the listing started with (`quantity + sold_count`).
    pub fn initial_quantity(&self) -> u64 {
        u64::from(self.quantity) + u64::from(self.sold_count)
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn is_available(&self) -> bool {
        self.quantity > 0
    }

    /// Move `by` units from stock to sold. Requests larger than the remaining
    /// stock are ignored.
    pub(crate) fn take(&mut self, by: u32) -> StockChange {
        if by > self.quantity {
            return StockChange::Skipped;
        }
        self.quantity -= by;
        self.sold_count += by;
        StockChange::Applied
    }
}

impl Entity for Item {
    type Id = ItemId;

    fn id(&self) -> ItemId {
        self.id
    }
}

impl core::fmt::Display for Item {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "title = {}, description = {}, price = {}, month = {}, quantity = {}, sold_count = {}",
            self.title, self.description, self.price, self.month, self.quantity, self.sold_count
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_month() -> Month {
        Month::new(3).unwrap()
    }

    fn test_item(quantity: u32) -> Item {
        Item::from_new(ItemId::new(0), NewItem::new("Item1", 10, quantity, test_month())).unwrap()
    }

    #[test]
    fn take_moves_units_from_stock_to_sold() {
        let mut item = test_item(10);
        assert_eq!(item.take(4), StockChange::Applied);
        assert_eq!(item.quantity(), 6);
        assert_eq!(item.sold_count(), 4);
        assert_eq!(item.initial_quantity(), 10);
    }

    #[test]
    fn take_more_than_stock_is_ignored() {
        let mut item = test_item(3);
        assert_eq!(item.take(4), StockChange::Skipped);
        assert_eq!(item.quantity(), 3);
        assert_eq!(item.sold_count(), 0);
    }

    #[test]
    fn taking_exact_stock_empties_the_listing() {
        let mut item = test_item(3);
        assert_eq!(item.take(3), StockChange::Applied);
        assert!(!item.is_available());
    }

    #[test]
    fn zero_price_is_rejected() {
        let err = Item::from_new(ItemId::new(0), NewItem::new("Item1", 0, 1, test_month())).unwrap_err();
        match err {
            DomainError::InvalidConfiguration(msg) if msg.contains("price must be positive") => {}
            _ => panic!("Expected InvalidConfiguration for zero price"),
        }
    }

    #[test]
    fn price_above_cap_is_rejected() {
        let item = NewItem::new("Item1", MAX_PRICE + 1, 1, test_month());
        match Item::from_new(ItemId::new(0), item) {
            Err(DomainError::InvalidConfiguration(msg)) if msg.contains("exceeds") => {}
            other => panic!("Expected InvalidConfiguration, got {other:?}"),
        }
        assert!(Item::from_new(ItemId::new(0), NewItem::new("Item1", MAX_PRICE, 1, test_month())).is_ok());
    }

    #[test]
    fn blank_title_is_rejected() {
        let err = Item::from_new(ItemId::new(0), NewItem::new("  ", 10, 1, test_month())).unwrap_err();
        assert!(matches!(err, DomainError::InvalidConfiguration(_)));
    }

    #[test]
    fn display_lists_stock_fields() {
        let item = test_item(5);
        let line = item.to_string();
        assert!(line.contains("title = Item1"));
        assert!(line.contains("quantity = 5"));
        assert!(line.contains("sold_count = 0"));
    }
}
