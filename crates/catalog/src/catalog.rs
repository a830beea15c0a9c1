use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use marketsim_core::{Bounds, DomainError, DomainResult, Month};

use crate::item::{Item, ItemId, MAX_PRICE, NewItem, StockChange};

/// Recipe for seeding a catalog with random listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub item_count: usize,
    /// Number of distinct titles (`Item0..`) and descriptions (`Lorem 0..`).
    pub title_pool_size: usize,
    pub price_ladder: Vec<u64>,
    pub quantity_range: Bounds,
    pub month_range: Bounds,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            item_count: 1000,
            title_pool_size: 20,
            price_ladder: (10..200).step_by(10).collect(),
            quantity_range: Bounds::new(10_000, 100_000),
            month_range: Bounds::new(1, 12),
        }
    }
}

impl CatalogConfig {
    pub fn validate(&self) -> DomainResult<()> {
        if self.item_count == 0 {
            return Err(DomainError::invalid_config("item_count must be positive"));
        }
        if self.title_pool_size == 0 {
            return Err(DomainError::invalid_config("title_pool_size must be positive"));
        }
        if self.price_ladder.is_empty() {
            return Err(DomainError::invalid_config("price_ladder cannot be empty"));
        }
        if self.price_ladder.contains(&0) {
            return Err(DomainError::invalid_config("price_ladder entries must be positive"));
        }
        if self.price_ladder.iter().any(|&price| price > MAX_PRICE) {
            return Err(DomainError::invalid_config(format!(
                "price_ladder entries must not exceed {MAX_PRICE}"
            )));
        }
        self.quantity_range.check("quantity_range")?;
        let months = self.month_range.check("month_range")?;
        if months.min < u32::from(Month::MIN) || months.max > u32::from(Month::MAX) {
            return Err(DomainError::invalid_config("month_range must stay within 1..=12"));
        }
        Ok(())
    }

    fn titles(&self) -> Vec<String> {
        (0..self.title_pool_size).map(|i| format!("Item{i}")).collect()
    }

    fn descriptions(&self) -> Vec<String> {
        (0..self.title_pool_size).map(|i| format!("Lorem {i}")).collect()
    }
}

/// The set of sellable listings and their live inventory.
///
/// Titles are drawn with replacement, so several listings may share a title.
/// Listings are never removed; they only run out of stock.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Catalog {
    items: Vec<Item>,
}

impl Catalog {
    /// Seed a catalog from `config`, drawing every attribute from `rng`.
    pub fn create<R: Rng + ?Sized>(config: &CatalogConfig, rng: &mut R) -> DomainResult<Self> {
        config.validate()?;

        let titles = config.titles();
        let descriptions = config.descriptions();
        let mut items = Vec::with_capacity(config.item_count);

        for index in 0..config.item_count {
            let title = pick(&titles, rng, "title pool")?.clone();
            let description = pick(&descriptions, rng, "description pool")?.clone();
            let price = *pick(&config.price_ladder, rng, "price_ladder")?;
            let quantity = rng.gen_range(config.quantity_range.inclusive());
            let month = Month::new(rng.gen_range(config.month_range.inclusive()) as u8)?;

            let new = NewItem {
                title,
                description,
                price,
                quantity,
                month,
            };
            items.push(Item::from_new(ItemId::new(index), new)?);
        }

        let catalog = Self { items };
        for item in &catalog.items {
            tracing::debug!(item = %item, "listing created");
        }
        tracing::info!(
            items = catalog.len(),
            total_quantity = catalog.total_quantity(),
            "catalog seeded"
        );
        Ok(catalog)
    }

    /// Build a catalog from explicit listings (ids follow input order).
    pub fn from_items(items: impl IntoIterator<Item = NewItem>) -> DomainResult<Self> {
        let items = items
            .into_iter()
            .enumerate()
            .map(|(index, new)| Item::from_new(ItemId::new(index), new))
            .collect::<DomainResult<Vec<_>>>()?;
        if items.is_empty() {
            return Err(DomainError::invalid_config("catalog needs at least one item"));
        }
        Ok(Self { items })
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.index())
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Reduce stock of the first listing titled `title` that can cover `by` units.
    ///
    /// Requests no listing can cover are ignored (`StockChange::Skipped`).
    pub fn decrement(&mut self, title: &str, by: u32) -> DomainResult<StockChange> {
        let mut known = false;
        for item in self.items.iter_mut().filter(|i| i.title() == title) {
            known = true;
            if item.take(by) == StockChange::Applied {
                return Ok(StockChange::Applied);
            }
        }
        if known {
            Ok(StockChange::Skipped)
        } else {
            Err(DomainError::not_found(format!("item {title}")))
        }
    }

    /// Reduce stock of one specific listing; same ignore-if-insufficient policy.
    pub fn decrement_item(&mut self, id: ItemId, by: u32) -> DomainResult<StockChange> {
        let item = self
            .items
            .get_mut(id.index())
            .ok_or_else(|| DomainError::not_found(format!("listing {id}")))?;
        Ok(item.take(by))
    }

    /// Listings with stock left, evaluated lazily against current stock.
    pub fn available_items(&self) -> impl Iterator<Item = &Item> + '_ {
        self.items.iter().filter(|item| item.is_available())
    }

    pub fn available_titles(&self) -> impl Iterator<Item = &str> + '_ {
        self.available_items().map(Item::title)
    }

    pub fn has_stock(&self) -> bool {
        self.available_items().next().is_some()
    }

    pub fn total_quantity(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity())).sum()
    }

    pub fn total_sold(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.sold_count())).sum()
    }
}

fn pick<'a, T, R: Rng + ?Sized>(pool: &'a [T], rng: &mut R, what: &str) -> DomainResult<&'a T> {
    pool.choose(rng)
        .ok_or_else(|| DomainError::invalid_config(format!("{what} cannot be empty")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketsim_core::Entity;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn test_rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn test_month(n: u8) -> Month {
        Month::new(n).unwrap()
    }

    fn small_catalog() -> Catalog {
        Catalog::from_items([
            NewItem::new("A", 10, 5, test_month(1)),
            NewItem::new("B", 20, 5, test_month(2)),
            NewItem::new("A", 30, 2, test_month(3)),
        ])
        .unwrap()
    }

    #[test]
    fn create_draws_from_default_pools() {
        let config = CatalogConfig {
            item_count: 50,
            ..CatalogConfig::default()
        };
        let catalog = Catalog::create(&config, &mut test_rng()).unwrap();
        assert_eq!(catalog.len(), 50);
        for item in catalog.items() {
            assert!(config.quantity_range.contains(item.quantity()));
            assert!(config.price_ladder.contains(&item.price()));
            assert!(item.title().starts_with("Item"));
            assert!(item.description().starts_with("Lorem "));
            assert_eq!(item.sold_count(), 0);
        }
    }

    #[test]
    fn default_price_ladder_is_tens_up_to_190() {
        let ladder = CatalogConfig::default().price_ladder;
        assert_eq!(ladder.first(), Some(&10));
        assert_eq!(ladder.last(), Some(&190));
        assert_eq!(ladder.len(), 19);
    }

    #[test]
    fn create_is_reproducible_with_same_seed() {
        let config = CatalogConfig {
            item_count: 20,
            ..CatalogConfig::default()
        };
        let a = Catalog::create(&config, &mut test_rng()).unwrap();
        let b = Catalog::create(&config, &mut test_rng()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn create_rejects_bad_configuration() {
        let cases = [
            CatalogConfig {
                item_count: 0,
                ..CatalogConfig::default()
            },
            CatalogConfig {
                title_pool_size: 0,
                ..CatalogConfig::default()
            },
            CatalogConfig {
                price_ladder: vec![],
                ..CatalogConfig::default()
            },
            CatalogConfig {
                price_ladder: vec![10, MAX_PRICE + 1],
                ..CatalogConfig::default()
            },
            CatalogConfig {
                quantity_range: Bounds::new(10, 1),
                ..CatalogConfig::default()
            },
            CatalogConfig {
                month_range: Bounds::new(0, 12),
                ..CatalogConfig::default()
            },
        ];
        for config in cases {
            match Catalog::create(&config, &mut test_rng()) {
                Err(DomainError::InvalidConfiguration(_)) => {}
                other => panic!("Expected InvalidConfiguration for {config:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn from_items_rejects_empty_input() {
        let err = Catalog::from_items(Vec::new()).unwrap_err();
        assert!(matches!(err, DomainError::InvalidConfiguration(_)));
    }

    #[test]
    fn decrement_by_title_updates_first_listing_with_room() {
        let mut catalog = small_catalog();
        assert_eq!(catalog.decrement("A", 5).unwrap(), StockChange::Applied);
        assert_eq!(catalog.items()[0].quantity(), 0);

        // First "A" is empty now; the second "A" listing covers the request.
        assert_eq!(catalog.decrement("A", 2).unwrap(), StockChange::Applied);
        assert_eq!(catalog.items()[2].quantity(), 0);
    }

    #[test]
    fn decrement_beyond_stock_is_silently_skipped() {
        let mut catalog = small_catalog();
        assert_eq!(catalog.decrement("B", 6).unwrap(), StockChange::Skipped);
        assert_eq!(catalog.items()[1].quantity(), 5);
        assert_eq!(catalog.items()[1].sold_count(), 0);
    }

    #[test]
    fn decrement_unknown_title_is_not_found() {
        let mut catalog = small_catalog();
        match catalog.decrement("Z", 1) {
            Err(DomainError::NotFound(msg)) if msg.contains("Z") => {}
            other => panic!("Expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn available_items_shrinks_as_stock_depletes() {
        let mut catalog = small_catalog();
        assert_eq!(catalog.available_titles().collect::<Vec<_>>(), vec!["A", "B", "A"]);

        let b = catalog.items()[1].id();
        catalog.decrement_item(b, 5).unwrap();
        assert_eq!(catalog.available_titles().collect::<Vec<_>>(), vec!["A", "A"]);

        catalog.decrement("A", 5).unwrap();
        catalog.decrement("A", 2).unwrap();
        assert!(!catalog.has_stock());
        assert_eq!(catalog.available_items().count(), 0);
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: every valid recipe yields exactly `item_count` listings drawn from it.
            #[test]
            fn create_yields_configured_item_count(
                item_count in 1usize..200,
                quantity_min in 0u32..1_000,
                quantity_span in 0u32..1_000,
                price_ladder in prop::collection::vec(1u64..=MAX_PRICE, 1..10),
                seed in any::<u64>()
            ) {
                let config = CatalogConfig {
                    item_count,
                    price_ladder,
                    quantity_range: Bounds::new(quantity_min, quantity_min + quantity_span),
                    ..CatalogConfig::default()
                };
                let catalog = Catalog::create(&config, &mut StdRng::seed_from_u64(seed)).unwrap();

                prop_assert_eq!(catalog.len(), item_count);
                for item in catalog.items() {
                    prop_assert!(config.quantity_range.contains(item.quantity()));
                    prop_assert!(config.price_ladder.contains(&item.price()));
                    prop_assert!(config.month_range.contains(u32::from(item.month().number())));
                    prop_assert_eq!(item.sold_count(), 0);
                }
            }

            /// Property: stock is conserved and never negative under any decrement sequence.
            #[test]
            fn decrements_conserve_stock(
                quantities in prop::collection::vec(0u32..50, 1..6),
                requests in prop::collection::vec((0usize..6, 0u32..20), 0..40)
            ) {
                let mut catalog = Catalog::from_items(
                    quantities
                        .iter()
                        .enumerate()
                        .map(|(i, q)| NewItem::new(format!("Item{i}"), 10, *q, test_month(1))),
                )
                .unwrap();

                for (index, by) in requests {
                    let title = format!("Item{}", index % quantities.len());
                    catalog.decrement(&title, by).unwrap();
                }

                for (item, initial) in catalog.items().iter().zip(&quantities) {
                    prop_assert!(item.quantity() <= *initial);
                    prop_assert_eq!(item.initial_quantity(), u64::from(*initial));
                }
                let initial_total: u64 = quantities.iter().map(|q| u64::from(*q)).sum();
                prop_assert_eq!(catalog.total_quantity() + catalog.total_sold(), initial_total);
            }
        }
    }
}
