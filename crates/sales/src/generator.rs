use rand::Rng;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};

use marketsim_catalog::{Catalog, ItemId, StockChange};
use marketsim_core::{Bounds, CustomerId, DomainError, DomainResult, Entity};

use crate::log::OrderLog;
use crate::order::Order;

/// How many orders a configured run produces: a fixed number or an inclusive
/// range to draw from (`1800` or `{"min": 1500, "max": 2000}`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderVolume {
    Exact(u32),
    Range(Bounds),
}

impl OrderVolume {
    fn validate(self) -> DomainResult<()> {
        let min = match self {
            OrderVolume::Exact(n) => n,
            OrderVolume::Range(bounds) => bounds.check("order_volume")?.min,
        };
        if min == 0 {
            return Err(DomainError::invalid_config("order_volume must be positive"));
        }
        Ok(())
    }

    fn draw<R: Rng + ?Sized>(self, rng: &mut R) -> usize {
        match self {
            OrderVolume::Exact(n) => n as usize,
            OrderVolume::Range(bounds) => rng.gen_range(bounds.inclusive()) as usize,
        }
    }
}

/// Order generation settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub order_volume: OrderVolume,
    pub customer_range: Bounds,
    pub per_order_count_range: Bounds,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            order_volume: OrderVolume::Range(Bounds::new(1500, 2000)),
            customer_range: Bounds::new(1, 10),
            per_order_count_range: Bounds::new(1, 10),
        }
    }
}

impl GeneratorConfig {
    pub fn validate(&self) -> DomainResult<()> {
        self.order_volume.validate()?;
        self.customer_range.check("customer_range")?;
        let counts = self.per_order_count_range.check("per_order_count_range")?;
        if counts.min == 0 {
            return Err(DomainError::invalid_config(
                "per_order_count_range must start at 1 or above",
            ));
        }
        Ok(())
    }
}

/// Draws orders against a depleting catalog.
///
/// All randomness comes from the caller's `Rng`; a seeded generator replays a
/// run exactly.
#[derive(Debug, Clone)]
pub struct OrderGenerator {
    config: GeneratorConfig,
}

impl OrderGenerator {
    pub fn new(config: GeneratorConfig) -> DomainResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Draw the order count from `order_volume`, then generate.
    pub fn generate_configured<R: Rng + ?Sized>(
        &self,
        catalog: &mut Catalog,
        rng: &mut R,
    ) -> DomainResult<OrderLog> {
        let order_count = self.config.order_volume.draw(rng);
        self.generate(order_count, catalog, rng)
    }

    /// Generate exactly `order_count` orders into a frozen log.
    ///
    /// Fails with `InventoryExhausted` as soon as a draw finds no listing with
    /// stock; the partial log is discarded.
    pub fn generate<R: Rng + ?Sized>(
        &self,
        order_count: usize,
        catalog: &mut Catalog,
        rng: &mut R,
    ) -> DomainResult<OrderLog> {
        if order_count == 0 {
            return Err(DomainError::invalid_config("order_count must be positive"));
        }

        let span = tracing::info_span!("generate_orders", order_count);
        let _guard = span.enter();

        // Each order takes at least one unit, so stock bounds the log size.
        let reachable = usize::try_from(catalog.total_quantity()).unwrap_or(usize::MAX);
        let mut log = OrderLog::with_capacity(order_count.min(reachable));
        for generated in 0..order_count {
            let Some(order) = self.next_order(catalog, rng)? else {
                tracing::warn!(generated, order_count, "catalog ran out of stock");
                return Err(DomainError::exhausted(generated, order_count));
            };
            tracing::debug!(order = %order, "order generated");
            log.append(order)?;
        }
        log.freeze();

        tracing::info!(
            orders = log.len(),
            remaining_stock = catalog.total_quantity(),
            "order log generated"
        );
        Ok(log)
    }

    fn next_order<R: Rng + ?Sized>(
        &self,
        catalog: &mut Catalog,
        rng: &mut R,
    ) -> DomainResult<Option<Order>> {
        let candidates: Vec<ItemId> = catalog.available_items().map(|item| item.id()).collect();
        let Some(&item_id) = candidates.choose(rng) else {
            return Ok(None);
        };
        let item = catalog
            .get(item_id)
            .ok_or_else(|| DomainError::not_found(format!("listing {item_id}")))?;
        let (title, price, month, in_stock) =
            (item.title().to_owned(), item.price(), item.month(), item.quantity());

        let customer_id = CustomerId::new(rng.gen_range(self.config.customer_range.inclusive()));

        // Never draw more than the listing holds, so every decrement applies.
        let counts = self.config.per_order_count_range;
        let max = counts.max.min(in_stock);
        let count = rng.gen_range(counts.min.min(max)..=max);
        let total_price = u64::from(count).checked_mul(price).ok_or_else(|| {
            DomainError::invalid_config(format!("listing {item_id}: {count} x {price} overflows"))
        })?;

        if catalog.decrement_item(item_id, count)? == StockChange::Skipped {
            return Err(DomainError::invalid_state(format!(
                "listing {item_id} could not cover {count} units"
            )));
        }

        Order::new(customer_id, title, month, count, total_price).map(Some)
    }
}
