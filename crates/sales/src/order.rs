use serde::{Deserialize, Serialize};

use marketsim_core::{CustomerId, DomainError, DomainResult, Month, Record, ValueObject};

/// A single purchase record.
///
/// Field names are part of the external contract: persisted columns and chart
/// consumers key into `customer_id`, `title`, `month`, `count`, `total_price`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawOrder")]
pub struct Order {
    customer_id: CustomerId,
    title: String,
    month: Month,
    count: u32,
    /// `count * unit price` at purchase time, in smallest currency unit.
    total_price: u64,
}

impl Order {
    pub fn new(
        customer_id: CustomerId,
        title: impl Into<String>,
        month: Month,
        count: u32,
        total_price: u64,
    ) -> DomainResult<Self> {
        if count == 0 {
            return Err(DomainError::invalid_config("order count must be positive"));
        }
        Ok(Self {
            customer_id,
            title: title.into(),
            month,
            count,
            total_price,
        })
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn month(&self) -> Month {
        self.month
    }

    pub fn count(&self) -> u32 {
        self.count
    }

    pub fn total_price(&self) -> u64 {
        self.total_price
    }

    /// Price paid per unit (`total_price / count`).
    pub fn unit_price(&self) -> f64 {
        self.total_price as f64 / f64::from(self.count)
    }
}

/// Wire shape of an [`Order`]; decoding goes through [`Order::new`].
#[derive(Deserialize)]
struct RawOrder {
    customer_id: CustomerId,
    title: String,
    month: Month,
    count: u32,
    total_price: u64,
}

impl TryFrom<RawOrder> for Order {
    type Error = DomainError;

    fn try_from(raw: RawOrder) -> DomainResult<Self> {
        Order::new(raw.customer_id, raw.title, raw.month, raw.count, raw.total_price)
    }
}

impl ValueObject for Order {}

impl Record for Order {
    const FIELDS: &'static [&'static str] = &["customer_id", "title", "month", "count", "total_price"];
}

impl core::fmt::Display for Order {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "customer_id = {}, title = {}, month = {}, count = {}, total_price = {}",
            self.customer_id, self.title, self.month, self.count, self.total_price
        )
    }
}
