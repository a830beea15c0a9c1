use marketsim_core::{DomainError, DomainResult};

use crate::order::Order;

/// Order log lifecycle. `Building -> Frozen` is one-way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogPhase {
    Building,
    Frozen,
}

/// Append-only sequence of generated orders.
///
/// Insertion order is kept for index-based persistence; aggregation never
/// depends on it. Once frozen the log is read-only for the rest of its life.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderLog {
    orders: Vec<Order>,
    phase: LogPhase,
}

impl OrderLog {
    pub fn new() -> Self {
        Self {
            orders: Vec::new(),
            phase: LogPhase::Building,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            orders: Vec::with_capacity(capacity),
            phase: LogPhase::Building,
        }
    }

    /// Read-only log over already-generated records (e.g. loaded from disk).
    pub fn frozen(orders: Vec<Order>) -> Self {
        Self {
            orders,
            phase: LogPhase::Frozen,
        }
    }

    pub fn phase(&self) -> LogPhase {
        self.phase
    }

    pub fn is_frozen(&self) -> bool {
        self.phase == LogPhase::Frozen
    }

    pub fn append(&mut self, order: Order) -> DomainResult<()> {
        if self.is_frozen() {
            return Err(DomainError::invalid_state("cannot append to a frozen order log"));
        }
        self.orders.push(order);
        Ok(())
    }

    /// Make the log read-only. Freezing twice is harmless.
    pub fn freeze(&mut self) {
        self.phase = LogPhase::Frozen;
    }

    pub fn as_records(&self) -> impl ExactSizeIterator<Item = &Order> + Clone + '_ {
        self.orders.iter()
    }

    pub fn as_slice(&self) -> &[Order] {
        &self.orders
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

impl Default for OrderLog {
    fn default() -> Self {
        Self::new()
    }
}
