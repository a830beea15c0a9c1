//! Named report queries over a frozen order log.

use std::time::Instant;

use serde::Serialize;

use marketsim_core::{CustomerId, DomainError, DomainResult, Month};
use marketsim_sales::{Order, OrderLog};

use crate::aggregate::{Mean, Reducer, Series, Sum, TitleTotal, distinct_sorted, group_reduce, rank_top_n};
use crate::observer::{QueryObserver, QueryOutcome, TracingObserver};

/// Number of best sellers reports show unless told otherwise.
pub const DEFAULT_TOP_N: usize = 5;

/// Which months a per-month series reports on.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum MonthDomain {
    /// Months present in the filtered orders, ascending.
    #[default]
    Observed,
    /// January through December.
    Calendar,
    Explicit(Vec<Month>),
}

impl MonthDomain {
    fn resolve(&self, orders: &[&Order]) -> Vec<Month> {
        match self {
            MonthDomain::Observed => distinct_sorted(orders.iter().copied(), Order::month),
            MonthDomain::Calendar => Month::calendar().collect(),
            MonthDomain::Explicit(months) => months.clone(),
        }
    }
}

/// Per-month sales and purchase amounts for one best seller.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BestSellerSeries {
    pub title: String,
    pub total: u64,
    pub sales_per_month: Series<Month, u64>,
    pub purchases_per_month: Series<Month, u64>,
}

/// Everything the single-item view shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemReport {
    pub title: String,
    pub sales_per_month: Series<Month, u64>,
    pub purchases_per_month: Series<Month, u64>,
    pub mean_price_per_month: Series<Month, Option<f64>>,
}

/// Everything the customer view shows.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerReport {
    pub customer_id: CustomerId,
    pub orders_per_month: Series<Month, u64>,
    pub amount_per_month: Series<Month, u64>,
    pub amount_per_item: Series<String, u64>,
}

/// Read-only query façade over a frozen [`OrderLog`].
///
/// Each public query runs inside a `query` span and is reported to the
/// observer. Failures are per query and never touch the log.
#[derive(Debug)]
pub struct SalesQueries<'a, O = TracingObserver> {
    log: &'a OrderLog,
    observer: O,
}

impl<'a, O> SalesQueries<'a, O>
where
    O: QueryObserver,
{
    pub fn new(log: &'a OrderLog, observer: O) -> DomainResult<Self> {
        if !log.is_frozen() {
            return Err(DomainError::invalid_state(
                "order log must be frozen before querying",
            ));
        }
        Ok(Self { log, observer })
    }

    pub fn log(&self) -> &'a OrderLog {
        self.log
    }

    /// Best sellers by units sold (ties: ascending title).
    pub fn top_sellers(&self, n: usize) -> DomainResult<Vec<TitleTotal>> {
        self.observe("top_sellers", || Ok(rank_top_n(self.log.as_records(), n)))
    }

    /// Units sold per month for one item.
    pub fn item_sales_per_month(
        &self,
        title: &str,
        domain: &MonthDomain,
    ) -> DomainResult<Series<Month, u64>> {
        self.observe("item_sales_per_month", || {
            let orders = self.item_orders(title)?;
            Ok(per_month(&orders, domain, units, &Sum))
        })
    }

    /// Amount spent per month on one item.
    pub fn item_purchases_per_month(
        &self,
        title: &str,
        domain: &MonthDomain,
    ) -> DomainResult<Series<Month, u64>> {
        self.observe("item_purchases_per_month", || {
            let orders = self.item_orders(title)?;
            Ok(per_month(&orders, domain, amount, &Sum))
        })
    }

    /// Mean unit price per month for one item. Months without orders are `None`.
    pub fn item_mean_price_per_month(
        &self,
        title: &str,
        domain: &MonthDomain,
    ) -> DomainResult<Series<Month, Option<f64>>> {
        self.observe("item_mean_price_per_month", || {
            let orders = self.item_orders(title)?;
            Ok(per_month(&orders, domain, Order::unit_price, &Mean))
        })
    }

    /// Units bought per month by one customer.
    pub fn customer_orders_per_month(
        &self,
        customer_id: CustomerId,
        domain: &MonthDomain,
    ) -> DomainResult<Series<Month, u64>> {
        self.observe("customer_orders_per_month", || {
            let orders = self.customer_orders(customer_id)?;
            Ok(per_month(&orders, domain, units, &Sum))
        })
    }

    /// Amount spent per month by one customer.
    pub fn customer_amount_per_month(
        &self,
        customer_id: CustomerId,
        domain: &MonthDomain,
    ) -> DomainResult<Series<Month, u64>> {
        self.observe("customer_amount_per_month", || {
            let orders = self.customer_orders(customer_id)?;
            Ok(per_month(&orders, domain, amount, &Sum))
        })
    }

    /// Amount spent per item by one customer, titles ascending.
    pub fn customer_amount_per_item(
        &self,
        customer_id: CustomerId,
    ) -> DomainResult<Series<String, u64>> {
        self.observe("customer_amount_per_item", || {
            let orders = self.customer_orders(customer_id)?;
            Ok(per_title(&orders))
        })
    }

    /// Top `n` sellers, each with its sales and purchase series.
    pub fn best_seller_report(
        &self,
        n: usize,
        domain: &MonthDomain,
    ) -> DomainResult<Vec<BestSellerSeries>> {
        self.observe("best_seller_report", || {
            rank_top_n(self.log.as_records(), n)
                .into_iter()
                .map(|best| -> DomainResult<BestSellerSeries> {
                    let orders = self.item_orders(&best.title)?;
                    Ok(BestSellerSeries {
                        sales_per_month: per_month(&orders, domain, units, &Sum),
                        purchases_per_month: per_month(&orders, domain, amount, &Sum),
                        title: best.title,
                        total: best.total,
                    })
                })
                .collect()
        })
    }

    pub fn item_report(&self, title: &str, domain: &MonthDomain) -> DomainResult<ItemReport> {
        self.observe("item_report", || {
            let orders = self.item_orders(title)?;
            Ok(ItemReport {
                title: title.to_owned(),
                sales_per_month: per_month(&orders, domain, units, &Sum),
                purchases_per_month: per_month(&orders, domain, amount, &Sum),
                mean_price_per_month: per_month(&orders, domain, Order::unit_price, &Mean),
            })
        })
    }

    pub fn customer_report(
        &self,
        customer_id: CustomerId,
        domain: &MonthDomain,
    ) -> DomainResult<CustomerReport> {
        self.observe("customer_report", || {
            let orders = self.customer_orders(customer_id)?;
            Ok(CustomerReport {
                customer_id,
                orders_per_month: per_month(&orders, domain, units, &Sum),
                amount_per_month: per_month(&orders, domain, amount, &Sum),
                amount_per_item: per_title(&orders),
            })
        })
    }

    fn observe<T>(
        &self,
        query: &'static str,
        run: impl FnOnce() -> DomainResult<T>,
    ) -> DomainResult<T> {
        let span = tracing::info_span!("query", name = query);
        let _guard = span.enter();

        self.observer.query_started(query);
        let started = Instant::now();
        let result = run();
        let outcome = match &result {
            Ok(_) => QueryOutcome::Ok,
            Err(DomainError::NotFound(_)) => QueryOutcome::NotFound,
            Err(_) => QueryOutcome::Failed,
        };
        self.observer.query_finished(query, outcome, started.elapsed());
        result
    }

    fn item_orders(&self, title: &str) -> DomainResult<Vec<&'a Order>> {
        let orders: Vec<&Order> = self.log.as_records().filter(|o| o.title() == title).collect();
        if orders.is_empty() {
            return Err(DomainError::not_found(format!("item {title}")));
        }
        Ok(orders)
    }

    fn customer_orders(&self, customer_id: CustomerId) -> DomainResult<Vec<&'a Order>> {
        let orders: Vec<&Order> = self
            .log
            .as_records()
            .filter(|o| o.customer_id() == customer_id)
            .collect();
        if orders.is_empty() {
            return Err(DomainError::not_found(format!("customer {customer_id}")));
        }
        Ok(orders)
    }
}

fn units(order: &Order) -> u64 {
    u64::from(order.count())
}

fn amount(order: &Order) -> u64 {
    order.total_price()
}

fn per_month<V, R>(
    orders: &[&Order],
    domain: &MonthDomain,
    value_fn: impl Fn(&Order) -> V,
    reducer: &R,
) -> Series<Month, R::Output>
where
    R: Reducer<V>,
{
    let months = domain.resolve(orders);
    group_reduce(orders.iter().copied(), Order::month, value_fn, reducer, &months)
}

fn per_title(orders: &[&Order]) -> Series<String, u64> {
    let title = |o: &Order| o.title().to_owned();
    let titles = distinct_sorted(orders.iter().copied(), title);
    group_reduce(orders.iter().copied(), title, amount, &Sum, &titles)
}
