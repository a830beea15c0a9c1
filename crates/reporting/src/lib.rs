//! Aggregation engine and report queries over a frozen order log.
//!
//! - [`aggregate`]: generic `group_reduce` primitive, reducers, top-N ranking.
//! - [`query`]: the named report queries (best sellers, per-month and
//!   per-customer series), each instrumented through a [`QueryObserver`].

pub mod aggregate;
pub mod observer;
pub mod query;

pub use aggregate::{
    Count, Mean, Point, ReduceFn, Reducer, Series, Sum, TitleTotal, distinct_sorted, group_reduce,
    rank_top_n,
};
pub use observer::{NoopObserver, QueryObserver, QueryOutcome, TracingObserver};
pub use query::{
    BestSellerSeries, CustomerReport, DEFAULT_TOP_N, ItemReport, MonthDomain, SalesQueries,
};
