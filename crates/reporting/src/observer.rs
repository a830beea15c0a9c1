//! Query instrumentation hooks.
//!
//! The query façade reports every public query to an explicitly supplied
//! observer. No observer state is global.

use std::sync::Arc;
use std::time::Duration;

/// How a query ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOutcome {
    Ok,
    NotFound,
    Failed,
}

pub trait QueryObserver {
    fn query_started(&self, _query: &'static str) {}

    fn query_finished(&self, _query: &'static str, _outcome: QueryOutcome, _elapsed: Duration) {}
}

/// Emits one `tracing` event per finished query.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingObserver;

impl QueryObserver for TracingObserver {
    fn query_started(&self, query: &'static str) {
        tracing::debug!(query, "query started");
    }

    fn query_finished(&self, query: &'static str, outcome: QueryOutcome, elapsed: Duration) {
        let elapsed_us = elapsed.as_micros() as u64;
        match outcome {
            QueryOutcome::Ok => tracing::info!(query, elapsed_us, "query completed"),
            QueryOutcome::NotFound => tracing::warn!(query, elapsed_us, "query matched nothing"),
            QueryOutcome::Failed => tracing::error!(query, elapsed_us, "query failed"),
        }
    }
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl QueryObserver for NoopObserver {}

impl<O> QueryObserver for &O
where
    O: QueryObserver + ?Sized,
{
    fn query_started(&self, query: &'static str) {
        (**self).query_started(query)
    }

    fn query_finished(&self, query: &'static str, outcome: QueryOutcome, elapsed: Duration) {
        (**self).query_finished(query, outcome, elapsed)
    }
}

impl<O> QueryObserver for Arc<O>
where
    O: QueryObserver + ?Sized,
{
    fn query_started(&self, query: &'static str) {
        (**self).query_started(query)
    }

    fn query_finished(&self, query: &'static str, outcome: QueryOutcome, elapsed: Duration) {
        (**self).query_finished(query, outcome, elapsed)
    }
}
