//! Grouped reductions over record sequences.
//!
//! Every report series is one `group_reduce` call: pick a key, pick a value,
//! pick a reducer, and name the keys to report on. Keys of the domain that no
//! record maps to are still reported, reduced over an empty slice.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::Hash;

use serde::Serialize;

use marketsim_sales::Order;

/// Folds the values collected for one key.
pub trait Reducer<V> {
    type Output;

    fn reduce(&self, values: &[V]) -> Self::Output;
}

/// Sum of values; 0 for an empty group. Saturates at `u64::MAX`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sum;

impl Reducer<u64> for Sum {
    type Output = u64;

    fn reduce(&self, values: &[u64]) -> u64 {
        values.iter().fold(0, |acc, v| acc.saturating_add(*v))
    }
}

/// Arithmetic mean; `None` for an empty group, never a substituted default.
#[derive(Debug, Clone, Copy, Default)]
pub struct Mean;

impl Reducer<f64> for Mean {
    type Output = Option<f64>;

    fn reduce(&self, values: &[f64]) -> Option<f64> {
        if values.is_empty() {
            return None;
        }
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Number of records in the group.
#[derive(Debug, Clone, Copy, Default)]
pub struct Count;

impl<V> Reducer<V> for Count {
    type Output = usize;

    fn reduce(&self, values: &[V]) -> usize {
        values.len()
    }
}

/// Adapter for ad-hoc reducers written as closures.
#[derive(Debug, Clone, Copy)]
pub struct ReduceFn<F>(pub F);

impl<V, O, F> Reducer<V> for ReduceFn<F>
where
    F: Fn(&[V]) -> O,
{
    type Output = O;

    fn reduce(&self, values: &[V]) -> O {
        (self.0)(values)
    }
}

/// One keyed value of a series.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Point<K, V> {
    pub key: K,
    pub value: V,
}

/// Ordered key/value results, in key-domain order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Series<K, V> {
    points: Vec<Point<K, V>>,
}

impl<K, V> Series<K, V> {
    pub fn points(&self) -> &[Point<K, V>] {
        &self.points
    }

    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.points.iter().map(|p| &p.key)
    }

    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.points.iter().map(|p| &p.value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn into_points(self) -> Vec<Point<K, V>> {
        self.points
    }
}

impl<K: PartialEq, V> Series<K, V> {
    /// Value of the first point with this key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.points.iter().find(|p| &p.key == key).map(|p| &p.value)
    }
}

impl<K, V> FromIterator<(K, V)> for Series<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            points: iter
                .into_iter()
                .map(|(key, value)| Point { key, value })
                .collect(),
        }
    }
}

/// Reduce `value_fn` over the records whose `key_fn` equals each key of
/// `key_domain`, reporting keys in domain order.
///
/// The result does not depend on record order.
pub fn group_reduce<'a, T, K, V, R>(
    records: impl IntoIterator<Item = &'a T>,
    key_fn: impl Fn(&T) -> K,
    value_fn: impl Fn(&T) -> V,
    reducer: &R,
    key_domain: &[K],
) -> Series<K, R::Output>
where
    T: 'a,
    K: Eq + Hash + Clone,
    R: Reducer<V>,
{
    let wanted: HashSet<&K> = key_domain.iter().collect();
    let mut buckets: HashMap<K, Vec<V>> = HashMap::with_capacity(wanted.len());

    for record in records {
        let key = key_fn(record);
        if wanted.contains(&key) {
            buckets.entry(key).or_default().push(value_fn(record));
        }
    }

    key_domain
        .iter()
        .map(|key| {
            let values = buckets.get(key).map(Vec::as_slice).unwrap_or(&[]);
            (key.clone(), reducer.reduce(values))
        })
        .collect()
}

/// Distinct keys present in `records`, ascending.
pub fn distinct_sorted<'a, T, K>(
    records: impl IntoIterator<Item = &'a T>,
    key_fn: impl Fn(&T) -> K,
) -> Vec<K>
where
    T: 'a,
    K: Ord,
{
    records
        .into_iter()
        .map(key_fn)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Units sold for one title.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TitleTotal {
    pub title: String,
    pub total: u64,
}

/// Titles ranked by summed `count`, descending; equal totals rank by
/// ascending title. Returns at most `n` entries.
pub fn rank_top_n<'a>(records: impl IntoIterator<Item = &'a Order>, n: usize) -> Vec<TitleTotal> {
    let records: Vec<&Order> = records.into_iter().collect();
    let titles = distinct_sorted(records.iter().copied(), |o: &Order| o.title().to_owned());

    let totals = group_reduce(
        records.iter().copied(),
        |o: &Order| o.title().to_owned(),
        |o: &Order| u64::from(o.count()),
        &Sum,
        &titles,
    );

    let mut ranked: Vec<TitleTotal> = totals
        .into_points()
        .into_iter()
        .map(|p| TitleTotal {
            title: p.key,
            total: p.value,
        })
        .collect();
    ranked.sort_by(|a, b| b.total.cmp(&a.total).then_with(|| a.title.cmp(&b.title)));
    ranked.truncate(n);
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;
    use marketsim_core::{CustomerId, Month};
    use proptest::prelude::*;

    fn test_order(title: &str, count: u32) -> Order {
        Order::new(CustomerId::new(1), title, Month::new(1).unwrap(), count, u64::from(count) * 10).unwrap()
    }

    #[test]
    fn keys_without_records_reduce_the_empty_group() {
        let records = vec![(1u8, 5u64), (1, 7)];
        let domain = [1u8, 2];

        let sums = group_reduce(&records, |r| r.0, |r| r.1, &Sum, &domain);
        assert_eq!(sums.get(&1), Some(&12));
        assert_eq!(sums.get(&2), Some(&0));

        let means = group_reduce(&records, |r| r.0, |r| r.1 as f64, &Mean, &domain);
        assert_eq!(means.get(&1), Some(&Some(6.0)));
        assert_eq!(means.get(&2), Some(&None));

        let counts = group_reduce(&records, |r| r.0, |r| r.1, &Count, &domain);
        assert_eq!(counts.values().copied().collect::<Vec<_>>(), vec![2, 0]);
    }

    #[test]
    fn results_follow_domain_order_and_skip_unlisted_keys() {
        let records = vec![(3u8, 1u64), (1, 2), (2, 4)];
        let series = group_reduce(&records, |r| r.0, |r| r.1, &Sum, &[2u8, 3]);
        assert_eq!(series.keys().copied().collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(series.values().copied().collect::<Vec<_>>(), vec![4, 1]);
    }

    #[test]
    fn sum_saturates_instead_of_wrapping() {
        let values: Vec<u64> = vec![u64::MAX - 1, 5, 7];
        assert_eq!(Reducer::<u64>::reduce(&Sum, &values[..]), u64::MAX);
        assert_eq!(Reducer::<u64>::reduce(&Sum, &values[..0]), 0);
    }

    #[test]
    fn closure_reducers_are_supported() {
        let records = vec![(1u8, 5u64), (1, 9)];
        let max = ReduceFn(|values: &[u64]| values.iter().copied().max());
        let series = group_reduce(&records, |r| r.0, |r| r.1, &max, &[1u8, 2]);
        assert_eq!(series.get(&1), Some(&Some(9)));
        assert_eq!(series.get(&2), Some(&None));
    }

    #[test]
    fn distinct_sorted_dedups_ascending() {
        let records = vec![(3u8, 0u64), (1, 0), (3, 0)];
        assert_eq!(distinct_sorted(&records, |r| r.0), vec![1, 3]);
    }

    #[test]
    fn rank_breaks_ties_by_ascending_title() {
        let orders = vec![
            test_order("Item2", 4),
            test_order("Item10", 4),
            test_order("Item3", 9),
            test_order("Item1", 1),
        ];
        let ranked = rank_top_n(&orders, 3);
        let titles: Vec<&str> = ranked.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["Item3", "Item10", "Item2"]);
        assert_eq!(ranked[0].total, 9);
    }

    #[test]
    fn rank_of_empty_log_is_empty() {
        assert!(rank_top_n(&Vec::<Order>::new(), 5).is_empty());
    }

    fn shuffled_pairs() -> impl Strategy<Value = (Vec<(u8, u64)>, Vec<(u8, u64)>)> {
        prop::collection::vec((0u8..6, 0u64..1_000), 0..60)
            .prop_flat_map(|records| (Just(records.clone()), Just(records).prop_shuffle()))
    }

    proptest! {
        #![proptest_config(ProptestConfig {
            cases: 256,
            ..ProptestConfig::default()
        })]

        /// Property: permuting the input never changes per-key results.
        #[test]
        fn group_reduce_is_order_independent((records, shuffled) in shuffled_pairs()) {
            let domain: Vec<u8> = (0..6).collect();
            let a = group_reduce(&records, |r| r.0, |r| r.1, &Sum, &domain);
            let b = group_reduce(&shuffled, |r| r.0, |r| r.1, &Sum, &domain);
            prop_assert_eq!(a, b);

            let a = group_reduce(&records, |r| r.0, |r| r.1, &Count, &domain);
            let b = group_reduce(&shuffled, |r| r.0, |r| r.1, &Count, &domain);
            prop_assert_eq!(a, b);
        }
    }
}
