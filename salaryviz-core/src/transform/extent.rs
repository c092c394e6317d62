use ahash::RandomState;
use itertools::Itertools;
use ordered_float::OrderedFloat;
use std::collections::HashSet;

/// Minimum and maximum of the finite values, `None` when there are none
pub fn extent(values: &[f64]) -> Option<[f64; 2]> {
    extent_by(values, |v| *v)
}

pub fn extent_by<T, F>(items: &[T], f: F) -> Option<[f64; 2]>
where
    F: Fn(&T) -> f64,
{
    match items
        .iter()
        .map(f)
        .filter(|v| v.is_finite())
        .map(OrderedFloat)
        .minmax()
    {
        itertools::MinMaxResult::NoElements => None,
        itertools::MinMaxResult::OneElement(v) => Some([v.0, v.0]),
        itertools::MinMaxResult::MinMax(lo, hi) => Some([lo.0, hi.0]),
    }
}

/// Distinct values in first-seen order
pub fn distinct<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen: HashSet<&str, RandomState> = HashSet::default();
    values
        .into_iter()
        .filter(|v| seen.insert(*v))
        .map(String::from)
        .collect()
}
