use crate::models::{AlignedSeries, SummaryStat};
use serde_json::Value;
use std::collections::HashMap;

/// A value from a sparse series that may or may not carry an observation.
///
/// `None` means "no observation", which is different from an observed zero.
pub trait Observation {
    fn observed(&self) -> Option<f64>;
}

impl Observation for f64 {
    fn observed(&self) -> Option<f64> {
        self.is_finite().then_some(*self)
    }
}

impl Observation for u64 {
    fn observed(&self) -> Option<f64> {
        Some(*self as f64)
    }
}

impl Observation for i64 {
    fn observed(&self) -> Option<f64> {
        Some(*self as f64)
    }
}

impl Observation for str {
    fn observed(&self) -> Option<f64> {
        let trimmed = self.trim();
        if trimmed.is_empty() {
            return None;
        }
        trimmed.parse::<f64>().ok().and_then(|n| n.observed())
    }
}

impl Observation for String {
    fn observed(&self) -> Option<f64> {
        self.as_str().observed()
    }
}

impl Observation for Value {
    fn observed(&self) -> Option<f64> {
        match self {
            Value::Number(n) => n.as_f64().and_then(|n| n.observed()),
            Value::String(s) => s.observed(),
            _ => None,
        }
    }
}

impl<T: Observation> Observation for Option<T> {
    fn observed(&self) -> Option<f64> {
        self.as_ref().and_then(Observation::observed)
    }
}

impl<T: Observation + ?Sized> Observation for &T {
    fn observed(&self) -> Option<f64> {
        (**self).observed()
    }
}

/// Places a sparse series onto `target_axis`.
///
/// The result always has `target_axis.len()` entries. Labels without a usable
/// value come out as `None`. When a label repeats in the sparse input the last
/// usable value wins. Entries past the shorter of `sparse_labels` and
/// `sparse_values` are ignored.
pub fn align<A, L, V>(target_axis: &[A], sparse_labels: &[L], sparse_values: &[V]) -> AlignedSeries
where
    A: AsRef<str>,
    L: AsRef<str>,
    V: Observation,
{
    let mut lookup: HashMap<&str, f64> = HashMap::with_capacity(sparse_labels.len());
    for (label, value) in sparse_labels.iter().zip(sparse_values) {
        if let Some(n) = value.observed() {
            lookup.insert(label.as_ref(), n);
        }
    }

    target_axis
        .iter()
        .map(|label| lookup.get(label.as_ref()).copied())
        .collect()
}

pub fn summarize(aligned: &[Option<f64>]) -> SummaryStat {
    let mut total = 0.0;
    let mut count = 0usize;
    for value in aligned.iter().filter_map(|v| v.observed()) {
        total += value;
        count += 1;
    }

    let average = if count == 0 { 0.0 } else { total / count as f64 };

    SummaryStat {
        total,
        count_of_non_empty_buckets: count,
        average,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn values(raw: Value) -> Vec<Value> {
        raw.as_array().cloned().unwrap_or_default()
    }

    #[test]
    fn align_keeps_target_length() {
        let axis = ["a", "b", "c", "d"];
        assert_eq!(align(&axis, &["x"], &[1.0_f64]).len(), 4);
        assert_eq!(align(&axis, &[] as &[&str], &[] as &[f64]).len(), 4);
        assert_eq!(align(&axis, &["a", "b", "c", "d", "e", "f"], &[1.0_f64; 6]).len(), 4);
    }

    #[test]
    fn align_exact_match_is_identity() {
        let axis = ["2024-01-01", "2024-01-02"];
        let aligned = align(&axis, &axis, &values(json!([3, 5])));
        assert_eq!(aligned, vec![Some(3.0), Some(5.0)]);
    }

    #[test]
    fn align_fills_gaps_with_none() {
        let axis = ["2024-01-01", "2024-01-02", "2024-01-03"];
        let aligned = align(&axis, &["2024-01-02"], &values(json!([7])));
        assert_eq!(aligned, vec![None, Some(7.0), None]);
    }

    #[test]
    fn align_treats_null_as_absent_and_zero_as_observed() {
        let aligned = align(&["A", "B", "C"], &["A", "B", "C"], &values(json!([null, 4, 0])));
        assert_eq!(aligned, vec![None, Some(4.0), Some(0.0)]);
    }

    #[test]
    fn align_last_duplicate_wins() {
        let aligned = align(&["A"], &["A", "A"], &values(json!([1, 2])));
        assert_eq!(aligned, vec![Some(2.0)]);
    }

    #[test]
    fn align_null_duplicate_does_not_erase_earlier_value() {
        let aligned = align(&["A"], &["A", "A"], &values(json!([1, null])));
        assert_eq!(aligned, vec![Some(1.0)]);
    }

    #[test]
    fn align_coerces_numeric_strings_and_drops_garbage() {
        let raw = values(json!([" 6 ", "abc", {"n": 1}, [2], true, "", "1e1"]));
        let labels = ["a", "b", "c", "d", "e", "f", "g"];
        let aligned = align(&labels, &labels, &raw);
        assert_eq!(
            aligned,
            vec![Some(6.0), None, None, None, None, None, Some(10.0)]
        );
    }

    #[test]
    fn align_drops_non_finite_floats() {
        let labels = ["a", "b", "c"];
        let aligned = align(&labels, &labels, &[f64::NAN, f64::INFINITY, 2.5]);
        assert_eq!(aligned, vec![None, None, Some(2.5)]);

        let strings = align(&labels, &labels, &["NaN", "inf", "-3"]);
        assert_eq!(strings, vec![None, None, Some(-3.0)]);
    }

    #[test]
    fn align_truncates_mismatched_lengths() {
        let axis = ["a", "b", "c"];
        let short_values = align(&axis, &["a", "b", "c"], &[1u64]);
        assert_eq!(short_values, vec![Some(1.0), None, None]);

        let short_labels = align(&axis, &["b"], &[1u64, 2, 3]);
        assert_eq!(short_labels, vec![None, Some(1.0), None]);
    }

    #[test]
    fn align_accepts_optional_values() {
        let axis = ["a", "b"];
        let aligned = align(&axis, &axis, &[Some(2u64), None]);
        assert_eq!(aligned, vec![Some(2.0), None]);
    }

    #[test]
    fn align_does_not_touch_inputs() {
        let axis = vec!["b".to_string(), "a".to_string()];
        let labels = vec!["a".to_string(), "b".to_string()];
        let raw = values(json!([1, 2]));
        let _ = align(&axis, &labels, &raw);
        assert_eq!(axis, vec!["b", "a"]);
        assert_eq!(labels, vec!["a", "b"]);
        assert_eq!(raw, values(json!([1, 2])));
    }

    #[test]
    fn summarize_skips_gaps_in_denominator() {
        let stat = summarize(&[None, Some(5.0), None, Some(7.0)]);
        assert_eq!(stat.total, 12.0);
        assert_eq!(stat.count_of_non_empty_buckets, 2);
        assert_eq!(stat.average, 6.0);
    }

    #[test]
    fn summarize_without_data_averages_zero() {
        let stat = summarize(&[None, None]);
        assert_eq!(stat.total, 0.0);
        assert_eq!(stat.count_of_non_empty_buckets, 0);
        assert_eq!(stat.average, 0.0);

        let empty = summarize(&[]);
        assert_eq!(empty.average, 0.0);
    }

    #[test]
    fn summarize_counts_observed_zero() {
        let stat = summarize(&[Some(0.0), Some(4.0), Some(f64::NAN)]);
        assert_eq!(stat.total, 4.0);
        assert_eq!(stat.count_of_non_empty_buckets, 2);
        assert_eq!(stat.average, 2.0);
    }
}
