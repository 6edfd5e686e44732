use std::cmp::Ordering;

/// Gate rows by sample size, then sort descending by the metric.
///
/// The gate runs before the sort. The sort is stable, so tied rows keep
/// their input order, and rows with no metric value order last.
pub fn rank_and_filter<T>(
    mut rows: Vec<T>,
    sample: impl Fn(&T) -> f64,
    min_sample: f64,
    metric: impl Fn(&T) -> Option<f64>,
) -> Vec<T> {
    rows.retain(|row| sample(row) > min_sample);
    rows.sort_by(|a, b| descending(metric(a), metric(b)));
    rows
}

fn descending(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.partial_cmp(&x).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
