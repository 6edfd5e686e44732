use hoopsnap::rankings::rank_and_filter;

#[derive(Debug, Clone, PartialEq)]
struct Row {
    name: &'static str,
    sample: f64,
    metric: Option<f64>,
}

fn row(name: &'static str, sample: f64, metric: Option<f64>) -> Row {
    Row {
        name,
        sample,
        metric,
    }
}

fn names(rows: &[Row]) -> Vec<&'static str> {
    rows.iter().map(|r| r.name).collect()
}

#[test]
fn gate_applies_before_sort_and_is_strict() {
    let rows = vec![
        row("under", 10.0, Some(99.0)),
        row("exact", 20.0, Some(98.0)),
        row("over", 30.0, Some(1.0)),
    ];
    let ranked = rank_and_filter(rows, |r| r.sample, 20.0, |r| r.metric);
    // Only a sample strictly above the threshold survives, no matter how
    // strong the metric.
    assert_eq!(names(&ranked), ["over"]);
}

#[test]
fn sorts_descending_by_metric() {
    let rows = vec![
        row("mid", 100.0, Some(5.0)),
        row("top", 100.0, Some(9.0)),
        row("low", 100.0, Some(1.0)),
    ];
    let ranked = rank_and_filter(rows, |r| r.sample, 0.0, |r| r.metric);
    assert_eq!(names(&ranked), ["top", "mid", "low"]);

    for pair in ranked.windows(2) {
        assert!(pair[0].metric >= pair[1].metric);
    }
}

#[test]
fn ties_preserve_input_order() {
    let rows = vec![
        row("first", 100.0, Some(7.0)),
        row("second", 100.0, Some(7.0)),
        row("third", 100.0, Some(7.0)),
        row("ahead", 100.0, Some(8.0)),
    ];
    let ranked = rank_and_filter(rows, |r| r.sample, 0.0, |r| r.metric);
    assert_eq!(names(&ranked), ["ahead", "first", "second", "third"]);
}

#[test]
fn missing_metrics_order_last() {
    let rows = vec![
        row("blank", 100.0, None),
        row("valued", 100.0, Some(0.1)),
        row("also_blank", 100.0, None),
    ];
    let ranked = rank_and_filter(rows, |r| r.sample, 0.0, |r| r.metric);
    assert_eq!(names(&ranked), ["valued", "blank", "also_blank"]);
}

#[test]
fn all_rows_gated_yields_an_empty_table() {
    let rows = vec![row("a", 1.0, Some(5.0)), row("b", 2.0, Some(6.0))];
    let ranked = rank_and_filter(rows, |r| r.sample, 50.0, |r| r.metric);
    assert!(ranked.is_empty());
}
