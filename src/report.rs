use crate::align::{align, summarize};
use crate::models::{
    AlignedCounts, AlignedStatisticsResponse, AlignedSummary, BucketLabel, StatisticsResponse,
    SummaryStat, SummaryText,
};
use crate::query::Period;

/// Whole numbers print without decimals, anything else with two.
pub fn format_average(value: f64) -> String {
    if !value.is_finite() {
        return "0".to_string();
    }
    let rounded = value.round();
    if (value - rounded).abs() < 1e-9 {
        format!("{}", rounded as i64)
    } else {
        format!("{value:.2}")
    }
}

pub fn summary_line(stat: &SummaryStat, unit: &str) -> String {
    let buckets = stat.count_of_non_empty_buckets;
    let plural = if buckets == 1 { "" } else { "s" };
    format!(
        "average {} per {unit} (total {}, computed from {buckets} {unit}{plural} with data)",
        format_average(stat.average),
        format_average(stat.total),
    )
}

/// Lays a sparse statistics response onto `axis` and summarises both series.
pub fn aligned_report(period: Period, axis: &[BucketLabel], sparse: &StatisticsResponse) -> AlignedStatisticsResponse {
    let eat = align(axis, &sparse.labels, &sparse.series.eat_count);
    let excrete = align(axis, &sparse.labels, &sparse.series.excrete_count);
    let eat_stat = summarize(&eat);
    let excrete_stat = summarize(&excrete);
    let unit = period.unit();

    AlignedStatisticsResponse {
        period: period.as_str().to_string(),
        unit: unit.to_string(),
        labels: axis.to_vec(),
        series: AlignedCounts {
            eat_count: eat,
            excrete_count: excrete,
        },
        summary: AlignedSummary {
            eat_count: eat_stat,
            excrete_count: excrete_stat,
        },
        text: SummaryText {
            eat: summary_line(&eat_stat, unit),
            excrete: summary_line(&excrete_stat, unit),
        },
    }
}
