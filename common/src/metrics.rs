use tracing::debug;

use crate::{record::ResultRecord, util::parse_numeric_prefix, value::ValueExt};

const TOTAL_LIQUIDO: &[&str] = &["total_liquido"];
const TOTAL_BRUTO: &[&str] = &["total_bruto"];
const P99_VALUE: &[&str] = &["p99", "valor"];
const PAYMENTS_SUCCESS: &[&str] = &["pagamentos_solicitados", "qtd_sucesso"];
const PAYMENTS_FAILURE: &[&str] = &["pagamentos_solicitados", "qtd_falha"];
const INCONSISTENCIES: &[&str] = &["multa", "composicao", "num_inconsistencias"];
const LAG: &[&str] = &["lag", "lag"];

const DEFAULT_P99: &str = "0ms";

/// The six display metrics of a single record.
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct RecordMetrics {
    pub total_liquido: f64,
    pub p99_ms: f64,
    pub success_rate_pct: f64,
    pub inconsistency_count: i64,
    pub lag: f64,
    pub total_bruto: f64,
}

impl RecordMetrics {
    pub fn from_record(record: &ResultRecord) -> Self {
        let data = &record.data;
        Self {
            total_liquido: data.f64_at(TOTAL_LIQUIDO, 0.0),
            p99_ms: p99_ms(record),
            success_rate_pct: success_rate_pct(record),
            inconsistency_count: data.i64_at(INCONSISTENCIES, 0),
            lag: data.f64_at(LAG, 0.0),
            total_bruto: data.f64_at(TOTAL_BRUTO, 0.0),
        }
    }
}

/// P99 latency in milliseconds, read from strings like `545.84ms`.
pub fn p99_ms(record: &ResultRecord) -> f64 {
    match record.data.at(P99_VALUE) {
        Some(value) if value.is_number() => value.as_f64().unwrap_or(0.0),
        _ => parse_numeric_prefix(record.data.str_at(P99_VALUE, DEFAULT_P99)),
    }
}

/// Share of requested payments that succeeded, in percent.
///
/// No requests at all gives `0.0`. Negative counters are treated as zero so
/// the result always stays within `[0, 100]`.
pub fn success_rate_pct(record: &ResultRecord) -> f64 {
    let success = record.data.f64_at(PAYMENTS_SUCCESS, 0.0).max(0.0);
    let failure = record.data.f64_at(PAYMENTS_FAILURE, 0.0).max(0.0);
    let total = success + failure;
    if total > 0.0 {
        success / total * 100.0
    } else {
        0.0
    }
}

/// Index-aligned metric columns for a version-sorted run of records.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct MetricSeries {
    pub total_liquido: Vec<f64>,
    pub p99_ms: Vec<f64>,
    pub success_rate_pct: Vec<f64>,
    pub inconsistency_count: Vec<i64>,
    pub lag: Vec<f64>,
    pub total_bruto: Vec<f64>,
}

impl MetricSeries {
    pub fn len(&self) -> usize {
        self.total_liquido.len()
    }

    pub fn is_empty(&self) -> bool {
        self.total_liquido.is_empty()
    }

    fn push(&mut self, m: RecordMetrics) {
        self.total_liquido.push(m.total_liquido);
        self.p99_ms.push(m.p99_ms);
        self.success_rate_pct.push(m.success_rate_pct);
        self.inconsistency_count.push(m.inconsistency_count);
        self.lag.push(m.lag);
        self.total_bruto.push(m.total_bruto);
    }
}

impl FromIterator<RecordMetrics> for MetricSeries {
    fn from_iter<I: IntoIterator<Item = RecordMetrics>>(iter: I) -> Self {
        let mut series = MetricSeries::default();
        for m in iter {
            series.push(m);
        }
        series
    }
}

pub fn extract_metrics(records: &[ResultRecord]) -> MetricSeries {
    let series: MetricSeries = records.iter().map(RecordMetrics::from_record).collect();
    debug!("Extracted metric series for {} records", series.len());
    series
}
