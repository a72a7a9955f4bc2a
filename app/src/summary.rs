use common::{metrics::RecordMetrics, record::ResultRecord, util::format_thousands};

pub fn summary_line(record: &ResultRecord) -> String {
    let m = RecordMetrics::from_record(record);
    format!(
        "v{}: Líquido={}, P99={:.1}ms, Success={:.1}%",
        record.version,
        format_thousands(m.total_liquido, 0),
        m.p99_ms,
        m.success_rate_pct
    )
}

/// Console summary in version order. Nothing is produced for an empty run.
pub fn render_summary(records: &[ResultRecord]) -> String {
    if records.is_empty() {
        return String::new();
    }
    let mut out = format!("\n📊 Summary of {} results:\n{}\n", records.len(), "-".repeat(50));
    for record in records {
        out.push_str(&summary_line(record));
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(filename: &str, data: serde_json::Value) -> ResultRecord {
        ResultRecord::new(filename, data.as_object().cloned().unwrap())
    }

    #[test]
    fn line_format() {
        let r = record(
            "partial-results-v2.13.json",
            json!({
                "total_liquido": 354231.7,
                "p99": {"valor": "545.84ms"},
                "pagamentos_solicitados": {"qtd_sucesso": 3, "qtd_falha": 1}
            }),
        );
        assert_eq!(
            summary_line(&r),
            "v2.13: Líquido=354,232, P99=545.8ms, Success=75.0%"
        );
    }

    #[test]
    fn defaults_in_line() {
        let r = record("baseline.json", json!({}));
        assert_eq!(
            summary_line(&r),
            "vunknown: Líquido=0, P99=0.0ms, Success=0.0%"
        );
    }

    #[test]
    fn empty_summary() {
        assert!(render_summary(&[]).is_empty());
    }

    #[test]
    fn summary_keeps_order() {
        let records = vec![
            record("v1.0.json", json!({"total_liquido": 1000})),
            record("v1.1.json", json!({"total_liquido": 2000})),
        ];
        let text = render_summary(&records);
        assert!(text.contains("Summary of 2 results"));
        let first = text.find("v1.0:").unwrap();
        let second = text.find("v1.1:").unwrap();
        assert!(first < second);
        assert!(text.contains("Líquido=2,000"));
    }
}
