use crate::core::TableProbe;
use crate::domain::model::ProbeOutcome;
use crate::utils::error::ToolError;
use regex::Regex;

/// SQL state for an undefined table.
pub const UNDEFINED_TABLE_CODE: &str = "42P01";
/// PostgREST's "table not in schema cache" code.
pub const SCHEMA_CACHE_MISS_CODE: &str = "PGRST205";

/// Counts the rows of `table` and classifies any failure.
pub async fn probe_table<P: TableProbe + ?Sized>(probe: &P, table: &str) -> ProbeOutcome {
    match probe.count_rows(table).await {
        Ok(count) => {
            tracing::info!("✅ Table '{}' exists with {} row(s)", table, count);
            ProbeOutcome::Exists { count }
        }
        Err(e) => {
            let outcome = classify_failure(table, &e);
            match &outcome {
                ProbeOutcome::Missing => tracing::warn!("❌ Table '{}' does not exist", table),
                _ => tracing::error!("⚠️ Could not check table '{}': {}", table, e),
            }
            outcome
        }
    }
}

/// Matches the rendered error against the known "relation does not exist"
/// signatures. Anything else is unclassified.
pub fn classify_failure(table: &str, error: &ToolError) -> ProbeOutcome {
    let text = error.to_string();

    let by_code = text.contains(UNDEFINED_TABLE_CODE) || text.contains(SCHEMA_CACHE_MISS_CODE);
    let by_message = relation_missing_pattern(table)
        .map(|re| re.is_match(&text))
        .unwrap_or(false);

    if by_code || by_message {
        ProbeOutcome::Missing
    } else {
        ProbeOutcome::Unclassified { message: text }
    }
}

fn relation_missing_pattern(table: &str) -> Option<Regex> {
    Regex::new(&format!(
        r#"relation "(?:[A-Za-z0-9_]+\.)?{}" does not exist"#,
        regex::escape(table)
    ))
    .ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::Result;
    use async_trait::async_trait;

    struct FixedProbe(fn() -> Result<u64>);

    #[async_trait]
    impl TableProbe for FixedProbe {
        async fn count_rows(&self, _table: &str) -> Result<u64> {
            (self.0)()
        }
    }

    fn remote(code: Option<&str>, message: &str) -> ToolError {
        ToolError::RemoteQueryError {
            status: 404,
            code: code.map(str::to_string),
            message: message.to_string(),
        }
    }

    #[test]
    fn test_classifies_sql_state() {
        let err = remote(Some("42P01"), "something went wrong");
        assert_eq!(
            classify_failure("production_orders", &err),
            ProbeOutcome::Missing
        );
    }

    #[test]
    fn test_classifies_relation_message() {
        let err = ToolError::processing("relation \"production_orders\" does not exist");
        assert_eq!(
            classify_failure("production_orders", &err),
            ProbeOutcome::Missing
        );

        let qualified = remote(None, "relation \"public.production_orders\" does not exist");
        assert_eq!(
            classify_failure("production_orders", &qualified),
            ProbeOutcome::Missing
        );
    }

    #[test]
    fn test_other_relation_is_unclassified() {
        let err = remote(None, "relation \"stock_items\" does not exist");
        assert!(matches!(
            classify_failure("production_orders", &err),
            ProbeOutcome::Unclassified { .. }
        ));
    }

    #[test]
    fn test_permission_error_is_unclassified() {
        let err = remote(Some("42501"), "permission denied for table production_orders");
        match classify_failure("production_orders", &err) {
            ProbeOutcome::Unclassified { message } => assert!(message.contains("permission denied")),
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[test]
    fn test_probe_table_reports_count() {
        let probe = FixedProbe(|| Ok(0));
        let outcome = tokio_test::block_on(probe_table(&probe, "production_orders"));
        assert_eq!(outcome, ProbeOutcome::Exists { count: 0 });
    }

    #[test]
    fn test_probe_table_reports_missing() {
        let probe = FixedProbe(|| {
            Err(ToolError::RemoteQueryError {
                status: 404,
                code: Some("PGRST205".to_string()),
                message: "Could not find the table 'public.production_orders' in the schema cache"
                    .to_string(),
            })
        });
        let outcome = tokio_test::block_on(probe_table(&probe, "production_orders"));
        assert_eq!(outcome, ProbeOutcome::Missing);
    }
}
