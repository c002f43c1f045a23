//! Storage path construction
//!
//! Every output lives at `<prefix>/<component>/<stage>/<runId>`. The
//! `(component, stage)` pair keeps chains of the same run apart, and the run
//! id keeps concurrent runs apart.

/// `prefix/component/stage/run_id`
pub fn storage_path(prefix: &str, component: &str, stage: &str, run_id: &str) -> String {
    format!("{prefix}/{component}/{stage}/{run_id}")
}

/// Input glob that matches every object written under `path`
pub fn wildcard(path: &str) -> String {
    format!("{path}/*")
}

/// BigQuery table spec `project:dataset.table_runId`. Dashes are not valid in
/// table names, so they are folded to underscores.
pub fn bigquery_table(dataset: &str, table: &str, run_id: &str) -> String {
    let run_id = run_id.replace('-', "_");
    format!("{dataset}.{table}_{run_id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_path_layout() {
        assert_eq!(
            storage_path("gs://bucket", "AvroExample", "specificOut", "abc123"),
            "gs://bucket/AvroExample/specificOut/abc123"
        );
    }

    #[test]
    fn test_wildcard_suffix() {
        assert_eq!(wildcard("gs://b/C/s/r"), "gs://b/C/s/r/*");
    }

    #[test]
    fn test_distinct_stage_yields_distinct_path() {
        let a = storage_path("gs://b", "AvroExample", "specificOut", "r");
        let b = storage_path("gs://b", "AvroExample", "typedOut", "r");
        let c = storage_path("gs://b", "ParquetExample", "typedOut", "r");
        assert_ne!(a, b);
        assert_ne!(b, c);
    }

    #[test]
    fn test_bigquery_table() {
        assert_eq!(
            bigquery_table("proj:ds", "typed_bigquery_tornadoes", "run-1"),
            "proj:ds.typed_bigquery_tornadoes_run_1"
        );
    }
}
