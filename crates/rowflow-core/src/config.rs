//! Pipeline configuration that executors hand to operators via the context.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Pipeline name used in logs and run manifests.
    pub name: String,

    /// Emit a trace event for every row crossing a branch adapter.
    pub trace_rows: bool,

    /// Upper bound on errors a branch keeps for `collect_errors`.
    pub max_collected_errors: usize,

    /// Compute a blake3 digest of the final output rows.
    pub digest_outputs: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            name: "pipeline".to_string(),
            trace_rows: false,
            max_collected_errors: 100,
            digest_outputs: true,
        }
    }
}

impl PipelineConfig {
    /// Create a config from environment variables, falling back to defaults.
    ///
    /// Environment variables:
    /// - `ROWFLOW_PIPELINE_NAME`: pipeline name
    /// - `ROWFLOW_TRACE_ROWS`: `true`/`false`
    /// - `ROWFLOW_MAX_COLLECTED_ERRORS`: cap on recorded branch errors
    /// - `ROWFLOW_DIGEST_OUTPUTS`: `true`/`false`
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(s) = std::env::var("ROWFLOW_PIPELINE_NAME") {
            cfg.name = s;
        }

        if let Ok(s) = std::env::var("ROWFLOW_TRACE_ROWS") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.trace_rows = v;
            }
        }

        if let Ok(s) = std::env::var("ROWFLOW_MAX_COLLECTED_ERRORS") {
            if let Ok(v) = s.parse::<usize>() {
                cfg.max_collected_errors = v;
            }
        }

        if let Ok(s) = std::env::var("ROWFLOW_DIGEST_OUTPUTS") {
            if let Ok(v) = s.parse::<bool>() {
                cfg.digest_outputs = v;
            }
        }

        cfg
    }

    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_fills_defaults() {
        let cfg = PipelineConfig::from_json(r#"{"name": "nightly", "trace_rows": true}"#).unwrap();
        assert_eq!(cfg.name, "nightly");
        assert!(cfg.trace_rows);
        assert_eq!(cfg.max_collected_errors, 100);
        assert!(cfg.digest_outputs);
    }

    #[test]
    fn bad_json_is_config_error() {
        let err = PipelineConfig::from_json("{").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
