//! Analysis configuration.

use serde::{Deserialize, Serialize};

use crate::aggregate::LineageConfig;
use crate::{Error, Result};

/// Default minimum number of distinct referencing documents for a bridge.
pub const DEFAULT_BRIDGE_THRESHOLD: usize = 3;

/// Series assigned to entries no series registration claims.
pub const DEFAULT_SERIES: &str = "Foundation";

/// Settings for the multi-document path.
///
/// Every field has a default, so `{}` is a valid configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalysisConfig {
    pub bridge_threshold: usize,
    pub lineage: LineageConfig,
    pub default_series: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            bridge_threshold: DEFAULT_BRIDGE_THRESHOLD,
            lineage: LineageConfig::default(),
            default_series: DEFAULT_SERIES.to_owned(),
        }
    }
}

impl AnalysisConfig {
    pub fn from_json_str(s: &str) -> Result<Self> {
        serde_json::from_str(s).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn with_bridge_threshold(mut self, threshold: usize) -> Self {
        self.bridge_threshold = threshold;
        self
    }

    pub fn with_lineage(mut self, lineage: LineageConfig) -> Self {
        self.lineage = lineage;
        self
    }

    pub fn with_default_series(mut self, series: impl Into<String>) -> Self {
        self.default_series = series.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_object_is_default() {
        let config = AnalysisConfig::from_json_str("{}").unwrap();
        assert_eq!(config, AnalysisConfig::default());
        assert_eq!(config.bridge_threshold, 3);
        assert_eq!(config.default_series, "Foundation");
    }

    #[test]
    fn test_partial_override() {
        let config = AnalysisConfig::from_json_str(r#"{"bridgeThreshold": 2, "lineage": {"pe": ["PPM", "EFS"]}}"#).unwrap();
        assert_eq!(config.bridge_threshold, 2);
        assert_eq!(config.lineage.pe, vec!["PPM".to_string(), "EFS".to_string()]);
        // unspecified chain keeps its default
        assert_eq!(config.lineage.ve.len(), 5);
    }

    #[test]
    fn test_invalid_json_is_config_error() {
        let err = AnalysisConfig::from_json_str("{bridgeThreshold:").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        let err = AnalysisConfig::from_json_str(r#"{"bridgeThreshold": "many"}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
