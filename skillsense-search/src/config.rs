//! Pipeline configuration with sensible defaults.
//!
//! [`SearchConfig`] controls retrieval depth, outbound call timeouts and the
//! judgment fan-out cap. The fusion constant, the relevance threshold and
//! the summary size are fixed by the ranking contract and live as
//! constants next to the code that uses them.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::SearchError;

/// Largest page a caller may request.
pub const MAX_PAGE_SIZE: usize = 50;

/// Configuration for the search pipeline.
///
/// Use [`Default::default()`] for sensible defaults, or construct with
/// field overrides for custom behaviour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Maximum number of candidates each retrieval source returns.
    pub retrieval_limit: usize,
    /// Timeout in seconds applied to every outbound oracle, index and
    /// store call.
    pub timeout_seconds: u64,
    /// Upper bound on judgments in flight for one request. `None` judges
    /// every filtered candidate at once; serialized forms spell it `0`.
    #[serde(with = "zero_is_uncapped")]
    pub max_concurrent_judgments: Option<usize>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            retrieval_limit: 50,
            timeout_seconds: 30,
            max_concurrent_judgments: Some(16),
        }
    }
}

impl SearchConfig {
    /// Validates this configuration, returning an error if any field is invalid.
    ///
    /// Checks:
    /// - `retrieval_limit` must be greater than 0
    /// - `timeout_seconds` must be greater than 0
    /// - `max_concurrent_judgments`, when set, must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.retrieval_limit == 0 {
            return Err(SearchError::Config(
                "retrieval_limit must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.max_concurrent_judgments == Some(0) {
            return Err(SearchError::Config(
                "max_concurrent_judgments must be greater than 0 when set".into(),
            ));
        }
        Ok(())
    }

    /// The outbound call timeout as a [`std::time::Duration`].
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_seconds)
    }
}

/// Maps `None` to `0` and back, since TOML has no null.
mod zero_is_uncapped {
    use super::*;

    pub fn serialize<S: Serializer>(
        cap: &Option<usize>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(cap.unwrap_or(0) as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<usize>, D::Error> {
        let cap = Option::<usize>::deserialize(deserializer)?;
        Ok(cap.filter(|&n| n > 0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_has_sensible_values() {
        let config = SearchConfig::default();
        assert_eq!(config.retrieval_limit, 50);
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.max_concurrent_judgments, Some(16));
    }

    #[test]
    fn valid_config_passes_validation() {
        assert!(SearchConfig::default().validate().is_ok());
    }

    #[test]
    fn zero_retrieval_limit_rejected() {
        let config = SearchConfig {
            retrieval_limit: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("retrieval_limit"));
    }

    #[test]
    fn zero_timeout_rejected() {
        let config = SearchConfig {
            timeout_seconds: 0,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("timeout_seconds"));
    }

    #[test]
    fn zero_judgment_cap_rejected() {
        let config = SearchConfig {
            max_concurrent_judgments: Some(0),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("max_concurrent_judgments"));
    }

    #[test]
    fn uncapped_judgments_valid() {
        let config = SearchConfig {
            max_concurrent_judgments: None,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"retrieval_limit": 20}"#).expect("deserialize");
        assert_eq!(config.retrieval_limit, 20);
        assert_eq!(config.timeout_seconds, 30);
        assert_eq!(config.max_concurrent_judgments, Some(16));
    }

    #[test]
    fn zero_cap_reads_as_uncapped() {
        let config: SearchConfig =
            serde_json::from_str(r#"{"max_concurrent_judgments": 0}"#).expect("deserialize");
        assert_eq!(config.max_concurrent_judgments, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn uncapped_serializes_as_zero() {
        let config = SearchConfig {
            max_concurrent_judgments: None,
            ..Default::default()
        };
        let json = serde_json::to_value(&config).expect("serialize");
        assert_eq!(json["max_concurrent_judgments"], 0);

        let back: SearchConfig = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, config);
    }
}
