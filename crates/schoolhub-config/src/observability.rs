//! Logging and metrics settings.
//!
//! - `LOG_DIR`: directory for the rolling log files (default `storage/logs`)
//! - `OTEL_EXPORTER_OTLP_ENDPOINT`: enables the OTLP trace exporter when set
//! - `METRICS_ENABLED`: set to `false` or `0` to disable Prometheus metrics

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ObservabilityConfig {
    pub log_dir: String,
    pub otlp_endpoint: Option<String>,
    pub metrics_enabled: bool,
    pub environment: String,
}

impl ObservabilityConfig {
    pub fn from_env() -> Self {
        Self {
            log_dir: std::env::var("LOG_DIR").unwrap_or_else(|_| "storage/logs".to_string()),
            otlp_endpoint: std::env::var("OTEL_EXPORTER_OTLP_ENDPOINT")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            metrics_enabled: std::env::var("METRICS_ENABLED")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
        }
    }
}

fn parse_flag(value: &str) -> bool {
    let value = value.trim();
    !(value.eq_ignore_ascii_case("false") || value == "0")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_flag() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("FALSE"));
        assert!(!parse_flag("0"));
    }
}
