use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::path::Path;

use crate::core::error::MatchError;
use crate::core::matcher::MatchConfig;
use crate::core::timeslot::DayOrder;
use crate::models::{FilterRule, MatchFilters, ScoringWeights, Side};

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    #[serde(default)]
    pub matching: MatchingSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Matching policy: weights, hard filters and thresholds
#[derive(Debug, Clone, Deserialize)]
pub struct MatchingSettings {
    #[serde(default = "default_waiting_time_weight")]
    pub waiting_time_weight: f64,
    #[serde(default)]
    pub quality_weight: f64,
    #[serde(default = "default_quality_side")]
    pub quality_side: Side,
    #[serde(default = "default_min_overlap_days")]
    pub min_overlap_days: u8,
    #[serde(default = "default_true")]
    pub language_filter: bool,
    #[serde(default = "default_true")]
    pub live_scan_filter: bool,
    #[serde(default)]
    pub language_rule: FilterRule,
    #[serde(default)]
    pub live_scan_rule: FilterRule,
    #[serde(default = "default_requiring_side")]
    pub requiring_side: Side,
    #[serde(default = "default_days")]
    pub days: Vec<String>,
    #[serde(default = "default_recommendation_limit")]
    pub recommendation_limit: usize,
}

impl Default for MatchingSettings {
    fn default() -> Self {
        Self {
            waiting_time_weight: default_waiting_time_weight(),
            quality_weight: 0.0,
            quality_side: default_quality_side(),
            min_overlap_days: default_min_overlap_days(),
            language_filter: true,
            live_scan_filter: true,
            language_rule: FilterRule::default(),
            live_scan_rule: FilterRule::default(),
            requiring_side: default_requiring_side(),
            days: default_days(),
            recommendation_limit: default_recommendation_limit(),
        }
    }
}

fn default_waiting_time_weight() -> f64 { 0.2 }
fn default_quality_side() -> Side { Side::B }
fn default_min_overlap_days() -> u8 { 2 }
fn default_true() -> bool { true }
fn default_requiring_side() -> Side { Side::A }
fn default_recommendation_limit() -> usize { 3 }

fn default_days() -> Vec<String> {
    DayOrder::weekdays().labels().to_vec()
}

impl MatchingSettings {
    /// Build a validated matching configuration
    pub fn to_match_config(&self) -> Result<MatchConfig, MatchError> {
        let config = MatchConfig {
            weights: ScoringWeights::new(self.waiting_time_weight, self.quality_weight)
                .with_quality_side(self.quality_side),
            filters: MatchFilters {
                language: self.language_filter,
                live_scan: self.live_scan_filter,
                language_rule: self.language_rule,
                live_scan_rule: self.live_scan_rule,
                requiring_side: self.requiring_side,
            },
            min_overlap_days: self.min_overlap_days,
            day_order: DayOrder::new(self.days.iter().cloned())?,
        };

        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "json".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with TUTORMATCH_)
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("server.host", "0.0.0.0")?
            .set_default("server.port", 8080)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            // e.g., TUTORMATCH__MATCHING__MIN_OVERLAP_DAYS -> matching.min_overlap_days
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        settings.try_deserialize()
    }
}

fn environment() -> Environment {
    Environment::with_prefix("TUTORMATCH")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("matching.days")
}
