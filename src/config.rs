use chrono::NaiveDate;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use tracing::info;
use validator::Validate;

use crate::analytics::risk::RiskThresholds;
use crate::errors::ServiceError;
use crate::synth::baselines::BaselineTable;

const DEFAULT_LOG_LEVEL: &str = "info";
const CONFIG_DIR: &str = "config";

const DEFAULT_SEED: u64 = 42;
const DEFAULT_SUPPLIER_COUNT: u32 = 200;
const DEFAULT_PO_COUNT: u32 = 10_000;

fn default_seed() -> u64 {
    DEFAULT_SEED
}
fn default_supplier_count() -> u32 {
    DEFAULT_SUPPLIER_COUNT
}
fn default_po_count() -> u32 {
    DEFAULT_PO_COUNT
}
fn default_window_start() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 1, 1).expect("static date")
}
fn default_window_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 31).expect("static date")
}
fn default_delay_scale() -> f64 {
    6.0
}
fn default_on_time_margin() -> f64 {
    2.0
}
fn default_variance_factor() -> f64 {
    1.5
}
fn default_quantity_min() -> u32 {
    10
}
fn default_quantity_max() -> u32 {
    1_000
}
fn default_short_ship_base() -> f64 {
    0.05
}
fn default_short_ship_scale() -> f64 {
    0.25
}
fn default_defect_base() -> f64 {
    0.01
}
fn default_defect_scale() -> f64 {
    0.08
}
fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

/// Parameters of the synthetic dataset generator.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct GenerationConfig {
    /// RNG seed; identical seed and config produce byte-identical datasets.
    #[serde(default = "default_seed")]
    pub seed: u64,

    #[serde(default = "default_supplier_count")]
    #[validate(range(min = 1))]
    pub supplier_count: u32,

    #[serde(default = "default_po_count")]
    #[validate(range(min = 1))]
    pub po_count: u32,

    /// Order dates are sampled uniformly inside [window_start, window_end].
    #[serde(default = "default_window_start")]
    pub window_start: NaiveDate,
    #[serde(default = "default_window_end")]
    pub window_end: NaiveDate,

    /// Days of slack before a delivery counts as late.
    #[serde(default)]
    #[validate(range(min = 0))]
    pub grace_days: i64,

    /// Mean lead-time shift applied at reliability 0, in days.
    #[serde(default = "default_delay_scale")]
    #[validate(range(min = 0.0))]
    pub delay_scale: f64,

    /// Days a perfectly reliable supplier beats its quote by, on average.
    #[serde(default = "default_on_time_margin")]
    #[validate(range(min = 0.0))]
    pub on_time_margin: f64,

    /// How strongly low reliability widens the noise standard deviation.
    #[serde(default = "default_variance_factor")]
    #[validate(range(min = 0.0))]
    pub variance_factor: f64,

    /// Ordered-quantity band for generated POs.
    #[serde(default = "default_quantity_min")]
    #[validate(range(min = 1))]
    pub quantity_min: u32,
    #[serde(default = "default_quantity_max")]
    pub quantity_max: u32,

    /// Probability that a fully reliable supplier still ships short.
    #[serde(default = "default_short_ship_base")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub short_ship_base: f64,
    /// Additional short-ship probability at reliability 0.
    #[serde(default = "default_short_ship_scale")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub short_ship_scale: f64,

    /// Defect-fraction ceiling for a fully reliable supplier.
    #[serde(default = "default_defect_base")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub defect_base: f64,
    /// Additional defect-fraction ceiling at reliability 0.
    #[serde(default = "default_defect_scale")]
    #[validate(range(min = 0.0, max = 1.0))]
    pub defect_scale: f64,

    #[serde(default)]
    pub baselines: BaselineTable,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            supplier_count: default_supplier_count(),
            po_count: default_po_count(),
            window_start: default_window_start(),
            window_end: default_window_end(),
            grace_days: 0,
            delay_scale: default_delay_scale(),
            on_time_margin: default_on_time_margin(),
            variance_factor: default_variance_factor(),
            quantity_min: default_quantity_min(),
            quantity_max: default_quantity_max(),
            short_ship_base: default_short_ship_base(),
            short_ship_scale: default_short_ship_scale(),
            defect_base: default_defect_base(),
            defect_scale: default_defect_scale(),
            baselines: BaselineTable::default(),
        }
    }
}

/// Documented fallbacks for suppliers with zero prior history.
///
/// These are explicit population-level priors, never silent NaNs: a
/// cold-start supplier is treated as an average performer until history
/// accumulates.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ColdStartDefaults {
    #[validate(range(min = 0.0))]
    pub avg_lead_time_days: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub late_rate: f64,
    #[validate(range(min = 0.0))]
    pub late_severity_days: f64,
    #[validate(range(min = 0.0, max = 1.0))]
    pub defect_rate: f64,
}

impl Default for ColdStartDefaults {
    fn default() -> Self {
        Self {
            avg_lead_time_days: 10.0,
            late_rate: 0.1,
            late_severity_days: 0.0,
            defect_rate: 0.0,
        }
    }
}

/// Hyperparameters shared by the regressor and classifier.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Held-out fraction used for evaluation and model selection.
    #[validate(range(min = 0.05, max = 0.5))]
    pub test_fraction: f64,
    #[validate(range(min = 0.000001))]
    pub learning_rate: f64,
    #[validate(range(min = 1))]
    pub epochs: u32,
    /// Ridge strengths evaluated on the held-out split; the best one wins.
    #[validate(length(min = 1))]
    pub ridge_grid: Vec<f64>,
    /// Probability above which the classifier flags a PO as late.
    #[validate(range(min = 0.0, max = 1.0))]
    pub late_threshold: f64,
    /// Pseudo-count pulling supplier target encodings toward the global
    /// late rate.
    #[validate(range(min = 0.0))]
    pub te_smoothing: f64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            learning_rate: 0.05,
            epochs: 400,
            ridge_grid: vec![0.0, 0.1, 1.0, 10.0],
            late_threshold: 0.5,
            te_smoothing: 10.0,
        }
    }
}

/// Top-level pipeline configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields, default)]
pub struct PipelineConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[validate]
    pub generation: GenerationConfig,
    #[validate]
    pub cold_start: ColdStartDefaults,
    #[validate]
    pub model: ModelConfig,
    #[validate]
    pub risk: RiskThresholds,
}

impl PipelineConfig {
    /// Fails fast on anything the derive-level validators cannot express:
    /// window ordering, threshold ordering, baseline completeness.
    pub fn validate_all(&self) -> Result<(), ServiceError> {
        self.validate()?;

        if self.generation.window_start >= self.generation.window_end {
            return Err(ServiceError::InvalidConfiguration(format!(
                "date window start {} is not before end {}",
                self.generation.window_start, self.generation.window_end
            )));
        }
        if self.generation.quantity_min > self.generation.quantity_max {
            return Err(ServiceError::InvalidConfiguration(format!(
                "quantity_min {} exceeds quantity_max {}",
                self.generation.quantity_min, self.generation.quantity_max
            )));
        }
        if !self.risk.ordered() {
            return Err(ServiceError::InvalidConfiguration(
                "risk thresholds must satisfy medium < high < critical".to_string(),
            ));
        }
        self.generation.baselines.validate_complete()?;
        Ok(())
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            generation: GenerationConfig::default(),
            cold_start: ColdStartDefaults::default(),
            model: ModelConfig::default(),
            risk: RiskThresholds::default(),
        }
    }
}

/// Loads configuration from `config/default`, an environment-specific file
/// selected by `RUN_ENV`, and `APP__`-prefixed environment variables, in
/// that order of precedence.
pub fn load_config() -> Result<PipelineConfig, ServiceError> {
    let run_env = env::var("RUN_ENV").unwrap_or_else(|_| "development".to_string());
    info!("Loading configuration for environment: {}", run_env);

    if !Path::new(CONFIG_DIR).exists() {
        info!(
            "Config directory '{}' not found; relying on built-in defaults and environment variables",
            CONFIG_DIR
        );
    }

    let settings = Config::builder()
        .add_source(File::with_name(&format!("{CONFIG_DIR}/default")).required(false))
        .add_source(File::with_name(&format!("{CONFIG_DIR}/{run_env}")).required(false))
        .add_source(
            Environment::with_prefix("APP")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    let cfg: PipelineConfig = settings.try_deserialize()?;
    cfg.validate_all()?;
    Ok(cfg)
}

/// Initialises the tracing subscriber. `RUST_LOG` overrides the configured
/// level when set.
pub fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let default_directive = format!("supplier_performance={level}");
    let filter_directive = env::var("RUST_LOG")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(default_directive);

    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new(filter_directive))
        .with(fmt::layer())
        .try_init();
}
