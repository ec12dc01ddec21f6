use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

use crate::model::CASH;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Smallest accepted volatility floor; below it inverse-volatility weights can overflow.
pub const MIN_VOLATILITY_FLOOR: f64 = 1e-9;

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub indicator: IndicatorConfig,
    pub regime: RegimeConfig,
    pub allocation: AllocationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub assets: Vec<String>,
    /// Epochs before this one always return all-cash.
    pub warmup_epochs: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            assets: vec!["Asset A".to_string(), "Asset B".to_string()],
            warmup_epochs: 50,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub ema_short_span: usize,
    pub ema_long_span: usize,
    pub rsi_period: usize,
    pub price_window: usize,
    pub return_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ema_short_span: 12,
            ema_long_span: 50,
            rsi_period: 14,
            price_window: 15,
            return_window: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RegimeConfig {
    /// Below this RSI a bull pullback is still bought at full size.
    pub oversold_rsi: f64,
    pub pullback_score: f64,
    pub overbought_rsi: f64,
    pub overbought_score: f64,
    /// Above this RSI the asset is not held at all.
    pub blowoff_rsi: f64,
    /// Fractional decline from the rolling price max that vetoes any exposure.
    pub max_drawdown: f64,
}

impl Default for RegimeConfig {
    fn default() -> Self {
        Self {
            oversold_rsi: 45.0,
            pullback_score: 0.6,
            overbought_rsi: 88.0,
            overbought_score: 0.7,
            blowoff_rsi: 95.0,
            max_drawdown: 0.035,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AllocationConfig {
    pub volatility_floor: f64,
}

impl Default for AllocationConfig {
    fn default() -> Self {
        Self {
            volatility_floor: 0.002,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

fn config_path() -> PathBuf {
    std::env::var("RA_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH))
}

impl Config {
    /// Load from `RA_CONFIG_PATH` (or `config/default.toml`), falling back to built-in
    /// defaults when the default file does not exist.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = config_path();
        if !path.exists() && std::env::var_os("RA_CONFIG_PATH").is_none() {
            let config = Config::default();
            config.validate()?;
            return Ok(config);
        }
        Self::load_from_path(&path)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let config_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let config = Self::from_toml_str(&config_str)
            .with_context(|| format!("failed to load {}", path.display()))?;
        Ok(config)
    }

    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Config = toml::from_str(s).context("failed to parse config toml")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let assets = &self.engine.assets;
        if assets.is_empty() {
            bail!("engine.assets must name at least one asset");
        }
        for (i, asset) in assets.iter().enumerate() {
            if asset.trim().is_empty() {
                bail!("engine.assets[{}] is blank", i);
            }
            if asset == CASH {
                bail!("engine.assets must not contain the reserved name '{}'", CASH);
            }
            if assets[..i].contains(asset) {
                bail!("engine.assets lists '{}' more than once", asset);
            }
        }

        let ind = &self.indicator;
        if ind.ema_short_span == 0 || ind.ema_long_span == 0 {
            bail!("indicator EMA spans must be > 0");
        }
        if ind.ema_short_span >= ind.ema_long_span {
            bail!(
                "indicator.ema_short_span ({}) must be less than ema_long_span ({})",
                ind.ema_short_span,
                ind.ema_long_span
            );
        }
        if ind.rsi_period == 0 {
            bail!("indicator.rsi_period must be > 0");
        }
        if ind.price_window == 0 {
            bail!("indicator.price_window must be > 0");
        }
        if ind.return_window < 2 {
            bail!("indicator.return_window must be >= 2");
        }

        let reg = &self.regime;
        for (name, v) in [
            ("oversold_rsi", reg.oversold_rsi),
            ("overbought_rsi", reg.overbought_rsi),
            ("blowoff_rsi", reg.blowoff_rsi),
        ] {
            if !(0.0..=100.0).contains(&v) {
                bail!("regime.{} must be within [0, 100], got {}", name, v);
            }
        }
        for (name, v) in [
            ("pullback_score", reg.pullback_score),
            ("overbought_score", reg.overbought_score),
        ] {
            if !(0.0..=1.0).contains(&v) {
                bail!("regime.{} must be within [0, 1], got {}", name, v);
            }
        }
        if !(reg.max_drawdown > 0.0 && reg.max_drawdown < 1.0) {
            bail!(
                "regime.max_drawdown must be within (0, 1), got {}",
                reg.max_drawdown
            );
        }

        let floor = self.allocation.volatility_floor;
        if !floor.is_finite() || floor < MIN_VOLATILITY_FLOOR {
            bail!(
                "allocation.volatility_floor must be finite and >= {}, got {}",
                MIN_VOLATILITY_FLOOR,
                floor
            );
        }
        Ok(())
    }
}
