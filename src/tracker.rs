use serde::{Deserialize, Serialize};

use crate::config::IndicatorConfig;
use crate::indicator::{Ema, RingBuffer, WilderRsi};

/// Incremental indicator state for one asset.
///
/// [`AssetTracker::update`] is called exactly once per epoch; everything else reads the
/// state it left behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetTracker {
    ema_short: Ema,
    ema_long: Ema,
    rsi: WilderRsi,
    prev_price: Option<f64>,
    prices: RingBuffer,
    returns: RingBuffer,
    last_volatility: f64,
}

impl AssetTracker {
    pub fn new(cfg: &IndicatorConfig) -> Self {
        Self {
            ema_short: Ema::new(cfg.ema_short_span),
            ema_long: Ema::new(cfg.ema_long_span),
            rsi: WilderRsi::new(cfg.rsi_period),
            prev_price: None,
            prices: RingBuffer::new(cfg.price_window),
            returns: RingBuffer::new(cfg.return_window),
            last_volatility: 0.0,
        }
    }

    pub fn update(&mut self, price: f64) {
        if let Some(prev) = self.prev_price {
            if prev > 0.0 {
                self.returns.push((price - prev) / prev);
            }
        }
        self.prices.push(price);
        self.prev_price = Some(price);

        self.ema_short.push(price);
        self.ema_long.push(price);
        self.rsi.push(price);
        self.last_volatility = if self.returns.len() < 2 {
            0.0
        } else {
            self.returns.population_std().unwrap_or(0.0)
        };
    }

    pub fn ema_short(&self) -> Option<f64> {
        self.ema_short.value()
    }

    pub fn ema_long(&self) -> Option<f64> {
        self.ema_long.value()
    }

    pub fn rsi(&self) -> f64 {
        self.rsi.value()
    }

    pub fn rsi_state(&self) -> &WilderRsi {
        &self.rsi
    }

    /// Population std of the recorded returns; 0.0 with fewer than two returns.
    pub fn volatility(&self) -> f64 {
        self.last_volatility
    }

    pub fn prev_price(&self) -> Option<f64> {
        self.prev_price
    }

    /// Highest price in the rolling price window.
    pub fn recent_max(&self) -> Option<f64> {
        self.prices.max()
    }

    pub fn prices(&self) -> &RingBuffer {
        &self.prices
    }

    pub fn returns(&self) -> &RingBuffer {
        &self.returns
    }

    /// Reject state no sequence of valid prices could have produced.
    pub fn validate(&self) -> Result<(), String> {
        self.rsi.validate()?;
        if let Some(prev) = self.prev_price {
            if !prev.is_finite() || prev <= 0.0 {
                return Err(format!("previous price must be finite and > 0, got {}", prev));
            }
        }
        if let Some(bad) = self.prices.iter().find(|p| !p.is_finite() || *p <= 0.0) {
            return Err(format!("price window holds invalid price {}", bad));
        }
        if let Some(bad) = self.returns.iter().find(|r| !r.is_finite()) {
            return Err(format!("return window holds non-finite return {}", bad));
        }
        if !self.last_volatility.is_finite() || self.last_volatility < 0.0 {
            return Err(format!(
                "volatility must be finite and >= 0, got {}",
                self.last_volatility
            ));
        }
        Ok(())
    }

    /// Whether this tracker's windows and periods were built from `cfg`.
    pub fn matches_config(&self, cfg: &IndicatorConfig) -> bool {
        self.ema_short.span() == cfg.ema_short_span
            && self.ema_long.span() == cfg.ema_long_span
            && self.rsi.period() == cfg.rsi_period
            && self.prices.capacity() == cfg.price_window
            && self.returns.capacity() == cfg.return_window
    }
}
