use serde::{Deserialize, Serialize};

/// Value reported while the averages are still being seeded.
pub const RSI_NEUTRAL: f64 = 50.0;

/// Wilder's RSI as a two-phase state machine.
///
/// The first observation only records the reference price. The next `period` price
/// changes accumulate raw gains and losses; the change that completes the warmup divides
/// the sums by `period` and switches to Wilder smoothing. Every update up to and including
/// that switch reports [`RSI_NEUTRAL`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WilderRsi {
    period: usize,
    prev_price: Option<f64>,
    warmup_count: usize,
    avg_gain: f64,
    avg_loss: f64,
    initialized: bool,
    last_value: f64,
}

impl WilderRsi {
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "RSI period must be > 0");
        Self {
            period,
            prev_price: None,
            warmup_count: 0,
            avg_gain: 0.0,
            avg_loss: 0.0,
            initialized: false,
            last_value: RSI_NEUTRAL,
        }
    }

    /// Push a new price and return the RSI reported for this update.
    pub fn push(&mut self, price: f64) -> f64 {
        let Some(prev) = self.prev_price.replace(price) else {
            self.last_value = RSI_NEUTRAL;
            return self.last_value;
        };

        let delta = price - prev;
        let gain = delta.max(0.0);
        let loss = (-delta).max(0.0);
        let period = self.period as f64;

        if !self.initialized {
            self.avg_gain += gain;
            self.avg_loss += loss;
            self.warmup_count += 1;
            if self.warmup_count >= self.period {
                self.avg_gain /= period;
                self.avg_loss /= period;
                self.initialized = true;
            }
            self.last_value = RSI_NEUTRAL;
            return self.last_value;
        }

        self.avg_gain = (self.avg_gain * (period - 1.0) + gain) / period;
        self.avg_loss = (self.avg_loss * (period - 1.0) + loss) / period;
        self.last_value = rsi_from_averages(self.avg_gain, self.avg_loss);
        self.last_value
    }

    /// RSI reported by the latest update.
    pub fn value(&self) -> f64 {
        self.last_value
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn warmup_count(&self) -> usize {
        self.warmup_count
    }

    pub fn avg_gain(&self) -> f64 {
        self.avg_gain
    }

    pub fn avg_loss(&self) -> f64 {
        self.avg_loss
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Check the state invariants of a value restored from outside this process.
    pub fn validate(&self) -> Result<(), String> {
        if let Some(prev) = self.prev_price {
            if !prev.is_finite() || prev <= 0.0 {
                return Err(format!("RSI reference price must be finite and > 0, got {}", prev));
            }
        }
        for (name, v) in [("avg_gain", self.avg_gain), ("avg_loss", self.avg_loss)] {
            if !v.is_finite() || v < 0.0 {
                return Err(format!("RSI {} must be finite and >= 0, got {}", name, v));
            }
        }
        if !(0.0..=100.0).contains(&self.last_value) {
            return Err(format!(
                "RSI value must be within [0, 100], got {}",
                self.last_value
            ));
        }
        if self.warmup_count > self.period || self.initialized != (self.warmup_count == self.period)
        {
            return Err(format!(
                "RSI warmup count {} inconsistent with period {} (initialized: {})",
                self.warmup_count, self.period, self.initialized
            ));
        }
        Ok(())
    }
}

fn rsi_from_averages(avg_gain: f64, avg_loss: f64) -> f64 {
    if avg_loss == 0.0 {
        return 100.0;
    }
    let rs = avg_gain / avg_loss;
    100.0 - (100.0 / (1.0 + rs))
}
