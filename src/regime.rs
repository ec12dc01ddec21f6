use crate::config::RegimeConfig;
use crate::tracker::AssetTracker;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Regime {
    /// No long EMA yet.
    Undefined,
    Bear,
    Bull,
}

impl Regime {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Bear => "bear",
            Self::Bull => "bull",
        }
    }
}

/// Maps a tracker snapshot and the current price to a risk score in `[0, 1]`.
#[derive(Debug, Clone)]
pub struct RegimeClassifier {
    cfg: RegimeConfig,
}

impl RegimeClassifier {
    pub fn new(cfg: RegimeConfig) -> Self {
        Self { cfg }
    }

    pub fn classify(&self, tracker: &AssetTracker, price: f64) -> Regime {
        match tracker.ema_long() {
            None => Regime::Undefined,
            Some(long) if price > long => Regime::Bull,
            Some(_) => Regime::Bear,
        }
    }

    /// Rules apply in order; each later rule overrides the ones before it.
    pub fn score(&self, tracker: &AssetTracker, price: f64) -> f64 {
        let cfg = &self.cfg;
        let mut score = match self.classify(tracker, price) {
            Regime::Undefined => return 0.0,
            Regime::Bear => 0.0,
            Regime::Bull => {
                let rsi = tracker.rsi();
                let above_short = tracker.ema_short().is_some_and(|short| price > short);
                let mut s = if above_short || rsi < cfg.oversold_rsi {
                    1.0
                } else {
                    cfg.pullback_score
                };
                if rsi > cfg.overbought_rsi {
                    s = cfg.overbought_score;
                }
                if rsi > cfg.blowoff_rsi {
                    s = 0.0;
                }
                s
            }
        };

        if self.drawdown_vetoed(tracker, price) {
            score = 0.0;
        }
        score
    }

    /// Price sits more than `max_drawdown` below the rolling window max.
    pub fn drawdown_vetoed(&self, tracker: &AssetTracker, price: f64) -> bool {
        match tracker.recent_max() {
            Some(max) if max > 0.0 => (price - max) / max < -self.cfg.max_drawdown,
            _ => false,
        }
    }
}
