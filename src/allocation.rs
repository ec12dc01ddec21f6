use crate::config::AllocationConfig;
use crate::model::WeightVector;

/// Per-asset input to the allocator.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetSignal {
    pub asset: String,
    /// Risk score in `[0, 1]`.
    pub score: f64,
    pub volatility: f64,
}

impl AssetSignal {
    pub fn new(asset: impl Into<String>, score: f64, volatility: f64) -> Self {
        Self {
            asset: asset.into(),
            score,
            volatility,
        }
    }
}

/// Inverse-volatility allocator whose total risky exposure is capped by the single
/// strongest score.
#[derive(Debug, Clone)]
pub struct AllocationEngine {
    volatility_floor: f64,
}

impl AllocationEngine {
    pub fn new(cfg: &AllocationConfig) -> Self {
        Self {
            volatility_floor: cfg.volatility_floor,
        }
    }

    pub fn allocate(&self, signals: &[AssetSignal]) -> WeightVector {
        let scores: Vec<f64> = signals
            .iter()
            .map(|s| sanitize_score(s.score))
            .collect();
        let raw: Vec<f64> = signals
            .iter()
            .zip(&scores)
            .map(|(s, score)| score / self.floored_volatility(s.volatility))
            .collect();

        let total_raw: f64 = raw.iter().sum();
        if !total_raw.is_finite() || total_raw <= 0.0 {
            let names: Vec<&str> = signals.iter().map(|s| s.asset.as_str()).collect();
            return WeightVector::all_cash(&names);
        }

        let exposure_factor = scores.iter().copied().fold(0.0, f64::max);
        let mut weights: Vec<f64> = raw
            .iter()
            .map(|r| (r / total_raw * exposure_factor).clamp(0.0, 1.0))
            .collect();

        let sum: f64 = weights.iter().sum();
        if sum > 1.0 {
            let factor = 1.0 / sum;
            for w in &mut weights {
                *w *= factor;
            }
        }

        let exposure: f64 = weights.iter().sum();
        let cash = (1.0 - exposure).max(0.0);
        let assets = signals
            .iter()
            .zip(weights)
            .map(|(s, w)| (s.asset.clone(), w))
            .collect();
        WeightVector::new(assets, cash)
    }

    fn floored_volatility(&self, volatility: f64) -> f64 {
        if volatility.is_finite() {
            volatility.max(self.volatility_floor)
        } else {
            f64::INFINITY
        }
    }
}

/// Non-finite scores count as no conviction.
fn sanitize_score(score: f64) -> f64 {
    if score.is_finite() {
        score.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
