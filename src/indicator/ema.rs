use serde::{Deserialize, Serialize};

/// Exponential Moving Average seeded by its first observation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EmaRepr", into = "EmaRepr")]
pub struct Ema {
    span: usize,
    multiplier: f64,
    ema: Option<f64>,
}

impl Ema {
    pub fn new(span: usize) -> Self {
        assert!(span > 0, "EMA span must be > 0");
        Self {
            span,
            multiplier: 2.0 / (span as f64 + 1.0),
            ema: None,
        }
    }

    /// Push a new value and return the updated EMA.
    pub fn push(&mut self, value: f64) -> f64 {
        let next = match self.ema {
            // Incremental form holds a constant stream exactly.
            Some(prev) => (value - prev) * self.multiplier + prev,
            None => value,
        };
        self.ema = Some(next);
        next
    }

    pub fn value(&self) -> Option<f64> {
        self.ema
    }

    pub fn is_ready(&self) -> bool {
        self.ema.is_some()
    }

    pub fn span(&self) -> usize {
        self.span
    }

    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }
}

/// The multiplier is derived from `span`, so only the span and the running value persist.
#[derive(Serialize, Deserialize)]
struct EmaRepr {
    span: usize,
    ema: Option<f64>,
}

impl From<Ema> for EmaRepr {
    fn from(ema: Ema) -> Self {
        Self {
            span: ema.span,
            ema: ema.ema,
        }
    }
}

impl TryFrom<EmaRepr> for Ema {
    type Error = String;

    fn try_from(repr: EmaRepr) -> Result<Self, Self::Error> {
        if repr.span == 0 {
            return Err("EMA span must be > 0".to_string());
        }
        if let Some(v) = repr.ema {
            if !v.is_finite() || v <= 0.0 {
                return Err(format!("EMA value must be finite and > 0, got {}", v));
            }
        }
        let mut out = Ema::new(repr.span);
        out.ema = repr.ema;
        Ok(out)
    }
}
