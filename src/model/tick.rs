use crate::error::EngineError;

/// One validated price observation for one asset at one epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceTick {
    pub asset: String,
    pub epoch: u64,
    pub price: f64,
}

impl PriceTick {
    /// Reject non-finite and non-positive prices before they reach any indicator state.
    pub fn new(asset: impl Into<String>, epoch: u64, price: f64) -> Result<Self, EngineError> {
        let asset = asset.into();
        if !price.is_finite() || price <= 0.0 {
            return Err(EngineError::InvalidPrice { asset, price });
        }
        Ok(Self {
            asset,
            epoch,
            price,
        })
    }
}
