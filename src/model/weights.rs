use serde::ser::{Serialize, SerializeMap, Serializer};

/// Key under which the cash residual is reported.
pub const CASH: &str = "Cash";

/// Target portfolio weights: one entry per traded asset plus a cash residual.
///
/// Assets keep the order they were configured in.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightVector {
    assets: Vec<(String, f64)>,
    cash: f64,
}

impl WeightVector {
    pub fn new(assets: Vec<(String, f64)>, cash: f64) -> Self {
        Self { assets, cash }
    }

    /// Every asset at zero, everything in cash.
    pub fn all_cash<S: AsRef<str>>(assets: &[S]) -> Self {
        Self {
            assets: assets
                .iter()
                .map(|a| (a.as_ref().to_string(), 0.0))
                .collect(),
            cash: 1.0,
        }
    }

    pub fn weight(&self, asset: &str) -> Option<f64> {
        if asset == CASH {
            return Some(self.cash);
        }
        self.assets
            .iter()
            .find(|(name, _)| name == asset)
            .map(|(_, w)| *w)
    }

    pub fn cash(&self) -> f64 {
        self.cash
    }

    /// Sum of risky weights, excluding cash.
    pub fn exposure(&self) -> f64 {
        self.assets.iter().map(|(_, w)| *w).sum()
    }

    /// Sum of all components including cash.
    pub fn total(&self) -> f64 {
        self.exposure() + self.cash
    }

    pub fn is_all_cash(&self) -> bool {
        self.assets.iter().all(|(_, w)| *w == 0.0)
    }

    pub fn assets(&self) -> impl Iterator<Item = (&str, f64)> {
        self.assets.iter().map(|(name, w)| (name.as_str(), *w))
    }
}

impl Serialize for WeightVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.assets.len() + 1))?;
        for (name, w) in &self.assets {
            map.serialize_entry(name, w)?;
        }
        map.serialize_entry(CASH, &self.cash)?;
        map.end()
    }
}
