pub mod allocation;
pub mod config;
pub mod engine;
pub mod error;
pub mod indicator;
pub mod model;
pub mod regime;
pub mod replay;
pub mod session;
pub mod tracker;

pub use allocation::{AllocationEngine, AssetSignal};
pub use config::Config;
pub use engine::{needs_reset, DecisionEngine, EngineState};
pub use error::EngineError;
pub use model::{PriceTick, WeightVector, CASH};
pub use regime::{Regime, RegimeClassifier};
pub use tracker::AssetTracker;
