pub mod tick;
pub mod weights;

pub use tick::PriceTick;
pub use weights::{WeightVector, CASH};
