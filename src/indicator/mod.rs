pub mod ema;
pub mod ring;
pub mod rsi;

pub use ema::Ema;
pub use ring::RingBuffer;
pub use rsi::{WilderRsi, RSI_NEUTRAL};
