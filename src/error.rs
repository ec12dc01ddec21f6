use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum EngineError {
    #[error("invalid price for {asset}: {price} (must be finite and > 0)")]
    InvalidPrice { asset: String, price: f64 },

    #[error("missing price for {asset}")]
    MissingPrice { asset: String },

    #[error("unknown asset {asset}")]
    UnknownAsset { asset: String },

    #[error("snapshot does not match engine: {0}")]
    SnapshotMismatch(String),
}
