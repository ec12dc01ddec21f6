use std::collections::HashMap;

use anyhow::Result;
use uuid::Uuid;

use crate::allocation::{AllocationEngine, AssetSignal};
use crate::config::{Config, IndicatorConfig};
use crate::error::EngineError;
use crate::model::{PriceTick, WeightVector};
use crate::regime::RegimeClassifier;
use crate::session::{EngineSnapshot, TrackerSnapshot, SNAPSHOT_VERSION};
use crate::tracker::AssetTracker;

/// A new session starts on epoch 0 or whenever the epoch moves backwards.
pub fn needs_reset(epoch: u64, last_epoch: Option<u64>) -> bool {
    epoch == 0 || last_epoch.is_some_and(|last| epoch < last)
}

/// Tracker state for one logical session.
#[derive(Debug, Clone)]
pub struct EngineState {
    session_id: Uuid,
    last_epoch: Option<u64>,
    trackers: Vec<(String, AssetTracker)>,
}

impl EngineState {
    pub fn new(assets: &[String], cfg: &IndicatorConfig) -> Self {
        Self {
            session_id: Uuid::new_v4(),
            last_epoch: None,
            trackers: assets
                .iter()
                .map(|a| (a.clone(), AssetTracker::new(cfg)))
                .collect(),
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn last_epoch(&self) -> Option<u64> {
        self.last_epoch
    }

    pub fn tracker(&self, asset: &str) -> Option<&AssetTracker> {
        self.trackers
            .iter()
            .find(|(name, _)| name == asset)
            .map(|(_, t)| t)
    }
}

/// Per-epoch decision entrypoint: feeds prices to the trackers, scores each asset and
/// turns the scores into target weights.
///
/// Calls must be serialized per session; `decide` takes `&mut self`.
#[derive(Debug, Clone)]
pub struct DecisionEngine {
    config: Config,
    classifier: RegimeClassifier,
    allocator: AllocationEngine,
    state: EngineState,
}

impl Default for DecisionEngine {
    fn default() -> Self {
        let config = Config::default();
        Self::build(config)
    }
}

impl DecisionEngine {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: Config) -> Self {
        let state = EngineState::new(&config.engine.assets, &config.indicator);
        Self {
            classifier: RegimeClassifier::new(config.regime.clone()),
            allocator: AllocationEngine::new(&config.allocation),
            state,
            config,
        }
    }

    pub fn assets(&self) -> &[String] {
        &self.config.engine.assets
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Drop all tracker state and start a fresh session.
    pub fn reset(&mut self) {
        let previous = self.state.session_id;
        self.state = EngineState::new(&self.config.engine.assets, &self.config.indicator);
        tracing::info!(
            previous_session = %previous,
            session_id = %self.state.session_id,
            "Engine session reset"
        );
    }

    /// Prices are validated before any state is touched; a rejected call leaves the
    /// engine exactly as it was.
    pub fn decide(
        &mut self,
        epoch: u64,
        prices: &HashMap<String, f64>,
    ) -> Result<WeightVector, EngineError> {
        let ticks = match self.collect_ticks(epoch, prices) {
            Ok(ticks) => ticks,
            Err(e) => {
                tracing::warn!(epoch, error = %e, "Rejected decision input");
                return Err(e);
            }
        };

        if needs_reset(epoch, self.state.last_epoch) {
            self.reset();
        }
        self.state.last_epoch = Some(epoch);

        for (tick, (_, tracker)) in ticks.iter().zip(self.state.trackers.iter_mut()) {
            tracker.update(tick.price);
        }

        if epoch < self.config.engine.warmup_epochs {
            return Ok(WeightVector::all_cash(&self.config.engine.assets));
        }

        let signals: Vec<AssetSignal> = ticks
            .iter()
            .zip(self.state.trackers.iter())
            .map(|(tick, (asset, tracker))| {
                let score = self.classifier.score(tracker, tick.price);
                tracing::debug!(
                    session_id = %self.state.session_id,
                    epoch,
                    asset = %asset,
                    regime = self.classifier.classify(tracker, tick.price).as_str(),
                    rsi = tracker.rsi(),
                    score,
                    volatility = tracker.volatility(),
                    "Scored asset"
                );
                AssetSignal::new(asset.clone(), score, tracker.volatility())
            })
            .collect();

        let weights = self.allocator.allocate(&signals);
        tracing::debug!(
            session_id = %self.state.session_id,
            epoch,
            exposure = weights.exposure(),
            cash = weights.cash(),
            "Allocated weights"
        );
        Ok(weights)
    }

    fn collect_ticks(
        &self,
        epoch: u64,
        prices: &HashMap<String, f64>,
    ) -> Result<Vec<PriceTick>, EngineError> {
        let assets = &self.config.engine.assets;
        if let Some(unknown) = prices.keys().find(|k| !assets.contains(*k)) {
            return Err(EngineError::UnknownAsset {
                asset: unknown.clone(),
            });
        }
        assets
            .iter()
            .map(|asset| {
                let price = prices
                    .get(asset)
                    .copied()
                    .ok_or_else(|| EngineError::MissingPrice {
                        asset: asset.clone(),
                    })?;
                PriceTick::new(asset.clone(), epoch, price)
            })
            .collect()
    }

    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            version: SNAPSHOT_VERSION,
            saved_at: chrono::Utc::now(),
            session_id: self.state.session_id,
            last_epoch: self.state.last_epoch,
            trackers: self
                .state
                .trackers
                .iter()
                .map(|(asset, tracker)| TrackerSnapshot {
                    asset: asset.clone(),
                    tracker: tracker.clone(),
                })
                .collect(),
        }
    }

    /// Resume a previously persisted session. The snapshot must have been taken with the
    /// same asset list and indicator windows, and every tracker must hold consistent state.
    pub fn restore(&mut self, snapshot: EngineSnapshot) -> Result<(), EngineError> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(EngineError::SnapshotMismatch(format!(
                "unsupported snapshot version {} (expected {})",
                snapshot.version, SNAPSHOT_VERSION
            )));
        }
        let snapshot_assets: Vec<&str> = snapshot
            .trackers
            .iter()
            .map(|t| t.asset.as_str())
            .collect();
        if snapshot_assets != self.config.engine.assets {
            return Err(EngineError::SnapshotMismatch(format!(
                "snapshot assets {:?} differ from configured {:?}",
                snapshot_assets, self.config.engine.assets
            )));
        }
        if let Some(bad) = snapshot
            .trackers
            .iter()
            .find(|t| !t.tracker.matches_config(&self.config.indicator))
        {
            return Err(EngineError::SnapshotMismatch(format!(
                "indicator windows for {} differ from configuration",
                bad.asset
            )));
        }
        for t in &snapshot.trackers {
            t.tracker.validate().map_err(|reason| {
                EngineError::SnapshotMismatch(format!("tracker state for {}: {}", t.asset, reason))
            })?;
        }

        self.state = EngineState {
            session_id: snapshot.session_id,
            last_epoch: snapshot.last_epoch,
            trackers: snapshot
                .trackers
                .into_iter()
                .map(|t| (t.asset, t.tracker))
                .collect(),
        };
        tracing::info!(
            session_id = %self.state.session_id,
            last_epoch = ?self.state.last_epoch,
            saved_at = %snapshot.saved_at,
            "Engine session restored"
        );
        Ok(())
    }
}
