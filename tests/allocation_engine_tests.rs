use regime_allocator::allocation::{AllocationEngine, AssetSignal};
use regime_allocator::config::AllocationConfig;
use regime_allocator::model::WeightVector;

fn engine() -> AllocationEngine {
    AllocationEngine::new(&AllocationConfig::default())
}

fn pair(score_a: f64, vol_a: f64, score_b: f64, vol_b: f64) -> Vec<AssetSignal> {
    vec![
        AssetSignal::new("Asset A", score_a, vol_a),
        AssetSignal::new("Asset B", score_b, vol_b),
    ]
}

fn assert_valid(w: &WeightVector) {
    for (asset, v) in w.assets() {
        assert!((0.0..=1.0).contains(&v), "{} weight {} out of range", asset, v);
    }
    assert!(w.cash() >= 0.0);
    assert!((w.total() - 1.0).abs() < 1e-9, "sum {}", w.total());
}

#[test]
fn zero_scores_go_all_cash() {
    let w = engine().allocate(&pair(0.0, 0.01, 0.0, 0.0));
    assert_eq!(w.weight("Asset A"), Some(0.0));
    assert_eq!(w.weight("Asset B"), Some(0.0));
    assert_eq!(w.cash(), 1.0);
    assert!(w.is_all_cash());
}

#[test]
fn lower_volatility_gets_more_weight_at_equal_score() {
    let w = engine().allocate(&pair(1.0, 0.01, 1.0, 0.02));
    let a = w.weight("Asset A").unwrap();
    let b = w.weight("Asset B").unwrap();
    assert!(a > b);
    assert!((a - 2.0 / 3.0).abs() < 1e-12);
    assert!((b - 1.0 / 3.0).abs() < 1e-12);
    assert_valid(&w);
}

#[test]
fn exposure_is_capped_by_strongest_score() {
    let w = engine().allocate(&pair(0.6, 0.01, 0.6, 0.01));
    assert!((w.weight("Asset A").unwrap() - 0.3).abs() < 1e-12);
    assert!((w.weight("Asset B").unwrap() - 0.3).abs() < 1e-12);
    assert!((w.cash() - 0.4).abs() < 1e-12);
}

#[test]
fn unscored_asset_gets_nothing() {
    let w = engine().allocate(&pair(0.7, 0.03, 0.0, 0.001));
    assert!((w.weight("Asset A").unwrap() - 0.7).abs() < 1e-12);
    assert_eq!(w.weight("Asset B"), Some(0.0));
    assert!((w.cash() - 0.3).abs() < 1e-12);
}

#[test]
fn volatility_below_floor_is_floored() {
    // Both volatilities floor to 0.002, so equal scores split evenly.
    let w = engine().allocate(&pair(1.0, 0.0, 1.0, 0.0015));
    assert!((w.weight("Asset A").unwrap() - 0.5).abs() < 1e-12);
    assert!((w.weight("Asset B").unwrap() - 0.5).abs() < 1e-12);
    assert_valid(&w);
}

#[test]
fn non_finite_inputs_never_leak_into_weights() {
    let w = engine().allocate(&pair(f64::NAN, 0.01, 1.0, f64::INFINITY));
    assert_eq!(w.cash(), 1.0);
    assert_valid(&w);

    let w = engine().allocate(&pair(1.0, f64::NAN, 0.5, 0.01));
    assert_eq!(w.weight("Asset A"), Some(0.0));
    assert_valid(&w);

    // A subnormal floor overflows 1/vol to infinity.
    let tiny = AllocationEngine::new(&AllocationConfig {
        volatility_floor: 1e-310,
    });
    let w = tiny.allocate(&pair(1.0, 0.0, 1.0, 0.0));
    assert!(w.assets().all(|(_, v)| v.is_finite()));
    assert_eq!(w.cash(), 1.0);
    assert_valid(&w);
}

#[test]
fn weights_are_valid_across_degenerate_grid() {
    let scores = [0.0, 0.6, 0.7, 1.0];
    let vols = [0.0, 0.001, 0.002, 0.0137, 0.5];
    for sa in scores {
        for sb in scores {
            for va in vols {
                for vb in vols {
                    let w = engine().allocate(&pair(sa, va, sb, vb));
                    assert_valid(&w);
                    let max_score = sa.max(sb);
                    assert!(w.exposure() <= max_score + 1e-12);
                }
            }
        }
    }
}

#[test]
fn single_asset_takes_full_conviction() {
    let w = engine().allocate(&[AssetSignal::new("BTC", 1.0, 0.03)]);
    assert!((w.weight("BTC").unwrap() - 1.0).abs() < 1e-12);
    assert!(w.cash().abs() < 1e-12);
}

#[test]
fn empty_universe_is_all_cash() {
    let w = engine().allocate(&[]);
    assert_eq!(w.cash(), 1.0);
    assert_eq!(w.assets().count(), 0);
}
