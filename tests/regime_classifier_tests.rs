use regime_allocator::config::{IndicatorConfig, RegimeConfig};
use regime_allocator::regime::{Regime, RegimeClassifier};
use regime_allocator::tracker::AssetTracker;

fn classifier() -> RegimeClassifier {
    RegimeClassifier::new(RegimeConfig::default())
}

fn feed(prices: &[f64]) -> AssetTracker {
    let mut t = AssetTracker::new(&IndicatorConfig::default());
    for p in prices {
        t.update(*p);
    }
    t
}

/// Choppy uptrend: alternating +up / -down moves.
fn zigzag(n: usize, start: f64, up: f64, down: f64) -> Vec<f64> {
    let mut out = vec![start];
    for i in 0..n {
        let last = out[out.len() - 1];
        out.push(if i % 2 == 0 { last + up } else { last - down });
    }
    out
}

fn score_last(prices: &[f64]) -> (AssetTracker, f64) {
    let t = feed(prices);
    let price = prices[prices.len() - 1];
    let score = classifier().score(&t, price);
    (t, score)
}

#[test]
fn undefined_long_ema_scores_zero() {
    let t = AssetTracker::new(&IndicatorConfig::default());
    let c = classifier();
    assert_eq!(c.classify(&t, 100.0), Regime::Undefined);
    assert_eq!(c.score(&t, 100.0), 0.0);
}

#[test]
fn bear_regime_is_fully_defensive() {
    let prices: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
    let (t, score) = score_last(&prices);
    assert_eq!(classifier().classify(&t, 141.0), Regime::Bear);
    assert_eq!(score, 0.0);
}

#[test]
fn price_equal_to_long_ema_is_bear() {
    let t = feed(&[80.0; 5]);
    assert_eq!(classifier().classify(&t, 80.0), Regime::Bear);
    assert_eq!(classifier().score(&t, 80.0), 0.0);
}

#[test]
fn bull_above_short_ema_scores_full() {
    // Ends on an up move: price above both EMAs, RSI around 68.
    let prices = zigzag(61, 100.0, 2.0, 1.0);
    let (t, score) = score_last(&prices);
    let price = prices[prices.len() - 1];
    assert!(price > t.ema_short().unwrap());
    assert!(t.rsi() > 45.0 && t.rsi() < 88.0);
    assert_eq!(score, 1.0);
}

#[test]
fn bull_pullback_with_neutral_rsi_scores_partial() {
    // Steady climb, then a gentle slide that stays inside the drawdown limit.
    let mut prices: Vec<f64> = (0..80).map(|i| 100.0 + i as f64).collect();
    let top = prices[prices.len() - 1];
    for k in 1..=15 {
        prices.push(top * (1.0 - 0.0018f64).powi(k));
    }
    let (t, score) = score_last(&prices);
    let price = prices[prices.len() - 1];
    assert_eq!(classifier().classify(&t, price), Regime::Bull);
    assert!(price <= t.ema_short().unwrap());
    assert!(t.rsi() >= 45.0);
    assert!((score - 0.6).abs() < f64::EPSILON);
}

#[test]
fn bull_pullback_with_oversold_rsi_scores_full() {
    let mut prices = zigzag(80, 100.0, 2.0, 1.0);
    for i in 0..19 {
        let last = prices[prices.len() - 1];
        prices.push(if i % 2 == 0 { last - 0.8 } else { last + 0.3 });
    }
    let (t, score) = score_last(&prices);
    let price = prices[prices.len() - 1];
    assert_eq!(classifier().classify(&t, price), Regime::Bull);
    assert!(price <= t.ema_short().unwrap());
    assert!(t.rsi() < 45.0);
    assert_eq!(score, 1.0);
}

#[test]
fn overbought_rsi_overrides_to_reduced_score() {
    // Nine +1 moves, then one -0.5 move, repeated: RSI in the low 90s.
    let mut prices = vec![100.0];
    for i in 0..70 {
        let last = prices[prices.len() - 1];
        prices.push(if i % 10 == 9 { last - 0.5 } else { last + 1.0 });
    }
    let (t, score) = score_last(&prices);
    assert!(t.rsi() > 88.0 && t.rsi() <= 95.0, "rsi {}", t.rsi());
    assert!((score - 0.7).abs() < f64::EPSILON);
}

#[test]
fn blowoff_rsi_zeroes_score() {
    let prices: Vec<f64> = (0..70).map(|i| 100.0 + i as f64).collect();
    let (t, score) = score_last(&prices);
    assert_eq!(t.rsi(), 100.0);
    assert_eq!(score, 0.0);
}

#[test]
fn drawdown_veto_overrides_bullish_regime() {
    let mut prices = zigzag(61, 100.0, 2.0, 1.0);
    let window_max = prices[prices.len() - 15..]
        .iter()
        .copied()
        .fold(f64::MIN, f64::max);
    prices.push(window_max * 0.96);

    let t = feed(&prices);
    let price = prices[prices.len() - 1];
    let c = classifier();
    assert_eq!(c.classify(&t, price), Regime::Bull);
    assert!(c.drawdown_vetoed(&t, price));
    assert_eq!(c.score(&t, price), 0.0);

    // Same tracker with a looser drawdown limit keeps exposure.
    let loose = RegimeClassifier::new(RegimeConfig {
        max_drawdown: 0.10,
        ..RegimeConfig::default()
    });
    assert!(loose.score(&t, price) > 0.0);
}

#[test]
fn drawdown_inside_limit_is_not_vetoed() {
    let mut prices = zigzag(61, 100.0, 2.0, 1.0);
    let last = prices[prices.len() - 1];
    prices.push(last * 0.98);
    let t = feed(&prices);
    let price = prices[prices.len() - 1];
    assert!(!classifier().drawdown_vetoed(&t, price));
    assert!(classifier().score(&t, price) > 0.0);
}
