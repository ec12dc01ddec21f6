use std::collections::HashMap;
use std::io::{BufRead, Write};

use anyhow::{bail, Context, Result};
use serde::Serialize;

use crate::engine::DecisionEngine;
use crate::model::WeightVector;

/// One parsed input row: an epoch and a price per configured asset.
#[derive(Debug, Clone, PartialEq)]
pub struct TickRow {
    pub epoch: u64,
    pub prices: HashMap<String, f64>,
}

#[derive(Debug, Serialize)]
struct DecisionRecord<'a> {
    epoch: u64,
    weights: &'a WeightVector,
}

/// Parse `epoch,price_1,...,price_n` with prices in `assets` order.
///
/// Blank lines, `#` comments and a header row starting with `epoch` yield `Ok(None)`.
pub fn parse_tick_row(line: &str, assets: &[String]) -> Result<Option<TickRow>> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    if line
        .split(',')
        .next()
        .is_some_and(|f| f.trim().eq_ignore_ascii_case("epoch"))
    {
        return Ok(None);
    }

    let fields: Vec<&str> = line.split(',').map(str::trim).collect();
    if fields.len() != assets.len() + 1 {
        bail!(
            "expected {} fields (epoch + {} prices), got {}",
            assets.len() + 1,
            assets.len(),
            fields.len()
        );
    }

    let epoch: u64 = fields[0]
        .parse()
        .with_context(|| format!("invalid epoch '{}'", fields[0]))?;
    let mut prices = HashMap::with_capacity(assets.len());
    for (asset, raw) in assets.iter().zip(&fields[1..]) {
        let price: f64 = raw
            .parse()
            .with_context(|| format!("invalid price '{}' for {}", raw, asset))?;
        prices.insert(asset.clone(), price);
    }
    Ok(Some(TickRow { epoch, prices }))
}

/// Drive `engine` with every row of `input`, writing one JSON decision per row.
/// Returns the number of decisions written.
pub fn replay<R: BufRead, W: Write>(
    engine: &mut DecisionEngine,
    input: R,
    mut output: W,
) -> Result<usize> {
    let assets = engine.assets().to_vec();
    let mut written = 0;
    for (idx, line) in input.lines().enumerate() {
        let line_no = idx + 1;
        let line = line.with_context(|| format!("failed to read line {}", line_no))?;
        let Some(row) =
            parse_tick_row(&line, &assets).with_context(|| format!("line {}", line_no))?
        else {
            continue;
        };

        let weights = engine
            .decide(row.epoch, &row.prices)
            .with_context(|| format!("line {}: decision failed", line_no))?;
        let record = DecisionRecord {
            epoch: row.epoch,
            weights: &weights,
        };
        serde_json::to_writer(&mut output, &record).context("failed to encode decision")?;
        writeln!(output).context("failed to write decision")?;
        written += 1;
    }
    output.flush().context("failed to flush output")?;
    Ok(written)
}
