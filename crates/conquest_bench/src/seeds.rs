use anyhow::{bail, Context, Result};

/// Upper bound on seeds produced by a range.
const MAX_SEEDS: u64 = 100_000;

/// Parses a seed list: `7`, `1,2,9`, `1..=32` or `1..33`.
pub fn parse_seeds(spec: &str) -> Result<Vec<u64>> {
    let spec = spec.trim();
    let seeds: Vec<u64> = if let Some((start, end)) = spec.split_once("..=") {
        let (start, end) = (parse_one(start)?, parse_one(end)?);
        check_range_len(spec, end.saturating_sub(start).saturating_add(1))?;
        (start..=end).collect()
    } else if let Some((start, end)) = spec.split_once("..") {
        let (start, end) = (parse_one(start)?, parse_one(end)?);
        check_range_len(spec, end.saturating_sub(start))?;
        (start..end).collect()
    } else {
        spec.split(',').map(parse_one).collect::<Result<_>>()?
    };
    if seeds.is_empty() {
        bail!("seed spec '{spec}' produces no seeds");
    }
    Ok(seeds)
}

fn check_range_len(spec: &str, len: u64) -> Result<()> {
    if len > MAX_SEEDS {
        bail!("seed spec '{spec}' spans {len} seeds, limit is {MAX_SEEDS}");
    }
    Ok(())
}

fn parse_one(text: &str) -> Result<u64> {
    text.trim()
        .parse()
        .with_context(|| format!("invalid seed '{}'", text.trim()))
}
