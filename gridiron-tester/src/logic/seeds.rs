use anyhow::{Result, bail};
use std::collections::BTreeSet;

/// Seeds the `default` keyword expands to.
pub const DEFAULT_SEEDS: [u64; 4] = [1337, 2024, 0xC0FF_EE00, 0x5EED];

/// Seed metadata used for logic and playability analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedInfo {
    pub seed: u64,
    /// Token the seed was parsed from.
    pub label: String,
}

impl SeedInfo {
    #[must_use]
    pub fn from_numeric(seed: u64) -> Self {
        Self {
            seed,
            label: seed.to_string(),
        }
    }

    fn from_token(seed: u64, token: &str) -> Self {
        Self {
            seed,
            label: token.to_string(),
        }
    }
}

/// Resolve CLI seed arguments into seed metadata.
///
/// Accepts decimal integers (negative values use their magnitude), `0x`
/// hexadecimal, and the keyword `default` which expands to [`DEFAULT_SEEDS`].
/// Duplicates are dropped, first occurrence wins.
///
/// # Errors
///
/// Fails on any token that is not a seed, or when nothing remains.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<SeedInfo>> {
    let mut resolved = Vec::new();
    let mut seen = BTreeSet::new();
    let mut push = |info: SeedInfo| {
        if seen.insert(info.seed) {
            resolved.push(info);
        }
    };

    for token in tokens.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
        if token.eq_ignore_ascii_case("default") {
            DEFAULT_SEEDS.into_iter().map(SeedInfo::from_numeric).for_each(&mut push);
            continue;
        }
        if let Some(hex) = token.strip_prefix("0x").or_else(|| token.strip_prefix("0X")) {
            match u64::from_str_radix(&hex.replace('_', ""), 16) {
                Ok(value) => push(SeedInfo::from_token(value, token)),
                Err(err) => bail!("invalid hex seed '{token}': {err}"),
            }
            continue;
        }
        if let Ok(value) = token.parse::<u64>() {
            push(SeedInfo::from_token(value, token));
            continue;
        }
        if let Ok(value) = token.parse::<i64>() {
            push(SeedInfo::from_token(value.unsigned_abs(), token));
            continue;
        }
        bail!("unrecognized seed '{token}'");
    }

    if resolved.is_empty() {
        bail!("no seeds provided");
    }
    Ok(resolved)
}
