use anyhow::{Result, bail};

/// Seed used when no token resolves to one.
pub const DEFAULT_SEED: u64 = 1337;

/// Resolve CLI seed tokens into distinct seeds, keeping first-seen order.
///
/// Negative integers map to their magnitude so `-7` and `7` share a stream.
pub fn resolve_seed_inputs(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds: Vec<u64> = Vec::new();

    for token in tokens {
        if token.is_empty() {
            continue;
        }

        let seed = if let Ok(value) = token.parse::<i64>() {
            value.unsigned_abs()
        } else if let Ok(value) = token.parse::<u64>() {
            value
        } else if let Some(hex) = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            && let Ok(value) = u64::from_str_radix(hex, 16)
        {
            value
        } else {
            bail!("Unrecognized seed token: {token}");
        };

        if !seeds.contains(&seed) {
            seeds.push(seed);
        }
    }

    if seeds.is_empty() {
        seeds.push(DEFAULT_SEED);
    }

    Ok(seeds)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn resolves_numeric_and_hex_tokens() {
        let seeds = resolve_seed_inputs(&tokens(&["42", "-7", "0x10", "18446744073709551615"]))
            .unwrap();
        assert_eq!(seeds, vec![42, 7, 16, u64::MAX]);
    }

    #[test]
    fn deduplicates_in_order() {
        let seeds = resolve_seed_inputs(&tokens(&["9", "3", "-9", "3"])).unwrap();
        assert_eq!(seeds, vec![9, 3]);
    }

    #[test]
    fn falls_back_to_default_seed() {
        assert_eq!(resolve_seed_inputs(&[]).unwrap(), vec![DEFAULT_SEED]);
    }

    #[test]
    fn rejects_unknown_tokens() {
        let err = resolve_seed_inputs(&tokens(&["whale"])).unwrap_err();
        assert!(err.to_string().contains("Unrecognized seed token: whale"));
    }
}
