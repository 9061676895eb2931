//! Duration token decoding.
//!
//! Requests carry the storm duration as a token like "6H" or "24H"
//! (an optional ISO-8601-style "P" prefix is accepted, e.g. "P24H").
//! Decoding stays in the command layer so the engine only ever sees
//! numeric hour counts.

use anyhow::{anyhow, Context};

/// Decodes a duration token into an hour count.
pub fn decode_duration_token(token: &str) -> anyhow::Result<f64> {
    let trimmed = token.trim();
    let trimmed = trimmed
        .strip_prefix('P')
        .or_else(|| trimmed.strip_prefix('p'))
        .unwrap_or(trimmed);
    let digits = trimmed
        .strip_suffix('H')
        .or_else(|| trimmed.strip_suffix('h'))
        .ok_or_else(|| anyhow!("invalid duration token {token:?}, expected e.g. \"6H\""))?;
    let hours: f64 = digits
        .parse()
        .with_context(|| format!("invalid duration token {token:?}"))?;
    if hours <= 0.0 {
        return Err(anyhow!("duration must be positive, got {token:?}"));
    }
    Ok(hours)
}

#[cfg(test)]
mod tests {
    use super::decode_duration_token;

    #[test]
    fn decodes_plain_tokens() {
        assert_eq!(decode_duration_token("6H").unwrap(), 6.0);
        assert_eq!(decode_duration_token("24H").unwrap(), 24.0);
        assert_eq!(decode_duration_token("12h").unwrap(), 12.0);
    }

    #[test]
    fn decodes_prefixed_tokens() {
        assert_eq!(decode_duration_token("P6H").unwrap(), 6.0);
        assert_eq!(decode_duration_token("P24H").unwrap(), 24.0);
    }

    #[test]
    fn trims_surrounding_whitespace() {
        assert_eq!(decode_duration_token(" 24H ").unwrap(), 24.0);
    }

    #[test]
    fn rejects_missing_unit() {
        assert!(decode_duration_token("24").is_err());
    }

    #[test]
    fn rejects_non_numeric_hours() {
        assert!(decode_duration_token("xH").is_err());
        assert!(decode_duration_token("H").is_err());
    }

    #[test]
    fn rejects_nonpositive_hours() {
        assert!(decode_duration_token("0H").is_err());
        assert!(decode_duration_token("-6H").is_err());
    }
}
