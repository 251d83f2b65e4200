//! Configuration and input validation logic.

use crate::config::loader::Config;
use crate::error::{Error, Result};
use url::Url;

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_base_url(&config.source.base_url)?;
    validate_concurrency(config.export.attachment_concurrency)?;
    validate_gateways(&config.ipfs.gateways)?;

    Ok(())
}

/// Validate the snapshot base URL.
pub fn validate_base_url(base_url: &str) -> Result<()> {
    if base_url.is_empty() {
        return Err(Error::MissingConfig("source.base_url".to_string()));
    }

    let url = Url::parse(base_url)?;
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(Error::ConfigValidation {
            field: "source.base_url".to_string(),
            message: format!("Unsupported scheme '{}'", url.scheme()),
        });
    }

    Ok(())
}

/// Validate the attachment concurrency limit.
pub fn validate_concurrency(limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(Error::ConfigValidation {
            field: "export.attachment_concurrency".to_string(),
            message: "Concurrency must be at least 1".to_string(),
        });
    }

    Ok(())
}

/// Validate IPFS gateway URLs.
pub fn validate_gateways<S: AsRef<str>>(gateways: &[S]) -> Result<()> {
    if gateways.is_empty() {
        return Err(Error::MissingConfig(
            "ipfs.gateways (at least one gateway required)".to_string(),
        ));
    }

    for gateway in gateways {
        let gateway = gateway.as_ref();
        Url::parse(gateway).map_err(|e| Error::ConfigValidation {
            field: "ipfs.gateways".to_string(),
            message: format!("Invalid gateway '{}': {}", gateway, e),
        })?;
    }

    Ok(())
}

/// Parse a character ID the way a user types it.
///
/// Leading digits are accepted (`"42abc"` is 42); anything without a
/// leading integer is rejected.
pub fn parse_character_id(input: &str) -> Result<i64> {
    let trimmed = input.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());

    digits[..end]
        .parse::<i64>()
        .map(|id| sign * id)
        .map_err(|_| Error::InvalidCharacterId(input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_character_id() {
        assert_eq!(parse_character_id("52055").unwrap(), 52055);
        assert_eq!(parse_character_id("  7 ").unwrap(), 7);
        assert_eq!(parse_character_id("42abc").unwrap(), 42);
        assert_eq!(parse_character_id("-3").unwrap(), -3);
    }

    #[test]
    fn test_parse_character_id_invalid() {
        assert!(matches!(
            parse_character_id("abc"),
            Err(Error::InvalidCharacterId(_))
        ));
        assert!(parse_character_id("").is_err());
        assert!(parse_character_id("-").is_err());
    }

    #[test]
    fn test_validate_config_defaults() {
        assert!(validate_config(&Config::default()).is_ok());
    }

    #[test]
    fn test_zero_concurrency_rejected() {
        assert!(validate_concurrency(0).is_err());
        assert!(validate_concurrency(1).is_ok());
    }

    #[test]
    fn test_gateways() {
        assert!(validate_gateways::<&str>(&[]).is_err());
        assert!(validate_gateways(&["not a url"]).is_err());
        assert!(validate_gateways(&["https://ipfs.io/ipfs/"]).is_ok());
    }

    #[test]
    fn test_base_url_scheme() {
        assert!(validate_base_url("ftp://example.com").is_err());
        assert!(validate_base_url("").is_err());
        assert!(validate_base_url("http://127.0.0.1:3000").is_ok());
    }
}
