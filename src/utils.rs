use anyhow::{anyhow, Result};
use ethers::types::{Address, TxHash, U256};

/// Fixed block explorer used for transaction links
pub const EXPLORER_TX_BASE: &str = "https://etherscan.io/tx/";

/// Parse a user-supplied address string.
///
/// Requires a `0x` prefix followed by 40 hex digits. All-lowercase and
/// all-uppercase input is accepted as-is; mixed case must match the EIP-55
/// checksum.
pub fn parse_address(input: &str) -> Option<Address> {
    let trimmed = input.trim();
    let body = trimmed.strip_prefix("0x")?;
    if body.len() != 40 || !body.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }

    let address: Address = trimmed.parse().ok()?;

    let has_lower = body.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = body.chars().any(|c| c.is_ascii_uppercase());
    if has_lower && has_upper && ethers::utils::to_checksum(&address, None) != trimmed {
        return None;
    }

    Some(address)
}

/// Parse a human amount string as a float, returning it only when finite and positive
pub fn parse_positive_amount(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Convert a human token amount into minor units using the token's decimals
///
/// Works on the decimal string directly so no float precision is lost.
///
/// # Errors
/// Returns an error if the string is empty or not a plain decimal number, has
/// more fractional digits than the token supports, overflows 256 bits, or is zero
pub fn parse_token_amount(input: &str, decimals: u8) -> Result<U256> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(anyhow!("Amount cannot be empty"));
    }

    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let is_digits = |s: &str| s.chars().all(|c| c.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(anyhow!("Invalid amount '{}': not a plain decimal number", trimmed));
    }
    if fraction.len() > decimals as usize {
        return Err(anyhow!(
            "Invalid amount '{}': too many decimal places (token supports {})",
            trimmed,
            decimals
        ));
    }

    let digits = format!("{}{:0<width$}", whole, fraction, width = decimals as usize);
    let amount = U256::from_dec_str(&digits)
        .map_err(|_| anyhow!("Invalid amount '{}': too large for a token amount", trimmed))?;
    if amount.is_zero() {
        return Err(anyhow!("Invalid amount '{}': rounds to zero token units", trimmed));
    }
    Ok(amount)
}

/// Format a minor-unit amount back into human units
pub fn format_token_amount(amount: U256, decimals: u8) -> String {
    ethers::utils::format_units(amount, decimals as u32).unwrap_or_else(|_| amount.to_string())
}

/// Full `0x`-prefixed hex string of a transaction hash
pub fn tx_hash_hex(tx_hash: &TxHash) -> String {
    format!("0x{}", hex::encode(tx_hash.as_bytes()))
}

/// Block explorer URL for a transaction
pub fn tx_explorer_url(tx_hash: &TxHash) -> String {
    format!("{}{}", EXPLORER_TX_BASE, tx_hash_hex(tx_hash))
}

/// Shorten a hex string for display, e.g. `0x1234...abcd`
pub fn short_hex(value: &str) -> String {
    if value.len() <= 14 {
        return value.to_string();
    }
    format!("{}...{}", &value[..6], &value[value.len() - 4..])
}

/// Checksummed, shortened form of an address for display
pub fn short_address(address: &Address) -> String {
    short_hex(&ethers::utils::to_checksum(address, None))
}

#[cfg(test)]
mod tests {
    use super::*;

    const CHECKSUMMED: &str = "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed";

    // ==================== parse_address tests ====================

    #[test]
    fn test_parse_address_lowercase() {
        let addr = parse_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1beaed");
        assert!(addr.is_some());
    }

    #[test]
    fn test_parse_address_checksummed() {
        let addr = parse_address(CHECKSUMMED).unwrap();
        assert_eq!(ethers::utils::to_checksum(&addr, None), CHECKSUMMED);
    }

    #[test]
    fn test_parse_address_with_whitespace() {
        assert!(parse_address(&format!("  {}  ", CHECKSUMMED)).is_some());
    }

    #[test]
    fn test_parse_address_bad_checksum_fails() {
        // Flip the case of one letter
        let bad = CHECKSUMMED.replacen("aAeb", "aaeb", 1);
        assert!(parse_address(&bad).is_none());
    }

    #[test]
    fn test_parse_address_missing_prefix_fails() {
        assert!(parse_address("5aaeb6053f3e94c9b9a09f33669435e7ef1beaed").is_none());
    }

    #[test]
    fn test_parse_address_wrong_length_fails() {
        assert!(parse_address("0x5aaeb6053f3e94c9b9a09f33669435e7ef1bea").is_none());
        assert!(parse_address("").is_none());
        assert!(parse_address("0x").is_none());
    }

    #[test]
    fn test_parse_address_non_hex_fails() {
        assert!(parse_address("0xzzaeb6053f3e94c9b9a09f33669435e7ef1beaed").is_none());
    }

    // ==================== amount tests ====================

    #[test]
    fn test_parse_positive_amount() {
        assert_eq!(parse_positive_amount("5"), Some(5.0));
        assert_eq!(parse_positive_amount(" 0.25 "), Some(0.25));
        assert_eq!(parse_positive_amount("0"), None);
        assert_eq!(parse_positive_amount("-1"), None);
        assert_eq!(parse_positive_amount("abc"), None);
        assert_eq!(parse_positive_amount("inf"), None);
        assert_eq!(parse_positive_amount("NaN"), None);
    }

    #[test]
    fn test_parse_token_amount_eighteen_decimals() {
        let result = parse_token_amount("5", 18).unwrap();
        let expected = U256::from(5u64) * U256::exp10(18);
        assert_eq!(result, expected);
    }

    #[test]
    fn test_parse_token_amount_six_decimals() {
        assert_eq!(parse_token_amount("1.5", 6).unwrap(), U256::from(1_500_000u64));
        assert_eq!(parse_token_amount("0.000001", 6).unwrap(), U256::from(1u64));
    }

    #[test]
    fn test_parse_token_amount_empty_fails() {
        let result = parse_token_amount("   ", 18);
        assert!(result.unwrap_err().to_string().contains("empty"));
    }

    #[test]
    fn test_parse_token_amount_invalid_fails() {
        assert!(parse_token_amount("abc", 18).is_err());
    }

    #[test]
    fn test_parse_token_amount_rejects_excess_precision() {
        let err = parse_token_amount("0.0000001", 6).unwrap_err();
        assert!(err.to_string().contains("too many decimal places"));
        assert!(parse_token_amount("1.5", 0).is_err());
        assert_eq!(parse_token_amount("7", 0).unwrap(), U256::from(7u64));
    }

    #[test]
    fn test_parse_token_amount_overflow_is_error() {
        let err = parse_token_amount(&"9".repeat(70), 18).unwrap_err();
        assert!(err.to_string().contains("too large"));
    }

    #[test]
    fn test_parse_token_amount_zero_is_error() {
        assert!(parse_token_amount("0.000", 6).is_err());
        assert!(parse_token_amount("0", 18).is_err());
    }

    #[test]
    fn test_parse_token_amount_partial_forms() {
        assert_eq!(parse_token_amount(".5", 1).unwrap(), U256::from(5u64));
        assert_eq!(parse_token_amount("2.", 2).unwrap(), U256::from(200u64));
        assert!(parse_token_amount(".", 2).is_err());
        assert!(parse_token_amount("1e3", 18).is_err());
        assert!(parse_token_amount("-1", 18).is_err());
    }

    #[test]
    fn test_format_token_amount() {
        assert_eq!(format_token_amount(U256::from(1_500_000u64), 6), "1.500000");
    }

    // ==================== display helpers ====================

    #[test]
    fn test_tx_explorer_url() {
        let hash = TxHash::from_low_u64_be(0xabcdef);
        let url = tx_explorer_url(&hash);
        assert!(url.starts_with("https://etherscan.io/tx/0x"));
        assert!(url.ends_with("abcdef"));
        assert_eq!(url.len(), EXPLORER_TX_BASE.len() + 66);
    }

    #[test]
    fn test_short_hex() {
        assert_eq!(short_hex(CHECKSUMMED), "0x5aAe...eAed");
        assert_eq!(short_hex("0x1234"), "0x1234");
    }

    #[test]
    fn test_short_address() {
        let addr = parse_address(CHECKSUMMED).unwrap();
        assert_eq!(short_address(&addr), "0x5aAe...eAed");
    }
}
