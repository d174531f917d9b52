//! Format checks and conversions for EVM chain data.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{HarnessError, HarnessResult};

static ADDRESS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x[a-fA-F0-9]{40}$").unwrap());
static HASH_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x[a-fA-F0-9]{64}$").unwrap());
static HEX_NUMBER_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^0x[a-fA-F0-9]+$").unwrap());

const WEI_PER_ETHER: u128 = 1_000_000_000_000_000_000;

/// `0x` followed by exactly 40 hex digits.
pub fn is_valid_ethereum_address(address: &str) -> bool {
    ADDRESS_RE.is_match(address)
}

/// `0x` followed by exactly 64 hex digits.
pub fn is_valid_transaction_hash(hash: &str) -> bool {
    HASH_RE.is_match(hash)
}

/// Block hashes share the transaction hash format.
pub fn is_valid_block_hash(hash: &str) -> bool {
    HASH_RE.is_match(hash)
}

/// `0x` followed by at least one hex digit.
pub fn is_valid_hex_number(value: &str) -> bool {
    HEX_NUMBER_RE.is_match(value)
}

/// Parses a base-16 number, with or without a `0x` prefix.
pub fn hex_to_decimal(hex: &str) -> HarnessResult<u128> {
    let digits = hex
        .strip_prefix("0x")
        .or_else(|| hex.strip_prefix("0X"))
        .unwrap_or(hex);
    u128::from_str_radix(digits, 16)
        .map_err(|e| HarnessError::InvalidQuantity(format!("{hex:?} is not a hex number: {e}")))
}

/// Parses a quantity that is either `0x`-prefixed hex or plain decimal.
///
/// The provider serializes block numbers and receipt fields as decimal
/// strings while older payloads use hex.
pub fn parse_quantity(value: &str) -> HarnessResult<u128> {
    if value.starts_with("0x") || value.starts_with("0X") {
        return hex_to_decimal(value);
    }
    value
        .parse::<u128>()
        .map_err(|e| HarnessError::InvalidQuantity(format!("{value:?} is not a number: {e}")))
}

/// Renders a wei amount (decimal string) as ether with 18 fractional digits.
pub fn wei_to_ether(wei: &str) -> HarnessResult<String> {
    let wei = wei
        .parse::<u128>()
        .map_err(|e| HarnessError::InvalidQuantity(format!("{wei:?} is not a wei amount: {e}")))?;
    Ok(format!("{}.{:018}", wei / WEI_PER_ETHER, wei % WEI_PER_ETHER))
}
