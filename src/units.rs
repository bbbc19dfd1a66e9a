use std::sync::LazyLock;

use num_bigint::BigUint;
use num_rational::Ratio;
use num_traits::Zero;
use thiserror::Error;

const ETHER_DECIMALS: usize = 18;

static WEI_PER_ETHER: LazyLock<BigUint> =
    LazyLock::new(|| BigUint::from(10u32).pow(ETHER_DECIMALS as u32));

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid wei hex value: {0:?}")]
pub struct InvalidNumeric(pub String);

fn parse_wei_hex(hex_wei: &str) -> Result<BigUint, InvalidNumeric> {
    let digits = hex_wei
        .strip_prefix("0x")
        .or_else(|| hex_wei.strip_prefix("0X"))
        .unwrap_or(hex_wei);

    if digits.is_empty() {
        return Ok(BigUint::zero());
    }

    // BigUint parsing is lenient about '_' and '+', we are not.
    if !digits.bytes().all(|byte| byte.is_ascii_hexdigit()) {
        return Err(InvalidNumeric(hex_wei.to_string()));
    }

    BigUint::parse_bytes(digits.as_bytes(), 16).ok_or_else(|| InvalidNumeric(hex_wei.to_string()))
}

/// Converts a hex encoded wei amount, as returned by `eth_getBalance`, into a decimal ether
/// string. The result is exact, trailing fractional zeros are trimmed and whole amounts carry no
/// decimal point.
pub fn wei_hex_to_ether_string(hex_wei: &str) -> Result<String, InvalidNumeric> {
    let wei = parse_wei_hex(hex_wei)?;

    let ether = Ratio::new(wei, WEI_PER_ETHER.clone());
    let whole = ether.to_integer();
    let fraction = (ether.fract() * WEI_PER_ETHER.clone()).to_integer();

    let rendered = format!(
        "{}.{:0>width$}",
        whole,
        fraction.to_string(),
        width = ETHER_DECIMALS
    );

    Ok(rendered
        .trim_end_matches('0')
        .trim_end_matches('.')
        .to_string())
}
