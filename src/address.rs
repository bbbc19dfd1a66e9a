use std::{fmt, str::FromStr};

use thiserror::Error;

const ADDRESS_HEX_LEN: usize = 40;

#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid ethereum address")]
pub struct InvalidAddress;

/// An execution layer account address, `0x` followed by 40 hex characters. Casing is kept as
/// given, checksums are not verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address(String);

impl Address {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Address {
    type Err = InvalidAddress;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("0x").ok_or(InvalidAddress)?;

        if digits.len() != ADDRESS_HEX_LEN || hex::decode(digits).is_err() {
            return Err(InvalidAddress);
        }

        Ok(Self(s.to_string()))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
