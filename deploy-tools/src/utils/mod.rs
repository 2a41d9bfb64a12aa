// Copyright 2025, Offchain Labs, Inc.
// For licensing, see https://github.com/OffchainLabs/stylus-sdk-rs/blob/main/licenses/COPYRIGHT.md

//! General purpose utilities.

use color::Color;

pub mod color;

/// Pretty-prints an amount of gas.
pub fn format_gas(gas: u128) -> String {
    let text = format!("{gas} gas");
    if gas <= 3_000_000 {
        text.mint()
    } else if gas <= 7_000_000 {
        text.yellow()
    } else {
        text.pink()
    }
}

/// Decodes hex text with or without a `0x` prefix.
pub fn decode0x(text: impl AsRef<str>) -> Result<Vec<u8>, hex::FromHexError> {
    let text = text.as_ref().trim();
    let text = text.strip_prefix("0x").unwrap_or(text);
    hex::decode(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_with_and_without_prefix() {
        assert_eq!(decode0x("0xdead").unwrap(), vec![0xde, 0xad]);
        assert_eq!(decode0x(" beef\n").unwrap(), vec![0xbe, 0xef]);
        assert!(decode0x("0xzz").is_err());
    }

    #[test]
    fn gas_colour_bands() {
        use color::{MINT, PINK, YELLOW};
        assert!(format_gas(21_000).starts_with(MINT));
        assert!(format_gas(5_000_000).starts_with(YELLOW));
        assert!(format_gas(9_000_000).starts_with(PINK));
    }
}
