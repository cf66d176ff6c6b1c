//! Wallet address validation and display formatting.

use crate::error::{WalletError, WalletResult};

/// Length of a TON user-friendly address (base64url, 36 bytes).
pub const TON_ADDRESS_LEN: usize = 48;

/// Address families the storefront accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressKind {
    /// `EQ...` / `UQ...` user-friendly form.
    Ton,
    /// `0x` + 40 hex digits.
    Evm,
}

/// Shortens an address for the header badge: first six, `...`, last four.
///
/// ## Example
/// ```rust
/// use aqua_wallet::address::shorten_address;
///
/// assert_eq!(
///     shorten_address("EQD4FPq-PRDieyQKkizFTRtSDyucUIqrj0v_zXJmqaDp6_0t"),
///     "EQD4FP...6_0t"
/// );
/// assert_eq!(shorten_address("short"), "short");
/// ```
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 10 {
        return address.to_string();
    }

    let head: String = chars[..6].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

pub fn is_valid_ton_address(address: &str) -> bool {
    address.len() == TON_ADDRESS_LEN
        && address
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub fn is_valid_evm_address(address: &str) -> bool {
    match address.strip_prefix("0x") {
        Some(hex) => hex.len() == 40 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

/// Classifies an address, rejecting anything unrecognised.
pub fn validate_address(address: &str) -> WalletResult<AddressKind> {
    let address = address.trim();

    if is_valid_ton_address(address) {
        Ok(AddressKind::Ton)
    } else if is_valid_evm_address(address) {
        Ok(AddressKind::Evm)
    } else {
        Err(WalletError::InvalidAddress(address.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MERCHANT: &str = "EQD4FPq-PRDieyQKkizFTRtSDyucUIqrj0v_zXJmqaDp6_0t";

    #[test]
    fn test_ton_address() {
        assert!(is_valid_ton_address(MERCHANT));
        assert!(!is_valid_ton_address(&MERCHANT[..47]));
        assert!(!is_valid_ton_address(&MERCHANT.replace('-', "+")));
    }

    #[test]
    fn test_evm_address() {
        assert!(is_valid_evm_address("0x52908400098527886E0F7030069857D2E4169EE7"));
        assert!(!is_valid_evm_address("52908400098527886E0F7030069857D2E4169EE7"));
        assert!(!is_valid_evm_address("0x5290840009852788"));
        assert!(!is_valid_evm_address("0xZZ908400098527886E0F7030069857D2E4169EE7"));
    }

    #[test]
    fn test_validate_address() {
        assert_eq!(validate_address(MERCHANT), Ok(AddressKind::Ton));
        assert_eq!(
            validate_address(" 0x52908400098527886E0F7030069857D2E4169EE7 "),
            Ok(AddressKind::Evm)
        );
        assert!(matches!(
            validate_address("not-an-address"),
            Err(WalletError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_shorten_address() {
        assert_eq!(shorten_address(MERCHANT), "EQD4FP...6_0t");
        assert_eq!(
            shorten_address("0x52908400098527886E0F7030069857D2E4169EE7"),
            "0x5290...9EE7"
        );
        assert_eq!(shorten_address(""), "");
    }
}
