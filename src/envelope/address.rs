//! Ethereum account addresses.
//!
//! An address is the last 20 bytes of the Keccak-256 hash of the
//! uncompressed secp256k1 public key (the 64 coordinate bytes, without
//! the `0x04` tag), written in EIP-55 mixed-case hex.

use k256::elliptic_curve::sec1::ToEncodedPoint;
use k256::SecretKey;
use sha3::{Digest, Keccak256};

use crate::errors::{KeySealError, Result};

/// Length of an address in bytes.
pub const ADDRESS_LEN: usize = 20;

/// Checksummed address of the account controlled by `private_key`.
///
/// Zero and values at or above the curve order are not valid keys.
pub fn address_of(private_key: &[u8; 32]) -> Result<String> {
    let secret = SecretKey::from_slice(private_key).map_err(|_| {
        KeySealError::InvalidInput("private key is not a valid secp256k1 scalar".into())
    })?;
    let point = secret.public_key().to_encoded_point(false);
    let hash = Keccak256::digest(&point.as_bytes()[1..]);

    let mut address = [0u8; ADDRESS_LEN];
    address.copy_from_slice(&hash[hash.len() - ADDRESS_LEN..]);
    Ok(to_checksum(&address))
}

/// EIP-55 encoding: a hex letter is upper-cased when the matching nibble
/// of Keccak-256(lowercase hex) is 8 or more.
pub fn to_checksum(address: &[u8; ADDRESS_LEN]) -> String {
    let lower = hex::encode(address);
    let hash = Keccak256::digest(lower.as_bytes());

    let mut out = String::with_capacity(2 + lower.len());
    out.push_str("0x");
    for (i, c) in lower.chars().enumerate() {
        let nibble = if i % 2 == 0 {
            hash[i / 2] >> 4
        } else {
            hash[i / 2] & 0x0f
        };
        if nibble >= 8 {
            out.push(c.to_ascii_uppercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// True when `a` and `b` name the same address, ignoring letter case and
/// an optional `0x` prefix.
pub fn same_address(a: &str, b: &str) -> bool {
    fn digits(s: &str) -> &str {
        let s = s.trim();
        s.strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s)
    }
    digits(a).eq_ignore_ascii_case(digits(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(hex_str: &str) -> [u8; 32] {
        hex::decode(hex_str).unwrap().try_into().unwrap()
    }

    #[test]
    fn known_development_accounts() {
        assert_eq!(
            address_of(&key(
                "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80"
            ))
            .unwrap(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
        );
        assert_eq!(
            address_of(&key(
                "59c6995e998f97a5a0044966f0945389dc9e86dae88c7a8412f4603b6b78690d"
            ))
            .unwrap(),
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
        );
    }

    #[test]
    fn checksum_matches_eip55_examples() {
        for expected in [
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xfB6916095ca1df60bB79Ce92cE3Ea74c37c5d359",
            "0xdbF03B407c01E7cD3CBea99509d93f8DDDC8C6FB",
            "0xD1220A0cf47c7B9Be7A2E6BA89F429762e7b9aDb",
        ] {
            let raw: [u8; ADDRESS_LEN] = hex::decode(&expected[2..].to_lowercase())
                .unwrap()
                .try_into()
                .unwrap();
            assert_eq!(to_checksum(&raw), expected);
        }
    }

    #[test]
    fn zero_and_out_of_range_scalars_are_rejected() {
        assert!(matches!(
            address_of(&[0u8; 32]),
            Err(KeySealError::InvalidInput(_))
        ));
        assert!(address_of(&[0xffu8; 32]).is_err());
    }

    #[test]
    fn address_comparison_ignores_case_and_prefix() {
        assert!(same_address(
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
            "f39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        ));
        assert!(!same_address(
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266",
            "0x70997970C51812dc3A010C7d01b50e0d17dc79C8"
        ));
    }
}
