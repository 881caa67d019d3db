//! Hex rendering of digests.

use crate::MD4_LEN;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Case {
    #[default]
    Upper,
    Lower,
}

/// Two hex digits per byte, in array order.
pub fn digest_to_hex(digest: &[u8], case: Case) -> String {
    match case {
        Case::Upper => hex::encode_upper(digest),
        Case::Lower => hex::encode(digest),
    }
}

/// Parse a 32 character hex string, in either case, back into a digest.
pub fn hex_to_digest(s: &str) -> Result<[u8; MD4_LEN], String> {
    let mut digest = [0u8; MD4_LEN];
    hex::decode_to_slice(s, &mut digest).map_err(|e| format!("invalid MD4 digest '{s}': {e}"))?;
    Ok(digest)
}
