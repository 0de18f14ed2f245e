//! Contract-creation style address derivation.
//!
//! `address = keccak256(rlp([creator, nonce]))[12..]`

use govwallet_types::{Address, keccak256};

/// Address of the unit created by `creator` at `nonce`.
#[must_use]
pub fn derive_address(creator: &Address, nonce: u64) -> Address {
    let mut payload = Vec::with_capacity(30);
    // 20-byte string: 0x80 + 20
    payload.push(0x94);
    payload.extend_from_slice(creator.as_bytes());
    encode_uint(nonce, &mut payload);

    // Payload is at most 30 bytes, so the short list form always applies.
    let mut list = Vec::with_capacity(payload.len() + 1);
    list.push(0xc0 + short_len(payload.len()));
    list.extend_from_slice(&payload);
    Address::from_hash_tail(&keccak256(&list))
}

fn encode_uint(n: u64, out: &mut Vec<u8>) {
    let be = n.to_be_bytes();
    match n {
        0 => out.push(0x80),
        1..=0x7f => out.push(be[7]),
        _ => {
            let first = be.iter().position(|b| *b != 0).unwrap_or(7);
            out.push(0x80 + short_len(be.len() - first));
            out.extend_from_slice(&be[first..]);
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn short_len(len: usize) -> u8 {
    debug_assert!(len < 56);
    len as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn creator() -> Address {
        "0x6ac7ea33f8831ea9dcc53393aaa88b25a785dbf0".parse().unwrap()
    }

    #[test]
    fn known_creation_addresses() {
        let cases = [
            (0, "0xcd234a471b72ba2f1ccf0a70fcaba648a5eecd8d"),
            (1, "0x343c43a37d37dff08ae8c4a11544c718abb4fcf8"),
            (128, "0x08e190dcb7b73f5fcdabb43e102215c83659a76d"),
            (256, "0x3837c1ae70354f670550c746580199ac6a73cb0a"),
        ];
        for (nonce, expected) in cases {
            assert_eq!(derive_address(&creator(), nonce).to_string(), expected);
        }
    }

    #[test]
    fn distinct_nonces_give_distinct_addresses() {
        let a = derive_address(&creator(), 5);
        let b = derive_address(&creator(), 6);
        assert_ne!(a, b);
        assert!(!a.is_zero());
    }
}
