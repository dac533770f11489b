//! Lisk32 address encoding.
//!
//! A Lisk address is the first 20 bytes of `sha256(publicKey)`. Its text form is `lsk`
//! followed by the address in a custom base32 alphabet and a 6 symbol BCH checksum.

use sha2::{Digest, Sha256};

pub const PREFIX: &str = "lsk";
pub const ADDRESS_LEN: usize = 20;
/// `lsk` + 32 data symbols + 6 checksum symbols.
pub const LISK32_LEN: usize = 41;

const CHARSET: &[u8; 32] = b"zxvcpmbn3465o978uyrtkqew2adsjhfg";
const GENERATOR: [u32; 5] = [0x3b6a57b2, 0x26508e6d, 0x1ea119fa, 0x3d4233dd, 0x2a1462b3];
const CHECKSUM_LEN: usize = 6;

/// Binary address of an Ed25519 public key.
pub fn address_from_public_key(public_key: &[u8; 32]) -> [u8; ADDRESS_LEN] {
    let digest = Sha256::digest(public_key);
    let mut out = [0u8; ADDRESS_LEN];
    out.copy_from_slice(&digest[..ADDRESS_LEN]);
    out
}

pub fn lisk32_from_public_key(public_key: &[u8; 32]) -> String {
    address_to_lisk32(&address_from_public_key(public_key))
}

pub fn address_to_lisk32(address: &[u8; ADDRESS_LEN]) -> String {
    let mut symbols = regroup_bits(address);
    let checksum = create_checksum(&symbols);
    symbols.extend_from_slice(&checksum);

    let mut out = String::with_capacity(LISK32_LEN);
    out.push_str(PREFIX);
    for s in symbols {
        out.push(CHARSET[s as usize] as char);
    }
    out
}

/// Check prefix, length, alphabet and checksum of a Lisk32 string.
pub fn validate_lisk32(text: &str) -> bool {
    if text.len() != LISK32_LEN || !text.starts_with(PREFIX) {
        return false;
    }
    let mut symbols = Vec::with_capacity(LISK32_LEN - PREFIX.len());
    for c in text[PREFIX.len()..].bytes() {
        match CHARSET.iter().position(|&x| x == c) {
            Some(v) => symbols.push(v as u8),
            None => return false,
        }
    }
    polymod(&symbols) == 1
}

/// 8-bit bytes -> 5-bit symbols (160 bits fit exactly, no padding needed).
fn regroup_bits(bytes: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity((bytes.len() * 8 + 4) / 5);
    let mut acc: u32 = 0;
    let mut bits = 0u32;
    for &b in bytes {
        acc = ((acc << 8) | u32::from(b)) & 0xffff;
        bits += 8;
        while bits >= 5 {
            bits -= 5;
            out.push(((acc >> bits) & 31) as u8);
        }
    }
    if bits > 0 {
        out.push(((acc << (5 - bits)) & 31) as u8);
    }
    out
}

fn polymod(symbols: &[u8]) -> u32 {
    let mut chk: u32 = 1;
    for &v in symbols {
        let top = chk >> 25;
        chk = ((chk & 0x1ff_ffff) << 5) ^ u32::from(v);
        for (i, g) in GENERATOR.iter().enumerate() {
            if (top >> i) & 1 == 1 {
                chk ^= g;
            }
        }
    }
    chk
}

fn create_checksum(symbols: &[u8]) -> [u8; CHECKSUM_LEN] {
    let mut values = symbols.to_vec();
    values.extend_from_slice(&[0u8; CHECKSUM_LEN]);
    let m = polymod(&values) ^ 1;
    let mut out = [0u8; CHECKSUM_LEN];
    for (p, slot) in out.iter_mut().enumerate() {
        *slot = ((m >> (5 * (5 - p))) & 31) as u8;
    }
    out
}
