//! Stable seed derivation.
//!
//! Visual seeds are derived from a token id and a network id with 32-bit
//! FNV-1a. Nested stages derive their own seeds arithmetically from a parent
//! seed so each stage can be regenerated on its own.

/// Visual seeds are kept to 31 bits so they stay non-negative when read as a
/// signed 32-bit integer.
pub const SEED_MASK: u32 = 0x7FFF_FFFF;

const FNV_OFFSET_BASIS: u32 = 0x811C_9DC5;
const FNV_PRIME: u32 = 0x0100_0193;

/// Unit separator placed between the token id and the network id.
const FIELD_SEPARATOR: u8 = 0x1F;

/// Multiplier applied to sub-seed offsets.
pub const SUB_SEED_STRIDE: u32 = 1000;

/// 32-bit FNV-1a over `bytes`.
pub fn fnv1a32(bytes: &[u8]) -> u32 {
    bytes.iter().fold(FNV_OFFSET_BASIS, |hash, &byte| {
        (hash ^ u32::from(byte)).wrapping_mul(FNV_PRIME)
    })
}

/// Visual seed for a token on a given network.
pub fn visual_seed(token_id: &str, network_id: &str) -> u32 {
    let mut bytes = Vec::with_capacity(token_id.len() + network_id.len() + 1);
    bytes.extend_from_slice(token_id.as_bytes());
    bytes.push(FIELD_SEPARATOR);
    bytes.extend_from_slice(network_id.as_bytes());
    fnv1a32(&bytes) & SEED_MASK
}

/// Seed for a nested generator: `seed + offset * 1000` (wrapping).
pub fn sub_seed(seed: u32, offset: u32) -> u32 {
    seed.wrapping_add(offset.wrapping_mul(SUB_SEED_STRIDE))
}

/// Per-instance seed within a stream: the stream seed mixed with a
/// golden-ratio multiple of `index + 1`.
pub fn indexed_seed(stream_seed: u32, index: u32) -> u32 {
    stream_seed ^ index.wrapping_add(1).wrapping_mul(GOLDEN_GAMMA)
}

const GOLDEN_GAMMA: u32 = 0x9E37_79B9;
