//! Canonical serialization and fingerprinting for deterministic hashing.
//!
//! Used to fingerprint observation sets, break sets and policies so that
//! redundant reclassification can be detected and skipped.
//!
//! ## Determinism Guarantees
//!
//! - Stable field order: Struct fields serialize in declaration order
//! - Stable Vec order: Vectors serialize in index order
//! - No HashMap allowed: Use BTreeMap for maps in hashed data
//! - Policy floats are quantized to integers before hashing
//! - Observations and thresholds are fingerprinted by their exact bit
//!   patterns, so two sets share a fingerprint only if they are equal

use serde::Serialize;
use xxhash_rust::xxh64::{xxh64, Xxh64};

/// Quantization factor for float normalization.
/// Floats are multiplied by this value and rounded to i64.
pub const FLOAT_QUANTIZATION_FACTOR: f64 = 1_000_000.0;

/// Quantize a float to an i64 for deterministic hashing of policy
/// parameters. Not injective; never use it on observations.
pub fn quantize(value: f64) -> i64 {
    (value * FLOAT_QUANTIZATION_FACTOR).round() as i64
}

/// Serialize a value to canonical JSON bytes for hashing.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec(value)
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> Result<u64, serde_json::Error> {
    let bytes = to_canonical_bytes(value)?;
    Ok(xxh64(&bytes, 0))
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    canonical_hash(value).map(|h| format!("{:016x}", h))
}

/// Exact bit pattern of a float, with `-0.0` folded onto `0.0`.
pub fn exact_bits(value: f64) -> u64 {
    if value == 0.0 {
        0
    } else {
        value.to_bits()
    }
}

/// Bit patterns of the distinct values in `values`, in canonical order.
pub fn distinct_bits(values: &[f64]) -> Vec<u64> {
    let mut bits: Vec<u64> = values.iter().map(|v| exact_bits(*v)).collect();
    bits.sort_unstable();
    bits.dedup();
    bits
}

/// Hex digest of a finished hasher.
pub(crate) fn hex_digest(hasher: &Xxh64) -> String {
    format!("{:016x}", hasher.digest())
}

/// Hash of a sequence of floats by their exact bit patterns, in order.
pub fn float_fingerprint(values: impl IntoIterator<Item = f64>) -> String {
    let mut hasher = Xxh64::new(0);
    for v in values {
        hasher.update(&exact_bits(v).to_le_bytes());
    }
    hex_digest(&hasher)
}

/// Fingerprint a set of observations independent of order and duplicates.
pub fn observation_fingerprint(values: &[f64]) -> String {
    let mut hasher = Xxh64::new(0);
    for bits in distinct_bits(values) {
        hasher.update(&bits.to_le_bytes());
    }
    hex_digest(&hasher)
}
