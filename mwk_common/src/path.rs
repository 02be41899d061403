//! BIP32 paths as strings of the form `m/45'/0/1`.
//!
//! Only the `'` hardening marker is accepted and segments must be canonical decimal numbers.

use bitcoin::bip32::{ChildNumber, DerivationPath};

/// Root of the P2SH multisig derivation tree
pub const MULTISIG_ROOT: &str = "m/45'";

/// First hardened index
pub const HARDENING_OFFSET: u32 = 0x8000_0000;

#[allow(missing_docs)]
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PathError {
    #[error("BIP32 path cannot be blank.")]
    Blank,

    #[error("BIP32 path is invalid.")]
    Invalid,

    #[error("BIP32 path must be fully-hardened.")]
    MustBeHardened,

    #[error("BIP32 path cannot include hardened segments.")]
    CannotBeHardened,

    #[error("Invalid BIP32 index.")]
    InvalidIndex,

    #[error("BIP32 index is too high.")]
    IndexTooHigh,

    #[error("BIP32 index cannot be hardened.")]
    IndexCannotBeHardened,

    #[error("Child BIP32 path is shorter than its parent.")]
    ChildShorterThanParent,

    #[error("Child BIP32 path does not descend from its parent.")]
    NotADescendant,
}

/// Constraint on the hardening of every segment of a path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PathMode {
    #[default]
    Any,
    Hardened,
    Unhardened,
}

pub fn is_hardened(index: u32) -> bool {
    index >= HARDENING_OFFSET
}

pub fn validate_bip32_path(path: &str, mode: PathMode) -> Result<(), PathError> {
    parse_path(path, mode).map(|_| ())
}

/// Convert `m/45'/0` into `[0x8000002d, 0]`
pub fn bip32_path_to_sequence(path: &str) -> Result<Vec<u32>, PathError> {
    parse_path(path, PathMode::Any)
}

pub fn bip32_sequence_to_path(sequence: &[u32]) -> String {
    let mut path = String::from("m");
    for index in sequence {
        if is_hardened(*index) {
            path.push_str(&format!("/{}'", index - HARDENING_OFFSET));
        } else {
            path.push_str(&format!("/{index}"));
        }
    }
    path
}

pub fn bip32_path_depth(path: &str) -> Result<usize, PathError> {
    Ok(bip32_path_to_sequence(path)?.len())
}

/// The segments of `child` below `parent`
pub fn relative_bip32_sequence(parent: &str, child: &str) -> Result<Vec<u32>, PathError> {
    let parent = bip32_path_to_sequence(parent)?;
    let child = bip32_path_to_sequence(child)?;
    if child.len() < parent.len() {
        return Err(PathError::ChildShorterThanParent);
    }
    if child[..parent.len()] != parent[..] {
        return Err(PathError::NotADescendant);
    }
    Ok(child[parent.len()..].to_vec())
}

/// The path of `child` below `parent`, `m` when they are equal
pub fn relative_bip32_path(parent: &str, child: &str) -> Result<String, PathError> {
    Ok(bip32_sequence_to_path(&relative_bip32_sequence(parent, child)?))
}

pub fn derivation_path(path: &str) -> Result<DerivationPath, PathError> {
    let sequence = bip32_path_to_sequence(path)?;
    Ok(sequence
        .into_iter()
        .map(ChildNumber::from)
        .collect::<Vec<_>>()
        .into())
}

pub fn derivation_path_to_string(path: &DerivationPath) -> String {
    let sequence: Vec<u32> = path.into_iter().map(|c| u32::from(*c)).collect();
    bip32_sequence_to_path(&sequence)
}

/// `path` when known, otherwise `m` followed by `/0` for each level of `depth`
pub fn masked_derivation(path: Option<&str>, depth: u8) -> String {
    match path {
        Some(path) if !path.to_lowercase().contains("unknown") => path.to_string(),
        _ => {
            let mut masked = String::from("m");
            for _ in 0..depth {
                masked.push_str("/0");
            }
            masked
        }
    }
}

fn parse_path(path: &str, mode: PathMode) -> Result<Vec<u32>, PathError> {
    if path.trim().is_empty() {
        return Err(PathError::Blank);
    }
    let mut segments = path.split('/');
    if segments.next() != Some("m") {
        return Err(PathError::Invalid);
    }
    let segments: Vec<&str> = segments.collect();

    for segment in segments.iter() {
        let digits = segment.strip_suffix('\'').unwrap_or(segment);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PathError::Invalid);
        }
    }
    match mode {
        PathMode::Hardened if segments.iter().any(|s| !s.ends_with('\'')) => {
            return Err(PathError::MustBeHardened)
        }
        PathMode::Unhardened if segments.iter().any(|s| s.ends_with('\'')) => {
            return Err(PathError::CannotBeHardened)
        }
        _ => (),
    }

    segments
        .into_iter()
        .map(|segment| parse_index(segment, mode))
        .collect()
}

/// Unhardened segments range up to `2^32 - 1` unless `mode` forbids hardened indexes,
/// hardened ones up to `2^31 - 1'`
fn parse_index(segment: &str, mode: PathMode) -> Result<u32, PathError> {
    let (digits, hardened) = match segment.strip_suffix('\'') {
        Some(digits) => (digits, true),
        None => (segment, false),
    };
    if digits.len() > 1 && digits.starts_with('0') {
        return Err(PathError::InvalidIndex);
    }
    // only digits are left, parsing fails on overflow
    let index: u64 = digits.parse().map_err(|_| PathError::IndexTooHigh)?;
    let index = u32::try_from(index).map_err(|_| PathError::IndexTooHigh)?;
    if hardened {
        if is_hardened(index) {
            return Err(PathError::IndexTooHigh);
        }
        return Ok(index + HARDENING_OFFSET);
    }
    if mode == PathMode::Unhardened && is_hardened(index) {
        return Err(PathError::IndexCannotBeHardened);
    }
    Ok(index)
}
