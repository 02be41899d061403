//! BC-UR (version 1) transport of bytes over a sequence of QR codes.
//!
//! A payload is wrapped in a CBOR byte string, BC32 encoded and split in fragments. A single
//! fragment is sent as `UR:BYTES/<fragment>`, otherwise every part is
//! `UR:BYTES/<i>OF<n>/<digest>/<fragment>` where the digest is the BC32 encoding of the
//! SHA-256 of the CBOR payload.

use bitcoin::hashes::{sha256, Hash};
use serde::Serialize;

use crate::bc32;

/// Characters of BC32 data per part
pub const DEFAULT_FRAGMENT_CAPACITY: usize = 200;

const UR_HEADER: &str = "UR:BYTES";

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UrError {
    #[error("no data to encode")]
    Empty,

    #[error("fragment capacity must be positive")]
    FragmentCapacity,

    #[error("invalid hex data: {0}")]
    Hex(String),

    #[error("invalid UR header: {0}")]
    InvalidHeader(String),

    #[error("invalid sequence: {0}")]
    InvalidSequence(String),

    #[error("invalid workload pieces length: expect 2 / 3 / 4 but got {0}")]
    PiecesLength(usize),

    #[error("can not decode payload: {0}")]
    InvalidPayload(String),

    #[error("invalid digest: {0}")]
    InvalidDigest(String),

    #[error("invalid workload: {part}, total {total} not equal workloads length {length}")]
    TotalMismatch {
        part: String,
        total: usize,
        length: usize,
    },

    #[error("invalid workload: {0}, checksum changed")]
    DigestChanged(String),

    #[error("invalid workload: {part}, index {index} has already been set")]
    DuplicateIndex { part: String, index: usize },

    #[error("invalid workload: {part}, index {index} out of range")]
    IndexOutOfRange { part: String, index: usize },

    #[error("invalid data: {0}")]
    InvalidCbor(String),
}

/// Hermit marks byte strings of 65536 bytes or more with this header instead of `0x5a`
const LONG_BYTES_HEADER: u8 = 0x60;

/// Header of a byte string whose length is on 4 bytes
const BYTES_U32_HEADER: u8 = 0x5a;

/// `data` as a CBOR byte string
fn cbor_encode(data: &[u8]) -> Result<Vec<u8>, UrError> {
    let mut cbor = serde_cbor::to_vec(&serde_bytes::Bytes::new(data))
        .map_err(|e| UrError::InvalidCbor(e.to_string()))?;
    if cbor.first() == Some(&BYTES_U32_HEADER) {
        cbor[0] = LONG_BYTES_HEADER;
    }
    Ok(cbor)
}

fn cbor_decode(payload: &[u8]) -> Result<Vec<u8>, UrError> {
    let mut payload = payload.to_vec();
    if payload.first() == Some(&LONG_BYTES_HEADER) {
        payload[0] = BYTES_U32_HEADER;
    }
    match serde_cbor::from_slice::<serde_cbor::Value>(&payload) {
        Ok(serde_cbor::Value::Bytes(data)) => Ok(data),
        Ok(_) => Err(UrError::InvalidCbor("not a byte string".to_string())),
        Err(e) => Err(UrError::InvalidCbor(e.to_string())),
    }
}

fn digest(cbor: &[u8]) -> String {
    bc32::encode(sha256::Hash::hash(cbor).as_byte_array())
}

/// Encode `data` as UR parts of at most `fragment_capacity` BC32 characters each
pub fn encode_ur(data: &[u8], fragment_capacity: usize) -> Result<Vec<String>, UrError> {
    if data.is_empty() {
        return Err(UrError::Empty);
    }
    if fragment_capacity == 0 {
        return Err(UrError::FragmentCapacity);
    }
    let cbor = cbor_encode(data)?;
    let payload = bc32::encode(&cbor).to_uppercase();
    let fragments: Vec<&str> = payload
        .as_bytes()
        .chunks(fragment_capacity)
        .map(|c| std::str::from_utf8(c).unwrap_or_default())
        .collect();

    let parts = match &fragments[..] {
        [single] => vec![format!("{UR_HEADER}/{single}")],
        _ => {
            let digest = digest(&cbor).to_uppercase();
            let total = fragments.len();
            fragments
                .iter()
                .enumerate()
                .map(|(i, f)| format!("{UR_HEADER}/{}OF{total}/{digest}/{f}", i + 1))
                .collect()
        }
    };
    tracing::debug!("encoded {} bytes in {} UR parts", data.len(), parts.len());
    Ok(parts)
}

fn check_header(header: &str) -> Result<(), UrError> {
    if header.to_uppercase() != UR_HEADER {
        return Err(UrError::InvalidHeader(header.to_string()));
    }
    Ok(())
}

/// `(index, total)` from a `<i>OF<n>` sequence
fn sequence(sequence: &str) -> Result<(usize, usize), UrError> {
    let invalid = || UrError::InvalidSequence(sequence.to_string());
    let upper = sequence.to_uppercase();
    let (index, total) = upper.split_once("OF").ok_or_else(invalid)?;
    let index = index.parse().map_err(|_| invalid())?;
    let total = total.parse().map_err(|_| invalid())?;
    Ok((index, total))
}

fn check_digest(digest: &str, fragment: &str) -> Result<(), UrError> {
    let cbor =
        bc32::decode(fragment).ok_or_else(|| UrError::InvalidPayload(fragment.to_string()))?;
    let expected =
        bc32::decode(digest).ok_or_else(|| UrError::InvalidDigest(digest.to_string()))?;
    if expected != sha256::Hash::hash(&cbor).as_byte_array() {
        return Err(UrError::InvalidDigest(digest.to_string()));
    }
    Ok(())
}

/// Index and total number of parts of the sequence `part` belongs to
fn part_sequence(part: &str) -> Result<(usize, usize), UrError> {
    let pieces: Vec<&str> = part.split('/').collect();
    match pieces[..] {
        [_, _] | [_, _, _] => Ok((1, 1)),
        [_, seq, _, _] => sequence(seq),
        _ => Err(UrError::PiecesLength(pieces.len())),
    }
}

fn single_part_payload(part: &str) -> Result<String, UrError> {
    let pieces: Vec<&str> = part.split('/').collect();
    match pieces[..] {
        [header, fragment] => {
            check_header(header)?;
            Ok(fragment.to_string())
        }
        [header, digest, fragment] => {
            check_header(header)?;
            check_digest(digest, fragment)?;
            Ok(fragment.to_string())
        }
        [header, seq, digest, fragment] => {
            check_header(header)?;
            sequence(seq)?;
            check_digest(digest, fragment)?;
            Ok(fragment.to_string())
        }
        _ => Err(UrError::PiecesLength(pieces.len())),
    }
}

fn multi_part_payload(parts: &[String]) -> Result<String, UrError> {
    let length = parts.len();
    let mut fragments: Vec<Option<&str>> = vec![None; length];
    let mut digest: Option<&str> = None;
    for part in parts {
        let pieces: Vec<&str> = part.split('/').collect();
        let [header, seq, part_digest, fragment] = pieces[..] else {
            return Err(UrError::PiecesLength(pieces.len()));
        };
        check_header(header)?;
        let (index, total) = sequence(seq)?;
        if total != length {
            return Err(UrError::TotalMismatch {
                part: part.clone(),
                total,
                length,
            });
        }
        if digest.is_some_and(|d| d != part_digest) {
            return Err(UrError::DigestChanged(part.clone()));
        }
        digest = Some(part_digest);
        let slot = index
            .checked_sub(1)
            .and_then(|i| fragments.get_mut(i))
            .ok_or_else(|| UrError::IndexOutOfRange {
                part: part.clone(),
                index,
            })?;
        if slot.is_some() {
            return Err(UrError::DuplicateIndex {
                part: part.clone(),
                index,
            });
        }
        *slot = Some(fragment);
    }
    let payload: String = fragments.into_iter().flatten().collect();
    check_digest(digest.unwrap_or_default(), &payload)?;
    Ok(payload)
}

/// Decode the bytes carried by a complete set of UR parts, in any order
pub fn decode_ur(parts: &[String]) -> Result<Vec<u8>, UrError> {
    let payload = match parts {
        [] => return Err(UrError::Empty),
        [single] => single_part_payload(single)?,
        _ => multi_part_payload(parts)?,
    };
    let cbor = bc32::decode(&payload).ok_or_else(|| UrError::InvalidPayload(payload.clone()))?;
    let data = cbor_decode(&cbor)?;
    tracing::debug!("decoded {} bytes from {} UR parts", data.len(), parts.len());
    Ok(data)
}

/// Encodes hex data as a sequence of UR parts, typically shown as an animated QR code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrEncoder {
    data: Vec<u8>,
    fragment_capacity: usize,
}

impl UrEncoder {
    pub fn new(hex_data: &str) -> Result<Self, UrError> {
        let data = hex::decode(hex_data).map_err(|e| UrError::Hex(e.to_string()))?;
        Ok(Self {
            data,
            fragment_capacity: DEFAULT_FRAGMENT_CAPACITY,
        })
    }

    pub fn with_fragment_capacity(mut self, fragment_capacity: usize) -> Self {
        self.fragment_capacity = fragment_capacity;
        self
    }

    pub fn parts(&self) -> Result<Vec<String>, UrError> {
        encode_ur(&self.data, self.fragment_capacity)
    }
}

/// How many parts of a sequence have been read
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub total_parts: usize,
    pub parts_received: usize,
}

/// Collects UR parts, in any order and possibly repeated, until the data can be decoded.
///
/// ```
/// # use mwk_hermit::bcur::UrDecoder;
/// let mut decoder = UrDecoder::new();
/// for part in ["UR:BYTES/GN02M0H002KGC7"] {
///     if decoder.is_complete() {
///         break;
///     }
///     decoder.receive_part(part);
/// }
/// assert!(decoder.is_success());
/// assert_eq!(decoder.data().unwrap(), "deadbeef");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UrDecoder {
    parts: Vec<String>,
    total: usize,
    result: Option<String>,
    error: Option<UrError>,
}

impl UrDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Forget every received part and error
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Receive a part, receiving the same part more than once is harmless
    pub fn receive_part(&mut self, part: &str) {
        let mut parts = self.parts.clone();
        if !parts.iter().any(|p| p == part) {
            parts.push(part.to_string());
        }
        if let Err(e) = self.decode(parts) {
            tracing::warn!("cannot decode UR part {part}: {e}");
            self.error = Some(e);
        }
    }

    fn decode(&mut self, parts: Vec<String>) -> Result<(), UrError> {
        let (_, total) = part_sequence(&parts[0])?;
        if parts.len() == total {
            let data = decode_ur(&parts)?;
            self.result = Some(hex::encode(data));
            self.total = total;
            self.parts = vec![];
        } else {
            self.total = total;
            self.parts = parts;
        }
        Ok(())
    }

    pub fn progress(&self) -> Progress {
        Progress {
            total_parts: self.total,
            parts_received: match self.result {
                Some(_) => self.total,
                None => self.parts.len(),
            },
        }
    }

    /// Either successful or failed
    pub fn is_complete(&self) -> bool {
        self.is_success() || self.error.is_some()
    }

    pub fn is_success(&self) -> bool {
        self.result.is_some()
    }

    /// The decoded data, hex encoded
    pub fn data(&self) -> Option<String> {
        self.result.clone()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(|e| e.to_string())
    }
}
