//! BC32: bech32 without human readable part and separator.
//!
//! The checksum is computed over a single zero followed by the data, as bech32 does for an
//! empty human readable part, and targets the residue `0x3fffffff`.

use bech32::primitives::checksum::{Checksum, Engine, PackedFe32};
use bech32::{Bech32, ByteIterExt, Fe32, Fe32IterExt};

/// The BC32 checksum: the bech32 generator with its own target residue
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Bc32 {}

impl Checksum for Bc32 {
    type MidstateRepr = u32;
    const CODE_LENGTH: usize = <Bech32 as Checksum>::CODE_LENGTH;
    const CHECKSUM_LENGTH: usize = <Bech32 as Checksum>::CHECKSUM_LENGTH;
    const GENERATOR_SH: [u32; 5] = <Bech32 as Checksum>::GENERATOR_SH;
    const TARGET_RESIDUE: u32 = 0x3fff_ffff;
}

/// Engine fed with the zero standing for the missing human readable part
fn engine() -> Engine<Bc32> {
    let mut engine = Engine::new();
    engine.input_fe(Fe32::Q);
    engine
}

/// Lowercase BC32 encoding of `data`
pub fn encode(data: &[u8]) -> String {
    let values: Vec<Fe32> = data.iter().copied().bytes_to_fes().collect();
    let mut engine = engine();
    for fe in values.iter() {
        engine.input_fe(*fe);
    }
    engine.input_target_residue();
    let residue = *engine.residue();
    let checksum = (0..Bc32::CHECKSUM_LENGTH)
        .rev()
        .filter_map(|i| Fe32::try_from(residue.unpack(i)).ok());
    values.into_iter().chain(checksum).map(Fe32::to_char).collect()
}

/// Decode a BC32 string, in either case, returning `None` when it is not valid
pub fn decode(s: &str) -> Option<Vec<u8>> {
    let values = s
        .to_lowercase()
        .chars()
        .map(|c| Fe32::from_char(c).ok())
        .collect::<Option<Vec<Fe32>>>()?;
    if values.len() < Bc32::CHECKSUM_LENGTH {
        return None;
    }
    let mut engine = engine();
    for fe in values.iter() {
        engine.input_fe(*fe);
    }
    if *engine.residue() != Bc32::TARGET_RESIDUE {
        return None;
    }

    let data = &values[..values.len() - Bc32::CHECKSUM_LENGTH];
    // at most 4 bits of zero padding
    let padding = data.len() * 5 % 8;
    let zero_padded = data
        .last()
        .map_or(true, |fe| fe.to_u8() & ((1 << padding) - 1) == 0);
    if padding >= 5 || !zero_padded {
        return None;
    }
    Some(data.iter().copied().fes_to_bytes().collect())
}
