//! Extended public keys with any of the SLIP-132 version prefixes used by keystores.

use std::fmt::Display;
use std::str::FromStr;

use bitcoin::base58;
use bitcoin::bip32::{ChildNumber, Xpub};
use bitcoin::secp256k1::Secp256k1;
use bitcoin::NetworkKind;

use crate::path::bip32_path_to_sequence;
use crate::{Error, Network};

/// Version prefix of a serialized extended public key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtendedKeyPrefix {
    Xpub,
    Ypub,
    Zpub,
    /// `Ypub`, mainnet P2SH-P2WSH multisig
    YpubMultisig,
    /// `Zpub`, mainnet P2WSH multisig
    ZpubMultisig,
    Tpub,
    Upub,
    Vpub,
    /// `Upub`, testnet P2SH-P2WSH multisig
    UpubMultisig,
    /// `Vpub`, testnet P2WSH multisig
    VpubMultisig,
}

const ALL_PREFIXES: [ExtendedKeyPrefix; 10] = [
    ExtendedKeyPrefix::Xpub,
    ExtendedKeyPrefix::Ypub,
    ExtendedKeyPrefix::Zpub,
    ExtendedKeyPrefix::YpubMultisig,
    ExtendedKeyPrefix::ZpubMultisig,
    ExtendedKeyPrefix::Tpub,
    ExtendedKeyPrefix::Upub,
    ExtendedKeyPrefix::Vpub,
    ExtendedKeyPrefix::UpubMultisig,
    ExtendedKeyPrefix::VpubMultisig,
];

impl ExtendedKeyPrefix {
    pub fn version(&self) -> [u8; 4] {
        let version: u32 = match self {
            ExtendedKeyPrefix::Xpub => 0x0488_b21e,
            ExtendedKeyPrefix::Ypub => 0x049d_7cb2,
            ExtendedKeyPrefix::Zpub => 0x04b2_4746,
            ExtendedKeyPrefix::YpubMultisig => 0x0295_b43f,
            ExtendedKeyPrefix::ZpubMultisig => 0x02aa_7ed3,
            ExtendedKeyPrefix::Tpub => 0x0435_87cf,
            ExtendedKeyPrefix::Upub => 0x044a_5262,
            ExtendedKeyPrefix::Vpub => 0x045f_1cf6,
            ExtendedKeyPrefix::UpubMultisig => 0x0242_89ef,
            ExtendedKeyPrefix::VpubMultisig => 0x0257_5483,
        };
        version.to_be_bytes()
    }

    pub fn from_version(version: [u8; 4]) -> Option<Self> {
        ALL_PREFIXES.into_iter().find(|p| p.version() == version)
    }

    pub fn is_mainnet(&self) -> bool {
        matches!(
            self,
            ExtendedKeyPrefix::Xpub
                | ExtendedKeyPrefix::Ypub
                | ExtendedKeyPrefix::Zpub
                | ExtendedKeyPrefix::YpubMultisig
                | ExtendedKeyPrefix::ZpubMultisig
        )
    }

    /// The plain prefix, `xpub` or `tpub`, for the given network
    pub fn for_network(network: Network) -> Self {
        if network.is_mainnet() {
            ExtendedKeyPrefix::Xpub
        } else {
            ExtendedKeyPrefix::Tpub
        }
    }
}

impl Display for ExtendedKeyPrefix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ExtendedKeyPrefix::Xpub => "xpub",
            ExtendedKeyPrefix::Ypub => "ypub",
            ExtendedKeyPrefix::Zpub => "zpub",
            ExtendedKeyPrefix::YpubMultisig => "Ypub",
            ExtendedKeyPrefix::ZpubMultisig => "Zpub",
            ExtendedKeyPrefix::Tpub => "tpub",
            ExtendedKeyPrefix::Upub => "upub",
            ExtendedKeyPrefix::Vpub => "vpub",
            ExtendedKeyPrefix::UpubMultisig => "Upub",
            ExtendedKeyPrefix::VpubMultisig => "Vpub",
        };
        write!(f, "{s}")
    }
}

impl FromStr for ExtendedKeyPrefix {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ALL_PREFIXES
            .into_iter()
            .find(|p| p.to_string() == s)
            .ok_or_else(|| Error::UnknownExtendedKeyPrefix(s.to_string()))
    }
}

fn decode_extended_key(key: &str) -> Result<(ExtendedKeyPrefix, Vec<u8>), Error> {
    let data = base58::decode_check(key.trim())
        .map_err(|e| Error::ExtendedKeyConversion(e.to_string()))?;
    if data.len() != 78 {
        return Err(Error::ExtendedKeyConversion(format!(
            "expected 78 bytes, got {}",
            data.len()
        )));
    }
    let version = [data[0], data[1], data[2], data[3]];
    let prefix = ExtendedKeyPrefix::from_version(version)
        .ok_or_else(|| Error::UnknownExtendedKeyPrefix(hex::encode(version)))?;
    Ok((prefix, data))
}

/// Prefix of a base58 serialized extended public key
pub fn extended_key_prefix(key: &str) -> Result<ExtendedKeyPrefix, Error> {
    Ok(decode_extended_key(key)?.0)
}

/// Re-encode `key` with another version prefix, the key material is unchanged
pub fn convert_extended_public_key(key: &str, prefix: ExtendedKeyPrefix) -> Result<String, Error> {
    let (_, mut data) = decode_extended_key(key)?;
    data[..4].copy_from_slice(&prefix.version());
    Ok(base58::encode_check(&data))
}

/// Parse an extended public key carrying any of the known prefixes
pub fn parse_extended_public_key(key: &str) -> Result<Xpub, Error> {
    let (prefix, data) = decode_extended_key(key)?;
    let mut data = data;
    let plain = if prefix.is_mainnet() {
        ExtendedKeyPrefix::Xpub
    } else {
        ExtendedKeyPrefix::Tpub
    };
    data[..4].copy_from_slice(&plain.version());
    Xpub::decode(&data).map_err(|e| Error::InvalidExtendedPublicKey(e.to_string()))
}

/// Fingerprint of the parent of `xpub` if the parent is the root
///
/// Keys deeper than 1 only tell the fingerprint of an intermediate key.
pub fn root_fingerprint_from_depth_one(xpub: &Xpub) -> Option<String> {
    (xpub.depth == 1).then(|| xpub.parent_fingerprint.to_string())
}

/// Compressed public key of `xpub`, hex encoded
pub fn public_key_hex(xpub: &Xpub) -> String {
    hex::encode(xpub.public_key.serialize())
}

/// Derive along the unhardened `relative_path` (e.g. `m/0/3`) below `key`.
///
/// The result is serialized with the plain prefix of `network`.
pub fn derive_child_extended_public_key(
    key: &str,
    relative_path: &str,
    network: Network,
) -> Result<String, Error> {
    let xpub = parse_extended_public_key(key)?;
    let path = bip32_path_to_sequence(relative_path)?
        .into_iter()
        .map(ChildNumber::from_normal_idx)
        .collect::<Result<Vec<_>, _>>()?;

    let secp = Secp256k1::verification_only();
    let mut child = xpub.derive_pub(&secp, &path)?;
    child.network = NetworkKind::from(network.bitcoin_network());
    tracing::debug!("derived {relative_path} below a depth {} key", xpub.depth);
    Ok(child.to_string())
}

pub fn fingerprint_to_fixed_length_hex(fingerprint: u32) -> String {
    format!("{fingerprint:08x}")
}

/// A root fingerprint must be exactly 8 hex characters
pub fn validate_root_fingerprint(fingerprint: &str) -> Result<(), Error> {
    if fingerprint.len() != 8 {
        return Err(Error::FingerprintLength);
    }
    if !fingerprint.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::FingerprintHex);
    }
    Ok(())
}
