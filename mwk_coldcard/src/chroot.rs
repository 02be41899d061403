//! The fixed derivation roots a Coldcard exports keys from.

use mwk_common::path::{relative_bip32_path, validate_bip32_path};
use mwk_common::{AddressType, PathError, PathMode};

/// A derivation root and the kind of multisig its keys are used for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chroot {
    pub path: &'static str,
    pub address_type: AddressType,
}

/// Every path exported by `Export XPUB`, in the order the Coldcard lists them
pub const COLDCARD_CHROOTS: [Chroot; 5] = [
    Chroot {
        path: "m/45'",
        address_type: AddressType::P2sh,
    },
    Chroot {
        path: "m/48'/0'/0'/1'",
        address_type: AddressType::P2shP2wsh,
    },
    Chroot {
        path: "m/48'/0'/0'/2'",
        address_type: AddressType::P2wsh,
    },
    Chroot {
        path: "m/48'/1'/0'/1'",
        address_type: AddressType::P2shP2wsh,
    },
    Chroot {
        path: "m/48'/1'/0'/2'",
        address_type: AddressType::P2wsh,
    },
];

/// Names of the entry holding the key of each address type in an exported file.
///
/// Firmware before 3.2.0 called the P2SH-P2WSH key `p2wsh_p2sh`.
pub(crate) fn file_key_names(address_type: AddressType) -> &'static [&'static str] {
    match address_type {
        AddressType::P2sh => &["p2sh"],
        AddressType::P2shP2wsh => &["p2sh_p2wsh", "p2wsh_p2sh"],
        AddressType::P2wsh => &["p2wsh"],
    }
}

/// Why a path cannot be exported by a Coldcard
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ColdcardPathError {
    #[error(transparent)]
    Path(PathError),

    #[error(transparent)]
    HardenedRelativePath(PathError),

    #[error("The bip32Path must begin with one of the known Coldcard paths: m/45',m/48'/0'/0'/1',m/48'/0'/0'/2',m/48'/1'/0'/1',m/48'/1'/0'/2'")]
    UnknownChroot,
}

impl ColdcardPathError {
    /// Code of the message reporting this error
    pub fn code(&self) -> &'static str {
        match self {
            ColdcardPathError::Path(_) => "coldcard.bip32_path.path_error",
            ColdcardPathError::HardenedRelativePath(_) => {
                "coldcard.bip32_path.no_hardened_relative_path_error"
            }
            ColdcardPathError::UnknownChroot => "coldcard.bip32_path.unknown_chroot_error",
        }
    }
}

/// The chroot `bip32_path` descends from, comparing whole segments
pub fn chroot_for_bip32_path(bip32_path: &str) -> Option<Chroot> {
    COLDCARD_CHROOTS
        .into_iter()
        .find(|chroot| relative_bip32_path(chroot.path, bip32_path).is_ok())
}

/// A path can be exported if it is a chroot or lies below one with only unhardened segments
pub fn validate_coldcard_bip32_path(bip32_path: &str) -> Result<(), ColdcardPathError> {
    validate_bip32_path(bip32_path, PathMode::Any).map_err(ColdcardPathError::Path)?;
    let chroot = chroot_for_bip32_path(bip32_path).ok_or(ColdcardPathError::UnknownChroot)?;
    if chroot.path == bip32_path {
        return Ok(());
    }
    let relative = relative_bip32_path(chroot.path, bip32_path).map_err(ColdcardPathError::Path)?;
    validate_bip32_path(&relative, PathMode::Unhardened)
        .map_err(ColdcardPathError::HardenedRelativePath)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_chroot_for_bip32_path() {
        assert_eq!(
            chroot_for_bip32_path("m/45'/0/0").unwrap().address_type,
            AddressType::P2sh
        );
        assert_eq!(
            chroot_for_bip32_path("m/48'/1'/0'/1'").unwrap().address_type,
            AddressType::P2shP2wsh
        );
        assert_eq!(
            chroot_for_bip32_path("m/48'/0'/0'/2'/0/3").unwrap().path,
            "m/48'/0'/0'/2'"
        );
        assert!(chroot_for_bip32_path("m/450'").is_none());
        assert!(chroot_for_bip32_path("m/44'/0'/0'").is_none());
    }

    #[test]
    fn test_validate_coldcard_bip32_path() {
        validate_coldcard_bip32_path("m/45'").unwrap();
        validate_coldcard_bip32_path("m/45'/0/0").unwrap();
        validate_coldcard_bip32_path("m/48'/1'/0'/2'/0/9").unwrap();

        let err = validate_coldcard_bip32_path("m/45'/0'").unwrap_err();
        assert_eq!(
            err.code(),
            "coldcard.bip32_path.no_hardened_relative_path_error"
        );
        assert_eq!(err.to_string(), "BIP32 path cannot include hardened segments.");

        let err = validate_coldcard_bip32_path("m/44'/0'").unwrap_err();
        assert_eq!(err.code(), "coldcard.bip32_path.unknown_chroot_error");
        assert_eq!(
            err.to_string(),
            "The bip32Path must begin with one of the known Coldcard paths: m/45',m/48'/0'/0'/1',m/48'/0'/0'/2',m/48'/1'/0'/1',m/48'/1'/0'/2'"
        );

        let err = validate_coldcard_bip32_path("m/45'/x").unwrap_err();
        assert_eq!(err.code(), "coldcard.bip32_path.path_error");
        assert_eq!(err.to_string(), "BIP32 path is invalid.");

        let err = validate_coldcard_bip32_path("m/45'/4294967296").unwrap_err();
        assert_eq!(err.code(), "coldcard.bip32_path.path_error");
        assert_eq!(err.to_string(), "BIP32 index is too high.");
    }
}
