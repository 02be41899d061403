use mwk_common::keys::{
    convert_extended_public_key, derive_child_extended_public_key, parse_extended_public_key,
    root_fingerprint_from_depth_one, ExtendedKeyPrefix,
};
use mwk_common::path::relative_bip32_path;
use mwk_common::Network;
use serde_json::{Map, Value};

use crate::chroot::{chroot_for_bip32_path, file_key_names, ColdcardPathError};
use crate::Error;

/// A JSON document given either already parsed or as text
pub(crate) fn json_object(value: Value) -> Result<Map<String, Value>, Error> {
    let value = match value {
        Value::String(text) => {
            serde_json::from_str(&text).map_err(|_| Error::UnableToParseJson)?
        }
        value => value,
    };
    match value {
        Value::Object(map) => Ok(map),
        _ => Err(Error::NotValidJson),
    }
}

fn non_empty<'a>(data: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// The content of an `Export XPUB` file
#[derive(Debug, Clone, PartialEq)]
pub struct ColdcardXpubFile {
    data: Map<String, Value>,

    /// Lowercase, as read in the file or computed from the depth 1 `p2sh` key
    pub root_fingerprint: String,
}

impl ColdcardXpubFile {
    pub fn parse(file: Value) -> Result<Self, Error> {
        let data = json_object(file)?;
        if data.is_empty() {
            return Err(Error::EmptyJson);
        }

        let has = |key: &str| non_empty(&data, key).is_some();
        let p2sh_p2wsh = (has("p2sh_p2wsh_deriv") && has("p2sh_p2wsh"))
            || (has("p2wsh_p2sh_deriv") && has("p2wsh_p2sh"));
        if !(has("p2sh_deriv") && has("p2sh") && has("p2wsh_deriv") && has("p2wsh") && p2sh_p2wsh)
        {
            return Err(Error::MissingRequiredParams);
        }

        let p2sh = parse_extended_public_key(non_empty(&data, "p2sh").unwrap_or_default())?;
        let xfp = non_empty(&data, "xfp").map(str::to_lowercase);
        let from_key = root_fingerprint_from_depth_one(&p2sh);
        let root_fingerprint = match (xfp, from_key) {
            (Some(xfp), Some(computed)) if xfp != computed => {
                return Err(Error::FingerprintMismatch)
            }
            (Some(xfp), _) => xfp,
            (None, Some(computed)) => computed,
            (None, None) => return Err(Error::NoXfp),
        };

        Ok(Self {
            data,
            root_fingerprint,
        })
    }

    /// Extended public key stored for the chroot `path` descends from
    pub fn chroot_key(&self, path: &str) -> Option<&str> {
        let chroot = chroot_for_bip32_path(path)?;
        file_key_names(chroot.address_type)
            .iter()
            .find_map(|name| non_empty(&self.data, name))
    }

    /// The extended public key at `bip32_path`, derived from the exported one when deeper.
    ///
    /// Keys are returned with the plain `xpub` or `tpub` prefix of `network`.
    pub fn extended_public_key(&self, bip32_path: &str, network: Network) -> Result<String, Error> {
        let chroot = chroot_for_bip32_path(bip32_path).ok_or(ColdcardPathError::UnknownChroot)?;
        let key = self
            .chroot_key(bip32_path)
            .ok_or(Error::MissingRequiredParams)?;
        let base = convert_extended_public_key(key, ExtendedKeyPrefix::for_network(network))?;

        let relative = relative_bip32_path(chroot.path, bip32_path)
            .map_err(ColdcardPathError::Path)?;
        if relative == "m" {
            return Ok(base);
        }
        tracing::debug!("deriving {relative} below {}", chroot.path);
        Ok(derive_child_extended_public_key(&base, &relative, network)?)
    }
}
