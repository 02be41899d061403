use mwk_common::keys::parse_extended_public_key;
use mwk_common::path::masked_derivation;
use mwk_common::KeystoreInteraction;
use serde_json::{Map, Value};

use crate::file::json_object;
use crate::Error;

const WALLET_CONFIG_VERSION: &str = "1.0.0";

/// A signer of the wallet as listed in the configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigExtendedPublicKey {
    pub xpub: String,
    pub xfp: String,
    pub bip32_path: Option<String>,
}

/// Translate a wallet configuration (JSON) into the text file installing the multisig wallet
/// on a Coldcard.
///
/// Every signer must come with its root fingerprint, even if the Coldcard only needs its own,
/// so that a single installation is enough.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColdcardMultisigWalletConfig {
    name: String,
    required_signers: u64,
    total_signers: u64,
    address_type: String,
    extended_public_keys: Vec<ConfigExtendedPublicKey>,
}

fn string_field(data: &Map<String, Value>, key: &str) -> Option<String> {
    data.get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn positive(quorum: Option<&Value>, key: &str) -> Option<u64> {
    quorum?.get(key)?.as_u64().filter(|n| *n > 0)
}

fn config_key(entry: &Value) -> Result<ConfigExtendedPublicKey, Error> {
    let xfp = match entry.get("xfp") {
        None | Some(Value::Null) => return Err(Error::MissingXfp),
        Some(Value::String(xfp)) if xfp.is_empty() || xfp == "Unknown" => {
            return Err(Error::MissingXfp)
        }
        Some(Value::String(xfp)) => xfp.clone(),
        Some(_) => return Err(Error::XfpNotString),
    };
    if xfp.len() != 8 {
        return Err(Error::XfpLength);
    }
    if !xfp.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::XfpInvalidHex);
    }
    let xpub = entry
        .get("xpub")
        .and_then(Value::as_str)
        .ok_or(Error::MissingExtendedPublicKeys)?
        .to_string();
    let bip32_path = entry
        .get("bip32Path")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok(ConfigExtendedPublicKey {
        xpub,
        xfp,
        bip32_path,
    })
}

impl ColdcardMultisigWalletConfig {
    /// `json_config` is either the parsed configuration or its text
    pub fn new(json_config: Value) -> Result<Self, Error> {
        let config = json_object(json_config)?;

        let name = string_field(&config, "uuid")
            .or_else(|| string_field(&config, "name"))
            .ok_or(Error::MissingName)?;

        let quorum = config.get("quorum");
        let (required_signers, total_signers) = match (
            positive(quorum, "requiredSigners"),
            positive(quorum, "totalSigners"),
        ) {
            (Some(required), Some(total)) => (required, total),
            _ => return Err(Error::MissingQuorum),
        };

        let address_type = string_field(&config, "addressType").ok_or(Error::MissingAddressType)?;

        let extended_public_keys = match config.get("extendedPublicKeys") {
            Some(Value::Array(keys)) if !keys.is_empty() => keys
                .iter()
                .map(config_key)
                .collect::<Result<Vec<_>, _>>()?,
            _ => return Err(Error::MissingExtendedPublicKeys),
        };

        Ok(Self {
            name,
            required_signers,
            total_signers,
            address_type,
            extended_public_keys,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn extended_public_keys(&self) -> &[ConfigExtendedPublicKey] {
        &self.extended_public_keys
    }

    /// Content of the text file to upload to the Coldcard
    pub fn adapt(&self) -> Result<String, Error> {
        let mut output = format!(
            "# Coldcard Multisig setup file (exported from unchained-wallets)\n\
             # https://github.com/unchained-capital/unchained-wallets\n\
             # v{WALLET_CONFIG_VERSION}\n\
             #\n\
             Name: {}\n\
             Policy: {} of {}\n\
             Format: {}\n\n",
            self.name, self.required_signers, self.total_signers, self.address_type
        );
        let keys = self
            .extended_public_keys
            .iter()
            .map(|key| {
                let depth = parse_extended_public_key(&key.xpub)?.depth;
                let derivation = masked_derivation(key.bip32_path.as_deref(), depth);
                Ok(format!("Derivation: {derivation}\n{}: {}", key.xfp, key.xpub))
            })
            .collect::<Result<Vec<_>, Error>>()?;
        output.push_str(&keys.join("\n"));
        output.push('\n');
        Ok(output)
    }
}

impl KeystoreInteraction for ColdcardMultisigWalletConfig {}
