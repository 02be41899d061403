use mwk_common::keys::fingerprint_to_fixed_length_hex;
use mwk_common::path::MULTISIG_ROOT;
use mwk_common::{
    ExtendedPublicKeyExport, KeystoreInteraction, Level, Message, Network, PublicKeyExport,
    State,
};
use serde_json::{json, Value};

use crate::config::TrezorCoin;
use crate::connect::{dev_mode, TrezorMethod};
use crate::interaction::{bip32_path_messages, trezor_messages, TrezorInteraction};
use crate::{impl_direct_interaction, Error};

/// Export the HD node at a BIP32 path.
///
/// With `include_xfp` the node at [`MULTISIG_ROOT`] is requested too, since its parent
/// fingerprint is the root fingerprint the device does not report otherwise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrezorExportHDNode {
    bip32_path: String,
    include_xfp: bool,
    coin: TrezorCoin,
}

impl TrezorExportHDNode {
    pub fn new(network: Network, bip32_path: &str, include_xfp: bool) -> Self {
        Self {
            bip32_path: bip32_path.to_string(),
            include_xfp,
            coin: TrezorCoin::new(network, dev_mode()),
        }
    }

    pub fn bip32_path(&self) -> &str {
        &self.bip32_path
    }

    /// Root fingerprint and `key_field` of the requested node from a bundle response
    fn extract_details(&self, payload: &Value, key_field: &'static str) -> Result<(String, String), Error> {
        let nodes = match payload.as_array() {
            Some(nodes) if nodes.len() == 2 => nodes,
            _ => return Err(Error::BundleLength),
        };
        let is_root = |node: &Value| node["serializedPath"].as_str() == Some(MULTISIG_ROOT);
        let root = nodes
            .iter()
            .find(|n| is_root(n))
            .ok_or(Error::MissingPayloadField("serializedPath"))?;
        let fingerprint = root["fingerprint"]
            .as_u64()
            .and_then(|f| u32::try_from(f).ok())
            .ok_or(Error::MissingPayloadField("fingerprint"))?;
        // both nodes are the root when it is the requested path
        let node = nodes.iter().find(|n| !is_root(n)).unwrap_or(root);
        let key = string_field(node, key_field)?;
        Ok((fingerprint_to_fixed_length_hex(fingerprint), key))
    }
}

fn string_field(node: &Value, field: &'static str) -> Result<String, Error> {
    node[field]
        .as_str()
        .map(str::to_string)
        .ok_or(Error::MissingPayloadField(field))
}

impl KeystoreInteraction for TrezorExportHDNode {
    fn messages(&self) -> Vec<Message> {
        let mut messages = trezor_messages();
        messages.extend(bip32_path_messages(&self.bip32_path));
        messages.push(Message::new(
            State::Active,
            Level::Info,
            "trezor.connect.export_hdnode",
            "Confirm in the Trezor Connect window that you want to 'Export public key'. You may be prompted to enter your PIN.",
        ));
        messages
    }
}

impl TrezorInteraction for TrezorExportHDNode {
    type Output = Value;

    fn connect_params(&self) -> Result<(TrezorMethod, Value), Error> {
        let params = if self.include_xfp {
            json!({
                "bundle": [{"path": self.bip32_path}, {"path": MULTISIG_ROOT}],
                "coin": self.coin,
                "crossChain": true,
            })
        } else {
            json!({
                "path": self.bip32_path,
                "coin": self.coin,
                "crossChain": true,
            })
        };
        Ok((TrezorMethod::GetPublicKey, params))
    }

    /// The HD node as returned by the device
    fn parse_payload(&self, payload: Value) -> Result<Value, Error> {
        Ok(payload)
    }
}

impl_direct_interaction!(TrezorExportHDNode);

/// Export the compressed public key at a BIP32 path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrezorExportPublicKey {
    node: TrezorExportHDNode,
}

impl TrezorExportPublicKey {
    pub fn new(network: Network, bip32_path: &str, include_xfp: bool) -> Self {
        Self {
            node: TrezorExportHDNode::new(network, bip32_path, include_xfp),
        }
    }
}

impl KeystoreInteraction for TrezorExportPublicKey {
    fn messages(&self) -> Vec<Message> {
        self.node.messages()
    }
}

impl TrezorInteraction for TrezorExportPublicKey {
    type Output = PublicKeyExport;

    fn connect_params(&self) -> Result<(TrezorMethod, Value), Error> {
        self.node.connect_params()
    }

    fn parse_payload(&self, payload: Value) -> Result<PublicKeyExport, Error> {
        if self.node.include_xfp {
            let (root_fingerprint, public_key) =
                self.node.extract_details(&payload, "publicKey")?;
            Ok(PublicKeyExport {
                public_key,
                root_fingerprint: Some(root_fingerprint),
                bip32_path: None,
            })
        } else {
            Ok(PublicKeyExport {
                public_key: string_field(&payload, "publicKey")?,
                root_fingerprint: None,
                bip32_path: None,
            })
        }
    }
}

impl_direct_interaction!(TrezorExportPublicKey);

/// Export the extended public key at a BIP32 path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrezorExportExtendedPublicKey {
    node: TrezorExportHDNode,
}

impl TrezorExportExtendedPublicKey {
    pub fn new(network: Network, bip32_path: &str, include_xfp: bool) -> Self {
        Self {
            node: TrezorExportHDNode::new(network, bip32_path, include_xfp),
        }
    }
}

impl KeystoreInteraction for TrezorExportExtendedPublicKey {
    fn messages(&self) -> Vec<Message> {
        self.node.messages()
    }
}

impl TrezorInteraction for TrezorExportExtendedPublicKey {
    type Output = ExtendedPublicKeyExport;

    fn connect_params(&self) -> Result<(TrezorMethod, Value), Error> {
        self.node.connect_params()
    }

    fn parse_payload(&self, payload: Value) -> Result<ExtendedPublicKeyExport, Error> {
        if self.node.include_xfp {
            let (root_fingerprint, xpub) = self.node.extract_details(&payload, "xpub")?;
            Ok(ExtendedPublicKeyExport {
                xpub,
                root_fingerprint: Some(root_fingerprint),
                bip32_path: None,
            })
        } else {
            Ok(ExtendedPublicKeyExport {
                xpub: string_field(&payload, "xpub")?,
                root_fingerprint: None,
                bip32_path: None,
            })
        }
    }
}

impl_direct_interaction!(TrezorExportExtendedPublicKey);
