use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicKeyExport {
    pub public_key: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_fingerprint: Option<String>,

    #[serde(rename = "bip32Path", skip_serializing_if = "Option::is_none")]
    pub bip32_path: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendedPublicKeyExport {
    pub xpub: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_fingerprint: Option<String>,

    #[serde(rename = "bip32Path", skip_serializing_if = "Option::is_none")]
    pub bip32_path: Option<String>,
}

/// Signatures collected from a PSBT, grouped by the public key that made them.
///
/// Keys keep the order in which they were first seen, serialized as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignatureSet(Vec<(String, Vec<String>)>);

impl SignatureSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, public_key: &str, signature: String) {
        match self.0.iter_mut().find(|(k, _)| k == public_key) {
            Some((_, signatures)) => signatures.push(signature),
            None => self.0.push((public_key.to_string(), vec![signature])),
        }
    }

    pub fn get(&self, public_key: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|(k, _)| k == public_key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// Signatures of the first public key seen
    pub fn first(&self) -> Option<&[String]> {
        self.0.first().map(|(_, v)| v.as_slice())
    }
}

impl Serialize for SignatureSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (public_key, signatures) in self.0.iter() {
            map.serialize_entry(public_key, signatures)?;
        }
        map.end()
    }
}

/// Result of a signing interaction, its shape depends on how the interaction was built
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SignedTransaction {
    /// A base64 PSBT carrying the new partial signatures
    Psbt(String),

    /// One signature per input, hex encoded with the sighash byte
    Signatures(Vec<String>),

    /// Every signature found in a PSBT
    SignatureSet(SignatureSet),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
    pub string: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceMetadata {
    /// E.g. `Model 1 v.1.8.3 w/PIN`
    pub spec: String,
    pub model: String,
    pub version: DeviceVersion,
    pub label: Option<String>,
    pub pin: bool,
    pub passphrase: bool,
}
