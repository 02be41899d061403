use crate::path::PathError;

#[allow(missing_docs)]
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// Text carried by an [`crate::UnsupportedInteraction`]
    #[error("{0}")]
    Unsupported(String),

    #[error("This interaction is direct and does not support a `{0}` method.")]
    DirectInteraction(&'static str),

    #[error("This interaction is indirect and does not support a `run` method.")]
    IndirectInteraction,

    #[error("Override the `{0}` method in this interaction.")]
    NotOverridden(&'static str),

    #[error("Unknown network.")]
    UnknownNetwork,

    #[error(transparent)]
    Path(#[from] PathError),

    #[error("Unable to convert extended public key: {0}")]
    ExtendedKeyConversion(String),

    #[error("Invalid extended public key: {0}")]
    InvalidExtendedPublicKey(String),

    #[error("Unknown extended public key prefix \"{0}\"")]
    UnknownExtendedKeyPrefix(String),

    #[error("Expected hex value of length 8")]
    FingerprintLength,

    #[error("Root fingerprint must be valid hex")]
    FingerprintHex,

    #[error("Invalid signature \"{0}\"")]
    InvalidSignature(String),

    #[error("Invalid public key \"{0}\"")]
    InvalidPublicKey(String),

    #[error("Invalid multisig: {0}")]
    InvalidMultisig(String),

    #[error("Invalid PSBT: {0}")]
    InvalidPsbt(String),

    #[error("Signing key details not included in PSBT")]
    MissingSigningKeyDetails,

    #[error("Input #{idx} is missing the previous output")]
    MissingPreviousOutput { idx: usize },

    #[error("Input #{idx} has no multisig script")]
    MissingMultisigScript { idx: usize },

    #[error("Output #{idx} has no address form")]
    OutputWithoutAddress { idx: usize },

    #[error("Got {pubkeys} public keys and {signatures} signatures")]
    SignatureCountMismatch { pubkeys: usize, signatures: usize },

    #[error("Address {address} is not valid for {network}")]
    AddressNetworkMismatch { address: String, network: String },

    #[error("Cannot create a QR code: {0}")]
    Qr(String),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error(transparent)]
    Hex(#[from] hex::FromHexError),

    #[error(transparent)]
    Base64(#[from] base64::DecodeError),

    #[error(transparent)]
    Bip32(#[from] bitcoin::bip32::Error),

    #[error(transparent)]
    Address(#[from] bitcoin::address::ParseError),

    #[error(transparent)]
    Psbt(#[from] bitcoin::psbt::Error),
}
