#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Common(#[from] mwk_common::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    /// The error returned by Trezor Connect in an unsuccessful response
    #[error("{0}")]
    Connect(String),

    #[error("Unable to initialize Trezor Connect: {0}")]
    Init(String),

    #[error("Trezor Connect is not initialized")]
    NotInitialized,

    #[error("Payload does not have two responses.")]
    BundleLength,

    #[error("Wrong public key specified")]
    WrongPublicKey,

    #[error("Missing BIP32 path for input #{0}")]
    MissingBip32Path(usize),

    #[error("Missing {0} in the Trezor Connect payload")]
    MissingPayloadField(&'static str),
}
