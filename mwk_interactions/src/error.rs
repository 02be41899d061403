#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Common(#[from] mwk_common::Error),

    #[error(transparent)]
    Coldcard(#[from] mwk_coldcard::Error),

    #[error(transparent)]
    Custom(#[from] mwk_custom::Error),

    #[error(transparent)]
    Hermit(#[from] mwk_hermit::Error),

    #[error(transparent)]
    Trezor(#[from] mwk_trezor::Error),

    #[error(transparent)]
    SerdeJson(#[from] serde_json::Error),

    #[error("Unknown keystore \"{0}\"")]
    UnknownKeystore(String),

    #[error("Key details are required to sign a PSBT with this keystore.")]
    MissingKeyDetails,
}
