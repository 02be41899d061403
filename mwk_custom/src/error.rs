#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Common(#[from] mwk_common::Error),

    #[error("Not a valid ExtendedPublicKey.")]
    InvalidExtendedPublicKey,

    #[error("Root fingerprint validation error: {0}.")]
    RootFingerprint(String),

    #[error("Depth of ExtendedPublicKey ({xpub}) does not match depth of BIP32 path ({path}).")]
    DepthMismatch { xpub: u8, path: usize },

    #[error("No signatures found in the PSBT. Did you upload the right one?")]
    NoSignatures,

    #[error("Unable to build the PSBT from the provided parameters.")]
    UnableToBuildPsbt,
}
