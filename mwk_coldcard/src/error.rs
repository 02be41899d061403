use crate::chroot::ColdcardPathError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Common(#[from] mwk_common::Error),

    #[error(transparent)]
    Bip32Path(#[from] ColdcardPathError),

    #[error("Unable to parse JSON.")]
    UnableToParseJson,

    #[error("Not valid JSON.")]
    NotValidJson,

    #[error("Empty JSON file.")]
    EmptyJson,

    #[error("Missing required params. Was this file exported from a Coldcard?  If you are using firmware version 4.1.0 please upgrade to 4.1.1 or later.")]
    MissingRequiredParams,

    #[error("No xfp in JSON file.")]
    NoXfp,

    #[error("Computed fingerprint does not match the one in the file.")]
    FingerprintMismatch,

    #[error("No signatures found in the PSBT. Did you upload the right one?")]
    NoSignatures,

    #[error("Unable to build the PSBT from the provided parameters.")]
    UnableToBuildPsbt,

    #[error("Configuration file needs a UUID or a name.")]
    MissingName,

    #[error("Configuration file needs quorum.requiredSigners and quorum.totalSigners.")]
    MissingQuorum,

    #[error("Configuration file needs addressType.")]
    MissingAddressType,

    #[error("Configuration file needs extendedPublicKeys.")]
    MissingExtendedPublicKeys,

    #[error("ExtendedPublicKeys missing at least one xfp.")]
    MissingXfp,

    #[error("XFP not a string")]
    XfpNotString,

    #[error("XFP not length 8")]
    XfpLength,

    #[error("XFP is invalid hex")]
    XfpInvalidHex,
}
