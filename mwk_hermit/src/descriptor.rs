use once_cell::sync::Lazy;
use regex_lite::Regex;

use mwk_common::ExtendedPublicKeyExport;

use crate::Error;

static KEY_ORIGIN_XPUB: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[([a-fA-F0-9]{8})((?:/[0-9]+'?)+)\]([a-km-zA-NP-Z1-9]+)$").expect("static")
});

/// Parse the hex encoded key origin descriptor shown by `display-xpub`.
///
/// Example (once hex decoded): `[f57ec65d/45'/0'/0']tpub...`
pub fn parse_descriptor_hex(descriptor_hex: &str) -> Result<ExtendedPublicKeyExport, Error> {
    if descriptor_hex.is_empty() {
        return Err(Error::NoDescriptor);
    }
    let descriptor = hex::decode(descriptor_hex)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .ok_or(Error::InvalidDescriptor)?;
    let captures = KEY_ORIGIN_XPUB
        .captures(&descriptor)
        .ok_or(Error::InvalidDescriptor)?;
    Ok(ExtendedPublicKeyExport {
        xpub: captures[3].to_string(),
        root_fingerprint: Some(captures[1].to_string()),
        bip32_path: Some(format!("m{}", &captures[2])),
    })
}
