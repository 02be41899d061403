use bitcoin::secp256k1::ecdsa::Signature;

use crate::Error;

/// SIGHASH_ALL
pub const SIGHASH_ALL_BYTE: u8 = 0x01;

/// Strip the trailing sighash byte from a DER signature, if there is one.
///
/// The DER length byte tells whether the last byte belongs to the signature.
pub fn signature_no_sighash_type(signature: &[u8]) -> &[u8] {
    match signature {
        [_, len, ..] if *len as usize == signature.len() - 2 => signature,
        [rest @ .., _] => rest,
        [] => signature,
    }
}

/// Ensure `signature` (hex) ends with exactly one SIGHASH_ALL byte
pub fn normalize_signature(signature: &str) -> Result<String, Error> {
    let bytes =
        hex::decode(signature).map_err(|_| Error::InvalidSignature(signature.to_string()))?;
    let der = signature_no_sighash_type(&bytes);
    Signature::from_der(der).map_err(|_| Error::InvalidSignature(signature.to_string()))?;
    let mut normalized = der.to_vec();
    normalized.push(SIGHASH_ALL_BYTE);
    Ok(hex::encode(normalized))
}

/// Normalize every signature returned by a keystore, one per input
pub fn parse_signatures(signatures: &[String]) -> Result<Vec<String>, Error> {
    signatures.iter().map(|s| normalize_signature(s)).collect()
}

#[cfg(test)]
mod test {
    use mwk_test_util::{SIGNATURE, SIGNATURE_NO_SIGHASH};

    use super::*;

    #[test]
    fn test_signature_no_sighash_type() {
        let with = hex::decode(SIGNATURE).unwrap();
        let without = hex::decode(SIGNATURE_NO_SIGHASH).unwrap();
        assert_eq!(signature_no_sighash_type(&with), &without[..]);
        assert_eq!(signature_no_sighash_type(&without), &without[..]);
        assert!(signature_no_sighash_type(&[]).is_empty());
    }

    #[test]
    fn test_normalize_signature_is_idempotent() {
        let once = normalize_signature(SIGNATURE_NO_SIGHASH).unwrap();
        assert_eq!(once, SIGNATURE);
        let twice = normalize_signature(&once).unwrap();
        assert_eq!(twice, once);
        assert_eq!(normalize_signature(SIGNATURE).unwrap(), SIGNATURE);
    }

    #[test]
    fn test_parse_signatures() {
        let signatures = vec![SIGNATURE_NO_SIGHASH.to_string(), SIGNATURE.to_string()];
        let parsed = parse_signatures(&signatures).unwrap();
        assert_eq!(parsed, vec![SIGNATURE.to_string(), SIGNATURE.to_string()]);

        let err = parse_signatures(&["zz".to_string()]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid signature \"zz\"");
        let err = parse_signatures(&["deadbeef".to_string()]).unwrap_err();
        assert!(matches!(err, Error::InvalidSignature(_)));
    }
}
