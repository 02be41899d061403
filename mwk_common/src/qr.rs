use base64::engine::general_purpose;

use crate::Error;

fn qr_error(e: impl std::fmt::Display) -> Error {
    Error::Qr(e.to_string())
}

/// Convert the given text, typically a UR part, in a string representing a QR code to be
/// consumed from a terminal
pub fn text_qr(text: &str) -> Result<String, Error> {
    let qr_code = qr_code::QrCode::new(text).map_err(qr_error)?;
    Ok(qr_code.to_string(true, 3))
}

/// Convert the given text to an image uri
///
/// The image format is monocromatic bitmap, encoded in base64 in the uri.
///
/// Without `pixel_per_module` the default is no border, and 1 pixel per module, to be used
/// for example in html: `style="image-rendering: pixelated; border: 20px solid white;"`
pub fn uri_qr(text: &str, pixel_per_module: Option<u8>) -> Result<String, Error> {
    let qr_code = qr_code::QrCode::new(text).map_err(qr_error)?;
    let mut bmp = qr_code.to_bmp();
    if let Some(pixel_per_module) = pixel_per_module {
        bmp = bmp
            .add_white_border(1)
            .map_err(qr_error)?
            .mul(pixel_per_module)
            .map_err(qr_error)?;
    }
    let mut enc = base64::write::EncoderWriter::new(Vec::new(), &general_purpose::STANDARD);

    bmp.write(&mut enc).map_err(qr_error)?;
    let delegate = enc.finish().map_err(qr_error)?;

    let base64 = String::from_utf8(delegate).map_err(qr_error)?;
    Ok(format!("data:image/bmp;base64,{}", base64))
}
