//! Data-URI helpers for audio payloads. Recordings travel through the system
//! as `data:<mime>;base64,<payload>` strings.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::TranscribeError;

pub fn encode_data_uri(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

/// Split a data URI into its mime type and decoded bytes.
pub fn decode_data_uri(uri: &str) -> Result<(String, Vec<u8>), TranscribeError> {
    let rest = uri.strip_prefix("data:").ok_or(TranscribeError::BadDataUri)?;
    let (header, payload) = rest.split_once(',').ok_or(TranscribeError::BadDataUri)?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or(TranscribeError::BadDataUri)?;
    if mime.is_empty() {
        return Err(TranscribeError::BadDataUri);
    }
    Ok((mime.to_string(), STANDARD.decode(payload)?))
}
