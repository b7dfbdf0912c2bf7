use std::io::Cursor;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::error::ParseError;

const PRESET_NAME_KEY: &str = "name";

/// Decodes hex text, ignoring case and every character that is not a hex digit.
pub fn decode_hex(text: &str) -> Result<Vec<u8>, hex::FromHexError> {
    hex::decode(
        text.chars()
            .filter(char::is_ascii_hexdigit)
            .collect::<String>(),
    )
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PresetBlob {
    #[serde(skip)]
    pub bytes: Vec<u8>,
    pub name: Option<String>,
}

impl PresetBlob {
    pub fn decode(text: &str) -> Result<Self, ParseError> {
        let bytes = decode_hex(text)?;
        let plist = plist::Value::from_reader(Cursor::new(&bytes))?;
        let name = plist
            .as_dictionary()
            .and_then(|dictionary| dictionary.get(PRESET_NAME_KEY))
            .and_then(plist::Value::as_string)
            .map(str::to_owned);
        trace!(len = bytes.len(), ?name, "preset buffer decoded");
        Ok(Self { bytes, name })
    }
}
