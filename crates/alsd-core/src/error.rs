use std::{io, path::PathBuf, string::FromUtf8Error};

use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadErrorKind {
    Decompression,
    Parse,
    Structural,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read live set {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to decompress live set: {0}")]
    Decompression(#[source] io::Error),
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error("root element <{0}> not found")]
    MissingRoot(&'static str),
}

impl LoadError {
    #[must_use]
    pub fn kind(&self) -> LoadErrorKind {
        match self {
            Self::Read { .. } | Self::Decompression(_) => LoadErrorKind::Decompression,
            Self::Parse(_) => LoadErrorKind::Parse,
            Self::MissingRoot(_) => LoadErrorKind::Structural,
        }
    }
}

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("live set is not valid utf-8: {0}")]
    Utf8(#[from] FromUtf8Error),
    #[error("malformed live set xml: {0}")]
    Xml(#[from] roxmltree::Error),
    #[error("invalid preset buffer hex: {0}")]
    Hex(#[from] hex::FromHexError),
    #[error("invalid preset buffer property list: {0}")]
    Plist(#[from] plist::Error),
    #[error("missing or malformed {attribute} on <{element}>: {value:?}")]
    Attribute {
        element: String,
        attribute: &'static str,
        value: Option<String>,
    },
}

impl From<roxmltree::Error> for LoadError {
    fn from(value: roxmltree::Error) -> Self {
        Self::Parse(ParseError::Xml(value))
    }
}

impl From<FromUtf8Error> for LoadError {
    fn from(value: FromUtf8Error) -> Self {
        Self::Parse(ParseError::Utf8(value))
    }
}
