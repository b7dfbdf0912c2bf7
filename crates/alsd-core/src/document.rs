use std::{
    fs,
    io::Read,
    path::Path,
};

use flate2::read::MultiGzDecoder;
use tracing::{debug, info, instrument};

use crate::{build, error::LoadError, model::Project, xml};

pub const LIVE_SET_ELEMENT: &str = "LiveSet";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    xml: String,
}

impl Document {
    #[instrument(skip(reader))]
    pub fn from_gzip(reader: impl Read) -> Result<Self, LoadError> {
        let mut bytes = Vec::new();
        MultiGzDecoder::new(reader)
            .read_to_end(&mut bytes)
            .map_err(LoadError::Decompression)?;
        debug!(len = bytes.len(), "live set decompressed");
        Ok(Self {
            xml: String::from_utf8(bytes)?,
        })
    }

    #[must_use]
    pub fn from_xml(xml: impl Into<String>) -> Self {
        Self { xml: xml.into() }
    }

    #[must_use]
    pub fn xml(&self) -> &str {
        &self.xml
    }

    #[instrument(skip(self), fields(len = self.xml.len()))]
    pub fn project(&self) -> Result<Project, LoadError> {
        let tree = roxmltree::Document::parse(&self.xml)?;
        let root = tree.root_element();
        let live_set = if root.has_tag_name(LIVE_SET_ELEMENT) {
            root
        } else {
            xml::find(root, LIVE_SET_ELEMENT).ok_or(LoadError::MissingRoot(LIVE_SET_ELEMENT))?
        };
        Ok(build::project(root, live_set)?)
    }
}

/// Reads, decompresses and parses the Live set at `path`.
#[instrument(fields(path = %path.display()))]
pub fn load(path: &Path) -> Result<Project, LoadError> {
    let compressed = fs::read(path).map_err(|source| LoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let project = Document::from_gzip(compressed.as_slice())?.project()?;
    info!(
        tracks = project.tracks.len(),
        has_master = project.master_track.is_some(),
        clips = project.clip_count(),
        "live set loaded"
    );
    Ok(project)
}
