pub mod build;
pub mod config;
pub mod diagnostics;
pub mod document;
pub mod error;
pub mod fields;
pub mod fixtures;
pub mod model;
pub mod preset;
pub mod report;
pub mod time_signature;
pub mod value;
pub mod xml;

pub use config::{AlsdConfig, DiagnosticsConfig, ReportConfig};
pub use diagnostics::{
    TelemetryGuard, init_tracing, init_tracing_with_config, init_tracing_with_options,
};
pub use document::{Document, load};
pub use error::{LoadError, LoadErrorKind, ParseError};
pub use fields::{FieldSpec, FieldValues, extract_fields};
pub use model::{
    AutomationEvent, ClipSlot, Device, MidiClip, MidiNote, Mixer, MixerParam, Project, Track,
    WarpMarker,
};
pub use preset::{PresetBlob, decode_hex};
pub use report::{ReportError, ReportOptions, render_report};
pub use time_signature::{TimeSignature, TimeSignatureChange, TimeSignatureError};
pub use value::{ScalarType, ScalarValue, infer_type, infer_value};
