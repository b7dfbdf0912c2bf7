use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::{
    preset::PresetBlob,
    time_signature::{TimeSignature, TimeSignatureChange, TimeSignatureError},
    value::{ScalarType, ScalarValue},
};

pub const TIME_SIGNATURE_PARAM: &str = "TimeSignature";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Project {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creator: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minor_version: Option<String>,
    pub tracks: Vec<Track>,
    pub master_track: Option<Track>,
}

impl Project {
    /// Meter changes of the master track, negative times clamped to zero.
    pub fn time_signatures(&self) -> Result<Vec<TimeSignatureChange>, TimeSignatureError> {
        let Some(param) = self
            .master_track
            .as_ref()
            .and_then(|master| master.mixer.as_ref())
            .and_then(|mixer| mixer.param(TIME_SIGNATURE_PARAM))
        else {
            return Ok(Vec::new());
        };

        param
            .events
            .iter()
            .map(|event| {
                let encoded = encoded_time_signature(event)?;
                let encoded = u64::try_from(encoded).map_err(|_| TimeSignatureError::Negative {
                    time: event.time,
                    encoded,
                })?;
                Ok::<_, TimeSignatureError>(TimeSignatureChange {
                    time: event.time.max(0),
                    signature: TimeSignature::decode(encoded),
                })
            })
            .collect()
    }

    #[must_use]
    pub fn clip_count(&self) -> usize {
        self.all_tracks().map(|track| track.midi_clips.len()).sum()
    }

    #[must_use]
    pub fn note_count(&self) -> usize {
        self.all_tracks()
            .flat_map(|track| track.midi_clips.iter())
            .map(|clip| clip.notes.len())
            .sum()
    }

    pub fn all_tracks(&self) -> impl Iterator<Item = &Track> {
        self.master_track.iter().chain(self.tracks.iter())
    }
}

// Without a `Manual` value the parameter type is never inferred, so event values
// arrive as raw text.
fn encoded_time_signature(event: &AutomationEvent) -> Result<i64, TimeSignatureError> {
    let encoded = match &event.value {
        Some(ScalarValue::Integer(encoded)) => Some(*encoded),
        Some(ScalarValue::String(raw)) => raw.trim().parse().ok(),
        _ => None,
    };
    encoded.ok_or_else(|| TimeSignatureError::NotAnInteger {
        time: event.time,
        value: event.value.as_ref().map(ToString::to_string),
    })
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Track {
    pub track_type: String,
    pub name: Option<String>,
    pub devices: Vec<Device>,
    pub mixer: Option<Mixer>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub clip_slots: Vec<ClipSlot>,
    pub midi_clips: Vec<MidiClip>,
}

impl Track {
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&MixerParam> {
        self.mixer.as_ref().and_then(|mixer| mixer.param(name))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClipSlot {
    pub id: Option<String>,
    pub has_clip: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Mixer {
    pub params: BTreeMap<String, MixerParam>,
}

impl Mixer {
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&MixerParam> {
        self.params.get(name)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MixerParam {
    pub value_type: Option<ScalarType>,
    pub manual: Option<ScalarValue>,
    pub events: Vec<AutomationEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AutomationEvent {
    pub time: i64,
    pub value: Option<ScalarValue>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Device {
    pub device_type: String,
    pub preset_name: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preset: Option<PresetBlob>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct MidiClip {
    pub name: Option<String>,
    pub annotation: Option<String>,
    pub launch_mode: Option<ScalarValue>,
    pub current_start: Option<ScalarValue>,
    pub current_end: Option<ScalarValue>,
    pub loop_start: Option<ScalarValue>,
    pub loop_end: Option<ScalarValue>,
    pub loop_start_relative: Option<ScalarValue>,
    pub loop_on: Option<ScalarValue>,
    pub length: Option<f64>,
    pub loop_length: Option<f64>,
    pub warp_markers: Vec<WarpMarker>,
    pub notes: Vec<MidiNote>,
}

impl MidiClip {
    #[must_use]
    pub fn is_looping(&self) -> bool {
        self.loop_on
            .as_ref()
            .and_then(ScalarValue::as_bool)
            .unwrap_or(false)
    }

    #[must_use]
    pub fn max_note_end(&self) -> Option<f64> {
        self.notes.iter().map(MidiNote::end_time).reduce(f64::max)
    }
}

/// `end - start` when both bounds are numeric.
#[must_use]
pub fn span(start: Option<&ScalarValue>, end: Option<&ScalarValue>) -> Option<f64> {
    Some(end?.as_f64()? - start?.as_f64()?)
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct WarpMarker {
    pub sec_time: f64,
    pub beat_time: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MidiNote {
    pub time: f64,
    pub key: Option<i64>,
    pub duration: f64,
    pub velocity: f64,
    pub off_velocity: i64,
    pub is_enabled: bool,
}

impl MidiNote {
    #[must_use]
    pub fn end_time(&self) -> f64 {
        self.time + self.duration
    }
}
