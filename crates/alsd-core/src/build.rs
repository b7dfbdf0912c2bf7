use std::collections::BTreeMap;

use roxmltree::Node;
use tracing::{debug, trace, warn};

use crate::{
    error::ParseError,
    fields::{FieldSpec, extract_fields},
    model::{
        AutomationEvent, ClipSlot, Device, MidiClip, MidiNote, Mixer, MixerParam, Project, Track,
        WarpMarker, span,
    },
    preset::PresetBlob,
    value::{ScalarType, ScalarValue, infer_type},
    xml,
};

const TRACK_FIELDS: &[FieldSpec] = &[
    FieldSpec::bare("Name", None),
    FieldSpec::new("EffectiveName").selector("Name/EffectiveName"),
];

const CLIP_FIELDS: &[FieldSpec] = &[
    FieldSpec::bare("Name", None),
    FieldSpec::bare("Annotation", None),
    FieldSpec::bare("LaunchMode", Some(ScalarType::Integer)),
    FieldSpec::bare("CurrentStart", Some(ScalarType::Float)),
    FieldSpec::bare("CurrentEnd", Some(ScalarType::Float)),
    FieldSpec::selected("loopStart", ScalarType::Float, "Loop/LoopStart"),
    FieldSpec::selected("loopEnd", ScalarType::Float, "Loop/LoopEnd"),
    FieldSpec::selected("loopStartRelative", ScalarType::Float, "Loop/LoopStartRelative"),
    FieldSpec::selected("loopOn", ScalarType::Boolean, "Loop/LoopOn"),
];

const DEVICE_FIELDS: &[FieldSpec] = &[
    FieldSpec::bare("UserName", None),
    FieldSpec::new("AuName").selector(AU_PLUGIN_NAME),
    FieldSpec::new("VstName").selector("PluginDesc/VstPluginInfo/PlugName"),
    FieldSpec::new("Vst3Name").selector("PluginDesc/Vst3PluginInfo/Name"),
];

const AU_PLUGIN_NAME: &str = "PluginDesc/AuPluginInfo/Name";
const AU_PRESET_BUFFER: &str = "PluginDesc/AuPluginInfo/Preset/AuPreset/Buffer";

pub fn project(root: Node<'_, '_>, live_set: Node<'_, '_>) -> Result<Project, ParseError> {
    let tracks = match xml::find(live_set, "Tracks") {
        Some(container) => xml::elements(container)
            .map(track)
            .collect::<Result<Vec<_>, _>>()?,
        None => {
            warn!("live set has no Tracks container");
            Vec::new()
        }
    };
    let master_track = xml::find(live_set, "MasterTrack").map(track).transpose()?;

    Ok(Project {
        creator: root.attribute("Creator").map(str::to_owned),
        major_version: root.attribute("MajorVersion").map(str::to_owned),
        minor_version: root.attribute("MinorVersion").map(str::to_owned),
        tracks,
        master_track,
    })
}

pub fn track(element: Node<'_, '_>) -> Result<Track, ParseError> {
    let track_type = xml::tag(element);
    let mut fields = extract_fields(element, TRACK_FIELDS);
    let name = fields
        .take_text("name")
        .or_else(|| fields.take_text("EffectiveName"));

    let devices = xml::find(element, "DeviceChain/DeviceChain/Devices")
        .map(|container| {
            xml::elements(container)
                .map(device)
                .collect::<Result<Vec<_>, _>>()
        })
        .transpose()?
        .unwrap_or_default();

    let mixer = xml::find(element, "DeviceChain/Mixer").map(mixer).transpose()?;

    let clip_slots = xml::find_all(element, "DeviceChain/MainSequencer/ClipSlotList/ClipSlot")
        .into_iter()
        .map(clip_slot)
        .collect();

    let midi_clips = xml::descendants_named(element, "MidiClip")
        .map(midi_clip)
        .collect::<Result<Vec<_>, _>>()?;

    debug!(
        %track_type,
        ?name,
        devices = devices.len(),
        clips = midi_clips.len(),
        "track built"
    );
    Ok(Track {
        track_type,
        name,
        devices,
        mixer,
        clip_slots,
        midi_clips,
    })
}

fn clip_slot(element: Node<'_, '_>) -> ClipSlot {
    ClipSlot {
        id: element.attribute("Id").map(str::to_owned),
        has_clip: xml::find(element, "ClipSlot/Value/*").is_some(),
    }
}

pub fn device(element: Node<'_, '_>) -> Result<Device, ParseError> {
    let device_type = xml::tag(element);
    let mut fields = extract_fields(element, DEVICE_FIELDS);

    let preset = xml::find(element, AU_PRESET_BUFFER)
        .and_then(|buffer| buffer.text())
        .filter(|text| !text.trim().is_empty())
        .map(PresetBlob::decode)
        .transpose()?;
    let preset_buffer_name = preset.as_ref().and_then(|blob| blob.name.clone());

    let au_name = xml::find(element, AU_PLUGIN_NAME).map(|_| {
        [fields.take_text("AuName"), preset_buffer_name]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(": ")
    });

    let preset_name = [
        fields.take_text("userName"),
        au_name,
        fields.take_text("VstName"),
        fields.take_text("Vst3Name"),
    ]
    .into_iter()
    .flatten()
    .find(|candidate| !candidate.is_empty())
    .unwrap_or_default();

    trace!(%device_type, %preset_name, "device built");
    Ok(Device {
        name: format!("{device_type}: {preset_name}"),
        device_type,
        preset_name,
        preset,
    })
}

pub fn mixer(element: Node<'_, '_>) -> Result<Mixer, ParseError> {
    let mut params = BTreeMap::new();
    for child in xml::elements(element).filter(|child| xml::has_child(*child, "ArrangerAutomation"))
    {
        let key = xml::tag(child);
        if params.insert(key.clone(), mixer_param(child)?).is_some() {
            warn!(%key, "duplicate mixer parameter; keeping the last one");
        }
    }
    Ok(Mixer { params })
}

pub fn mixer_param(element: Node<'_, '_>) -> Result<MixerParam, ParseError> {
    let manual_raw = xml::value_at(element, "Manual");
    let value_type = infer_type(manual_raw);
    let coerce = |raw: &str| match value_type {
        Some(value_type) => value_type.coerce_or_raw(raw),
        None => ScalarValue::String(raw.to_owned()),
    };

    let manual = manual_raw.map(coerce);
    let events = xml::find_all(element, "ArrangerAutomation/Events/*")
        .into_iter()
        .map(|event| {
            Ok::<_, ParseError>(AutomationEvent {
                time: required_attribute(event, "Time")?,
                value: event.attribute(xml::VALUE_ATTRIBUTE).map(coerce),
            })
        })
        .collect::<Result<Vec<_>, ParseError>>()?;

    Ok(MixerParam {
        value_type,
        manual,
        events,
    })
}

pub fn midi_clip(element: Node<'_, '_>) -> Result<MidiClip, ParseError> {
    let mut fields = extract_fields(element, CLIP_FIELDS);

    let warp_markers = xml::find_all(element, "WarpMarkers/WarpMarker")
        .into_iter()
        .map(|marker| {
            Ok::<_, ParseError>(WarpMarker {
                sec_time: required_attribute(marker, "SecTime")?,
                beat_time: required_attribute(marker, "BeatTime")?,
            })
        })
        .collect::<Result<Vec<_>, ParseError>>()?;

    let mut notes = Vec::new();
    for key_track in xml::find_all(element, "Notes/KeyTracks/KeyTrack") {
        let key = key_track_key(key_track);
        for event in xml::find_all(key_track, "Notes/MidiNoteEvent") {
            notes.push(midi_note(key, event)?);
        }
    }
    notes.sort_by(|a, b| a.time.total_cmp(&b.time));

    let current_start = fields.take("currentStart");
    let current_end = fields.take("currentEnd");
    let loop_start = fields.take("loopStart");
    let loop_end = fields.take("loopEnd");

    Ok(MidiClip {
        name: fields.take_text("name"),
        annotation: fields.take_text("annotation"),
        launch_mode: fields.take("launchMode"),
        length: span(current_start.as_ref(), current_end.as_ref()),
        loop_length: span(loop_start.as_ref(), loop_end.as_ref()),
        current_start,
        current_end,
        loop_start,
        loop_end,
        loop_start_relative: fields.take("loopStartRelative"),
        loop_on: fields.take("loopOn"),
        warp_markers,
        notes,
    })
}

fn key_track_key(key_track: Node<'_, '_>) -> Option<i64> {
    let raw = xml::value_at(key_track, "MidiKey")?;
    match raw.parse() {
        Ok(key) => Some(key),
        Err(_) => {
            warn!(raw, "ignoring malformed MidiKey");
            None
        }
    }
}

fn midi_note(key: Option<i64>, element: Node<'_, '_>) -> Result<MidiNote, ParseError> {
    Ok(MidiNote {
        time: required_attribute(element, "Time")?,
        key,
        duration: required_attribute(element, "Duration")?,
        velocity: required_attribute(element, "Velocity")?,
        off_velocity: required_attribute(element, "OffVelocity")?,
        is_enabled: element.attribute("IsEnabled") == Some("true"),
    })
}

fn required_attribute<T: std::str::FromStr>(
    element: Node<'_, '_>,
    attribute: &'static str,
) -> Result<T, ParseError> {
    let raw = element.attribute(attribute);
    raw.and_then(|raw| raw.parse().ok())
        .ok_or_else(|| ParseError::Attribute {
            element: xml::tag(element),
            attribute,
            value: raw.map(str::to_owned),
        })
}
