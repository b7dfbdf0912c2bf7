use std::fmt::{self, Write};

use thiserror::Error;

use crate::{
    model::{Project, TIME_SIGNATURE_PARAM, Track},
    time_signature::TimeSignatureError,
    value::ScalarValue,
};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// Only dump this track (0 = master).
    pub track: Option<usize>,
    pub show_devices: bool,
    pub show_clips: bool,
    pub show_master: bool,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReportError {
    #[error("track {requested} does not exist; the set has only {available} tracks")]
    TrackOutOfRange { requested: usize, available: usize },
    #[error(transparent)]
    TimeSignature(#[from] TimeSignatureError),
    #[error("failed to format report")]
    Format(#[from] fmt::Error),
}

// Tracks are numbered from 1; the master track is listed as track 0.
pub fn render_report(project: &Project, options: &ReportOptions) -> Result<String, ReportError> {
    let mut out = String::new();

    if options.show_master {
        render_master_settings(&mut out, project)?;
    }

    match options.track {
        Some(0) => {
            let master = project
                .master_track
                .as_ref()
                .ok_or(ReportError::TrackOutOfRange {
                    requested: 0,
                    available: project.tracks.len(),
                })?;
            render_track(&mut out, 0, master, options)?;
        }
        Some(index) => {
            let track = project
                .tracks
                .get(index - 1)
                .ok_or(ReportError::TrackOutOfRange {
                    requested: index,
                    available: project.tracks.len(),
                })?;
            render_track(&mut out, index, track, options)?;
        }
        None => {
            if let Some(master) = &project.master_track {
                render_track(&mut out, 0, master, options)?;
            }
            for (index, track) in project.tracks.iter().enumerate() {
                render_track(&mut out, index + 1, track, options)?;
            }
        }
    }

    Ok(out)
}

fn render_master_settings(out: &mut String, project: &Project) -> Result<(), ReportError> {
    let Some(mixer) = project
        .master_track
        .as_ref()
        .and_then(|master| master.mixer.as_ref())
    else {
        return Ok(());
    };

    for (key, param) in &mixer.params {
        if key == TIME_SIGNATURE_PARAM {
            continue;
        }
        let manual = param
            .manual
            .as_ref()
            .map_or_else(|| "-".to_string(), ScalarValue::to_string);
        writeln!(out, "{key}: {manual}")?;
    }

    let signatures: Vec<String> = project
        .time_signatures()?
        .iter()
        .map(|change| change.signature.to_string())
        .collect();
    if let [single] = signatures.as_slice() {
        writeln!(out, "Time signature: {single}")?;
    } else {
        writeln!(out, "Time signatures: {}", signatures.join(", "))?;
    }
    Ok(())
}

fn render_track(
    out: &mut String,
    index: usize,
    track: &Track,
    options: &ReportOptions,
) -> fmt::Result {
    let mut description = vec![track.track_type.clone()];
    if let Some(volume) = manual_f64(track, "Volume") {
        description.push(format!("Vol {volume:4.2}"));
    }
    if let Some(pan) = manual_f64(track, "Pan") {
        description.push(format!("Pan {pan:3.2}"));
    }

    writeln!(
        out,
        "{index}: {} ({})",
        track.name.as_deref().unwrap_or("<untitled>"),
        description.join(", ")
    )?;

    if options.show_devices {
        for device in &track.devices {
            writeln!(out, "  {}", device.name)?;
        }
    }
    if options.show_clips {
        for clip in &track.midi_clips {
            writeln!(
                out,
                "  Clip \"{}\" (loop length: {:.6} bars)",
                clip.name.as_deref().unwrap_or_default(),
                clip.loop_length.unwrap_or_default()
            )?;
        }
    }
    Ok(())
}

fn manual_f64(track: &Track, param: &str) -> Option<f64> {
    track
        .param(param)
        .and_then(|param| param.manual.as_ref())
        .and_then(ScalarValue::as_f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        document::Document,
        fixtures::demo_live_set_xml,
        model::AutomationEvent,
    };

    fn demo() -> Project {
        Document::from_xml(demo_live_set_xml())
            .project()
            .expect("demo set should load")
    }

    #[test]
    fn lists_master_first_then_numbered_tracks() {
        let report = render_report(&demo(), &ReportOptions::default()).expect("report");
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(
            lines,
            [
                "0: <untitled> (MasterTrack, Vol 0.85)",
                "1: Keys (MidiTrack, Vol 0.75, Pan -0.25)",
                "2: Drums (AudioTrack)",
            ]
        );
    }

    #[test]
    fn master_settings_are_key_sorted_without_time_signature() {
        let options = ReportOptions {
            track: Some(0),
            show_master: true,
            ..ReportOptions::default()
        };
        let report = render_report(&demo(), &options).expect("report");
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(
            lines,
            [
                "Tempo: 120",
                "Volume: 0.85",
                "Time signatures: 4/4, 3/4",
                "0: <untitled> (MasterTrack, Vol 0.85)",
            ]
        );
    }

    #[test]
    fn devices_and_clips_are_indented_under_their_track() {
        let options = ReportOptions {
            track: Some(1),
            show_devices: true,
            show_clips: true,
            ..ReportOptions::default()
        };
        let report = render_report(&demo(), &options).expect("report");
        assert!(report.contains("  PluginDevice: Alchemy: Warm Pad\n"));
        assert!(report.contains("  PluginDevice: ValhallaRoom\n"));
        assert!(report.contains("  Compressor2: Glue\n"));
        assert!(report.contains("  Clip \"Chords\" (loop length: 8.000000 bars)\n"));
    }

    #[test]
    fn out_of_range_track_is_an_error() {
        let options = ReportOptions {
            track: Some(3),
            ..ReportOptions::default()
        };
        assert_eq!(
            render_report(&demo(), &options),
            Err(ReportError::TrackOutOfRange {
                requested: 3,
                available: 2
            })
        );
        let master_only = ReportOptions {
            track: Some(0),
            ..ReportOptions::default()
        };
        assert!(render_report(&Project::default(), &master_only).is_err());
    }

    #[test]
    fn undecodable_time_signature_fails_the_master_section() {
        let mut project = demo();
        project
            .master_track
            .as_mut()
            .and_then(|master| master.mixer.as_mut())
            .and_then(|mixer| mixer.params.get_mut(TIME_SIGNATURE_PARAM))
            .expect("demo master should automate its meter")
            .events
            .push(AutomationEvent {
                time: 96,
                value: Some(ScalarValue::String("bad".to_string())),
            });

        let options = ReportOptions {
            show_master: true,
            ..ReportOptions::default()
        };
        assert_eq!(
            render_report(&project, &options),
            Err(ReportError::TimeSignature(TimeSignatureError::NotAnInteger {
                time: 96,
                value: Some("bad".to_string()),
            }))
        );
        assert!(render_report(&project, &ReportOptions::default()).is_ok());
    }
}
