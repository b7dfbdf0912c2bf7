use alsd_core::{Document, LoadErrorKind, MidiClip, ScalarValue, fixtures::demo_live_set_xml};

fn single_clip(clip_xml: &str) -> Result<MidiClip, alsd_core::LoadError> {
    let xml = format!(
        "<Ableton><LiveSet><Tracks><MidiTrack>{clip_xml}</MidiTrack></Tracks></LiveSet></Ableton>"
    );
    let mut project = Document::from_xml(xml).project()?;
    Ok(project.tracks.remove(0).midi_clips.remove(0))
}

#[test]
fn notes_are_sorted_across_key_tracks() {
    let project = Document::from_xml(demo_live_set_xml())
        .project()
        .expect("demo set should load");
    let clip = &project.tracks[0].midi_clips[0];

    let notes: Vec<(f64, Option<i64>)> = clip.notes.iter().map(|note| (note.time, note.key)).collect();
    assert_eq!(
        notes,
        [(0.0, Some(60)), (2.0, Some(64)), (4.0, Some(60)), (6.0, Some(64))]
    );
    assert!(clip.notes.windows(2).all(|pair| pair[0].time <= pair[1].time));
    assert!((clip.notes[2].velocity - 105.5).abs() < f64::EPSILON);
    assert_eq!(clip.notes[2].off_velocity, 0);
    assert!(!clip.notes[3].is_enabled);
    assert_eq!(clip.max_note_end(), Some(8.0));
}

#[test]
fn clip_fields_and_derived_lengths() {
    let project = Document::from_xml(demo_live_set_xml())
        .project()
        .expect("demo set should load");
    let clip = &project.tracks[0].midi_clips[0];

    assert_eq!(clip.name.as_deref(), Some("Chords"));
    assert_eq!(clip.annotation.as_deref(), Some(""));
    assert_eq!(clip.launch_mode, Some(ScalarValue::Integer(0)));
    assert_eq!(clip.length, Some(16.0));
    assert_eq!(clip.loop_length, Some(8.0));
    assert_eq!(clip.loop_start_relative, Some(ScalarValue::Float(0.0)));
    assert!(clip.is_looping());
    assert_eq!(clip.warp_markers.len(), 2);
    assert!((clip.warp_markers[1].sec_time - 0.25).abs() < f64::EPSILON);
    assert!((clip.warp_markers[1].beat_time - 0.5).abs() < f64::EPSILON);
}

#[test]
fn length_is_end_minus_start() {
    let clip = single_clip(
        r#"<MidiClip><CurrentStart Value="2.0"/><CurrentEnd Value="10.0"/></MidiClip>"#,
    )
    .expect("clip should build");
    assert_eq!(clip.length, Some(8.0));
    assert_eq!(clip.loop_length, None);
}

#[test]
fn length_is_absent_without_both_bounds() {
    let clip = single_clip(r#"<MidiClip><CurrentStart Value="2.0"/></MidiClip>"#)
        .expect("clip should build");
    assert_eq!(clip.length, None);
    assert_eq!(clip.current_end, None);
    assert!(!clip.is_looping());
    assert!(clip.notes.is_empty());
}

#[test]
fn clips_are_found_anywhere_in_the_track() {
    let xml = r#"<Ableton><LiveSet><Tracks><MidiTrack>
        <MidiClip><Name Value="top"/></MidiClip>
        <DeviceChain><Deep><Deeper><MidiClip><Name Value="nested"/></MidiClip></Deeper></Deep></DeviceChain>
    </MidiTrack></Tracks></LiveSet></Ableton>"#;
    let project = Document::from_xml(xml).project().expect("set should load");
    let names: Vec<_> = project.tracks[0]
        .midi_clips
        .iter()
        .map(|clip| clip.name.clone().unwrap_or_default())
        .collect();
    assert_eq!(names, ["top", "nested"]);
}

#[test]
fn key_track_without_midi_key_gives_keyless_notes() {
    let clip = single_clip(
        r#"<MidiClip><Notes><KeyTracks><KeyTrack><Notes>
            <MidiNoteEvent Time="3" Duration="1" Velocity="64" OffVelocity="64" IsEnabled="true"/>
        </Notes></KeyTrack></KeyTracks></Notes></MidiClip>"#,
    )
    .expect("clip should build");
    assert_eq!(clip.notes.len(), 1);
    assert_eq!(clip.notes[0].key, None);
}

#[test]
fn malformed_warp_marker_is_fatal() {
    let error = single_clip(
        r#"<MidiClip><WarpMarkers><WarpMarker SecTime="abc" BeatTime="0"/></WarpMarkers></MidiClip>"#,
    )
    .expect_err("malformed warp marker should fail");
    assert_eq!(error.kind(), LoadErrorKind::Parse);

    let error = single_clip(
        r#"<MidiClip><WarpMarkers><WarpMarker SecTime="0"/></WarpMarkers></MidiClip>"#,
    )
    .expect_err("warp marker without beat time should fail");
    assert_eq!(error.kind(), LoadErrorKind::Parse);
}

#[test]
fn uncoercible_clip_field_keeps_raw_text() {
    let clip = single_clip(
        r#"<MidiClip><LaunchMode Value="gate"/><CurrentStart Value="0"/><CurrentEnd Value="?"/></MidiClip>"#,
    )
    .expect("clip should build");
    assert_eq!(clip.launch_mode, Some(ScalarValue::String("gate".to_string())));
    assert_eq!(clip.current_end, Some(ScalarValue::String("?".to_string())));
    assert_eq!(clip.length, None);
}
