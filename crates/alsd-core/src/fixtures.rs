use std::{fs, io::Write, path::Path};

use anyhow::{Context, Result};
use flate2::{Compression, write::GzEncoder};
use tracing::instrument;

// Hex digits per line, as Live wraps preset buffers.
const HEX_LINE_WIDTH: usize = 80;

#[must_use]
pub fn preset_plist(name: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
	<key>manufacturer</key>
	<integer>1097155921</integer>
	<key>name</key>
	<string>{name}</string>
	<key>version</key>
	<integer>0</integer>
</dict>
</plist>
"#
    )
}

#[must_use]
pub fn encode_hex_wrapped(bytes: &[u8]) -> String {
    let hex: String = bytes.iter().map(|byte| format!("{byte:02X}")).collect();
    let mut wrapped = String::from("\n");
    for line in hex.as_bytes().chunks(HEX_LINE_WIDTH) {
        wrapped.push_str("\t\t\t\t\t\t\t");
        wrapped.push_str(&String::from_utf8_lossy(line));
        wrapped.push('\n');
    }
    wrapped
}

#[must_use]
pub fn demo_live_set_xml() -> String {
    let pad_buffer = encode_hex_wrapped(preset_plist("Warm Pad").as_bytes());
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<Ableton MajorVersion="5" MinorVersion="9.7_178" SchemaChangeCount="3" Creator="Ableton Live 9.7.7">
	<LiveSet>
		<Tracks>
			<MidiTrack Id="8">
				<Name Value="Keys" />
				<DeviceChain>
					<MainSequencer>
						<ClipSlotList>
							<ClipSlot Id="0">
								<ClipSlot>
									<Value>
										<MidiClip Time="0">
											<Name Value="Chords" />
											<Annotation Value="" />
											<LaunchMode Value="0" />
											<CurrentStart Value="0" />
											<CurrentEnd Value="16" />
											<Loop>
												<LoopStart Value="0" />
												<LoopEnd Value="8" />
												<LoopStartRelative Value="0" />
												<LoopOn Value="true" />
											</Loop>
											<WarpMarkers>
												<WarpMarker SecTime="0" BeatTime="0" />
												<WarpMarker SecTime="0.25" BeatTime="0.5" />
											</WarpMarkers>
											<Notes>
												<KeyTracks>
													<KeyTrack Id="0">
														<Notes>
															<MidiNoteEvent Time="2" Duration="1" Velocity="100" OffVelocity="64" IsEnabled="true" />
															<MidiNoteEvent Time="6" Duration="2" Velocity="90" OffVelocity="64" IsEnabled="false" />
														</Notes>
														<MidiKey Value="64" />
													</KeyTrack>
													<KeyTrack Id="1">
														<Notes>
															<MidiNoteEvent Time="0" Duration="4" Velocity="110" OffVelocity="64" IsEnabled="true" />
															<MidiNoteEvent Time="4" Duration="4" Velocity="105.5" OffVelocity="0" IsEnabled="true" />
														</Notes>
														<MidiKey Value="60" />
													</KeyTrack>
												</KeyTracks>
											</Notes>
										</MidiClip>
									</Value>
								</ClipSlot>
							</ClipSlot>
							<ClipSlot Id="1">
								<ClipSlot>
									<Value />
								</ClipSlot>
							</ClipSlot>
						</ClipSlotList>
					</MainSequencer>
					<DeviceChain>
						<Devices>
							<PluginDevice Id="0">
								<PluginDesc>
									<AuPluginInfo Id="0">
										<Name Value="Alchemy" />
										<Manufacturer Value="Camel Audio" />
										<Preset>
											<AuPreset Id="0">
												<Buffer>{pad_buffer}</Buffer>
											</AuPreset>
										</Preset>
									</AuPluginInfo>
								</PluginDesc>
							</PluginDevice>
							<PluginDevice Id="1">
								<UserName Value="" />
								<PluginDesc>
									<VstPluginInfo Id="0">
										<PlugName Value="ValhallaRoom" />
									</VstPluginInfo>
								</PluginDesc>
							</PluginDevice>
							<Compressor2 Id="2">
								<UserName Value="Glue" />
							</Compressor2>
						</Devices>
					</DeviceChain>
					<Mixer>
						<On>
							<Manual Value="true" />
							<ArrangerAutomation>
								<Events />
							</ArrangerAutomation>
						</On>
						<Pan>
							<Manual Value="-0.25" />
							<ArrangerAutomation>
								<Events>
									<FloatEvent Id="1" Time="-63072000" Value="-0.25" />
									<FloatEvent Id="2" Time="8" Value="0.5" />
								</Events>
							</ArrangerAutomation>
						</Pan>
						<Volume>
							<Manual Value="0.75" />
							<ArrangerAutomation>
								<Events />
							</ArrangerAutomation>
						</Volume>
						<ViewStateSesstionTrackWidth Value="93" />
					</Mixer>
				</DeviceChain>
			</MidiTrack>
			<AudioTrack Id="9">
				<Name>
					<EffectiveName Value="Drums" />
				</Name>
			</AudioTrack>
		</Tracks>
		<MasterTrack>
			<DeviceChain>
				<Mixer>
					<Tempo>
						<Manual Value="120" />
						<ArrangerAutomation>
							<Events>
								<FloatEvent Id="3" Time="-63072000" Value="120" />
							</Events>
						</ArrangerAutomation>
					</Tempo>
					<TimeSignature>
						<Manual Value="201" />
						<ArrangerAutomation>
							<Events>
								<EnumEvent Id="4" Time="-63072000" Value="201" />
								<EnumEvent Id="5" Time="64" Value="200" />
							</Events>
						</ArrangerAutomation>
					</TimeSignature>
					<Volume>
						<Manual Value="0.85" />
						<ArrangerAutomation>
							<Events />
						</ArrangerAutomation>
					</Volume>
				</Mixer>
			</DeviceChain>
		</MasterTrack>
	</LiveSet>
</Ableton>
"#
    )
}

pub fn gzip_bytes(xml: &str) -> Result<Vec<u8>> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(xml.as_bytes())
        .context("failed to compress live set")?;
    encoder.finish().context("failed to finish live set stream")
}

#[instrument(skip(xml), fields(path = %path.display()))]
pub fn write_live_set(path: &Path, xml: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create directory: {}", parent.display()))?;
    }
    fs::write(path, gzip_bytes(xml)?)
        .with_context(|| format!("failed to write live set: {}", path.display()))
}

pub fn write_demo_live_set(path: &Path) -> Result<()> {
    write_live_set(path, &demo_live_set_xml())
}
