//! Drum-machine project payload types
//!
//! Outgoing projects ([`EncodedProject`]) are serialize-only and carry the
//! fixed kit and playback constants. Projects read back from the service
//! ([`StoredProject`]) keep every track record as raw JSON; the slot lanes of
//! a record are only parsed when the decoder reads that record.

use serde::de::{self, MapAccess, SeqAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::borrow::Cow;
use std::fmt;

use crate::{CodecError, SLOTS_PER_SOUND, SlotProperty, Track};

// =============================================================================
// Constants
// =============================================================================

/// Step count of every lane in the null sentinel track
pub const NULL_TRACK_STEPS: usize = 32;

/// Project-wide playback settings sent with every encoded project.
pub const PROJECT_SETTINGS: ProjectSettings = ProjectSettings {
    application: "OneMotion Drum-Machine",
    kit: "forzee",
    tempo: 90,
    shuffle: 0.67,
    pitch: 8,
    reverb: 0.4,
    lowpass: 1,
    lowpass_q: 0,
    beats: 8,
    beat_div: 8,
    slot_count: 16,
    effect_type: "studio",
    effect_amount: 1,
    beats_per_bar: 4,
    bars: 32,
    config: PlaybackConfig {
        track_order: "default",
    },
};

/// Per-track mixer defaults shared by the sound tracks and the sentinel.
pub const TRACK_MIX: TrackMix = TrackMix {
    volume: 1,
    pitch: 0,
    delay: 0,
    delay_steps: 3,
    lowpass: 1,
    lowpass_q: 0,
    variant: 0,
    rest: 0,
    pan: 0,
    shift: 0,
    effect: 1,
    repeat: 0,
};

// =============================================================================
// Slot lanes
// =============================================================================

/// The bits stored in one slot lane.
///
/// Held as an ordered sequence. On the wire it is a map from the stringified
/// step index to `0` or `1`; when reading, a plain list of bits is accepted
/// too, since the service hands some lanes back in that form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SlotArray(Track);

impl SlotArray {
    pub fn new(bits: Track) -> Self {
        Self(bits)
    }

    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_bits(self) -> Track {
        self.0
    }
}

impl From<Track> for SlotArray {
    fn from(bits: Track) -> Self {
        Self(bits)
    }
}

impl Serialize for SlotArray {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (index, &bit) in self.0.iter().enumerate() {
            map.serialize_entry(&index.to_string(), &u8::from(bit))?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for SlotArray {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(SlotArrayVisitor)
    }
}

struct SlotArrayVisitor;

fn to_bit<E: de::Error>(value: u8) -> Result<bool, E> {
    match value {
        0 => Ok(false),
        1 => Ok(true),
        other => Err(E::custom(format!("slot value {} is not a bit", other))),
    }
}

impl<'de> Visitor<'de> for SlotArrayVisitor {
    type Value = SlotArray;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a list of bits or a map from step index to bit")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<SlotArray, A::Error> {
        let mut bits = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(value) = seq.next_element::<u8>()? {
            bits.push(to_bit::<A::Error>(value)?);
        }
        Ok(SlotArray(bits))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<SlotArray, A::Error> {
        let mut steps: Vec<(usize, bool)> = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some((key, value)) = map.next_entry::<String, u8>()? {
            let index = key.parse::<usize>().map_err(|_| {
                <A::Error as de::Error>::custom(format!("slot key {:?} is not a step index", key))
            })?;
            steps.push((index, to_bit::<A::Error>(value)?));
        }

        steps.sort_unstable_by_key(|&(index, _)| index);
        for (expected, &(index, _)) in steps.iter().enumerate() {
            if index != expected {
                return Err(de::Error::custom(format!(
                    "slot steps must be numbered 0..{} without gaps (found step {} at position {})",
                    steps.len(),
                    index,
                    expected
                )));
            }
        }

        Ok(SlotArray(steps.into_iter().map(|(_, bit)| bit).collect()))
    }
}

/// The eight slot lanes of a sound track.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotProperties {
    pub slot_volume: SlotArray,
    pub slot_pitch: SlotArray,
    pub slot_delay: SlotArray,
    pub slot_lowpass: SlotArray,
    pub slot_lowpass_q: SlotArray,
    pub slot_variant: SlotArray,
    pub slot_rest: SlotArray,
    pub slot_pan: SlotArray,
}

impl SlotProperties {
    /// Fill lanes in [`SlotProperty::ALL`] order; missing tracks leave a lane empty.
    pub fn from_tracks<I: IntoIterator<Item = Track>>(tracks: I) -> Self {
        let mut slots = Self::default();
        for (property, bits) in SlotProperty::ALL.into_iter().zip(tracks) {
            *slots.get_mut(property) = SlotArray::from(bits);
        }
        slots
    }

    /// Take the lanes apart again, in [`SlotProperty::ALL`] order.
    pub fn into_tracks(self) -> [Track; SLOTS_PER_SOUND] {
        [
            self.slot_volume.into_bits(),
            self.slot_pitch.into_bits(),
            self.slot_delay.into_bits(),
            self.slot_lowpass.into_bits(),
            self.slot_lowpass_q.into_bits(),
            self.slot_variant.into_bits(),
            self.slot_rest.into_bits(),
            self.slot_pan.into_bits(),
        ]
    }

    pub fn get(&self, property: SlotProperty) -> &SlotArray {
        match property {
            SlotProperty::Volume => &self.slot_volume,
            SlotProperty::Pitch => &self.slot_pitch,
            SlotProperty::Delay => &self.slot_delay,
            SlotProperty::Lowpass => &self.slot_lowpass,
            SlotProperty::LowpassQ => &self.slot_lowpass_q,
            SlotProperty::Variant => &self.slot_variant,
            SlotProperty::Rest => &self.slot_rest,
            SlotProperty::Pan => &self.slot_pan,
        }
    }

    pub fn get_mut(&mut self, property: SlotProperty) -> &mut SlotArray {
        match property {
            SlotProperty::Volume => &mut self.slot_volume,
            SlotProperty::Pitch => &mut self.slot_pitch,
            SlotProperty::Delay => &mut self.slot_delay,
            SlotProperty::Lowpass => &mut self.slot_lowpass,
            SlotProperty::LowpassQ => &mut self.slot_lowpass_q,
            SlotProperty::Variant => &mut self.slot_variant,
            SlotProperty::Rest => &mut self.slot_rest,
            SlotProperty::Pan => &mut self.slot_pan,
        }
    }
}

/// A track record the decoder can read lanes from.
pub trait SlotSource {
    /// Kit sound of this record, `None` for the sentinel
    fn sound(&self) -> Option<&str>;

    /// The eight lanes of this record.
    ///
    /// Only called for records the decoder actually reads.
    fn slots(&self) -> Result<Cow<'_, SlotProperties>, CodecError>;
}

// =============================================================================
// Outgoing project
// =============================================================================

/// Playback settings at the top level of a project.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ProjectSettings {
    pub application: &'static str,
    pub kit: &'static str,
    pub tempo: u32,
    pub shuffle: f64,
    pub pitch: u32,
    pub reverb: f64,
    pub lowpass: u32,
    pub lowpass_q: u32,
    pub beats: u32,
    pub beat_div: u32,
    pub slot_count: u32,
    pub effect_type: &'static str,
    pub effect_amount: u32,
    pub beats_per_bar: u32,
    pub bars: u32,
    pub config: PlaybackConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlaybackConfig {
    #[serde(rename = "trackOrder")]
    pub track_order: &'static str,
}

/// Scalar mixer fields of a track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrackMix {
    pub volume: i32,
    pub pitch: i32,
    pub delay: i32,
    pub delay_steps: i32,
    pub lowpass: i32,
    pub lowpass_q: i32,
    pub variant: i32,
    pub rest: i32,
    pub pan: i32,
    pub shift: i32,
    pub effect: i32,
    pub repeat: i32,
}

/// A kit sound whose lanes carry data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SoundTrack {
    pub sound: &'static str,
    #[serde(flatten)]
    pub mix: TrackMix,
    pub slot_effect: [u8; 0],
    #[serde(flatten)]
    pub slots: SlotProperties,
}

impl SoundTrack {
    pub fn new(sound: &'static str, slots: SlotProperties) -> Self {
        Self {
            sound,
            mix: TRACK_MIX,
            slot_effect: [],
            slots,
        }
    }
}

impl SlotSource for SoundTrack {
    fn sound(&self) -> Option<&str> {
        Some(self.sound)
    }

    fn slots(&self) -> Result<Cow<'_, SlotProperties>, CodecError> {
        Ok(Cow::Borrowed(&self.slots))
    }
}

/// The sentinel track closing every project.
///
/// Lanes are plain 32-step lists (delay and lowpass fully open, the rest
/// zeroed) and it has an extra `slot_flam` lane.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NullTrack {
    pub sound: Option<&'static str>,
    #[serde(flatten)]
    pub mix: TrackMix,
    pub slot_volume: [u8; NULL_TRACK_STEPS],
    pub slot_pitch: [u8; NULL_TRACK_STEPS],
    pub slot_delay: [u8; NULL_TRACK_STEPS],
    pub slot_lowpass: [u8; NULL_TRACK_STEPS],
    pub slot_lowpass_q: [u8; NULL_TRACK_STEPS],
    pub slot_variant: [u8; NULL_TRACK_STEPS],
    pub slot_rest: [u8; NULL_TRACK_STEPS],
    pub slot_flam: [u8; NULL_TRACK_STEPS],
    pub slot_pan: [u8; NULL_TRACK_STEPS],
    pub slot_effect: serde_json::Map<String, serde_json::Value>,
}

impl Default for NullTrack {
    fn default() -> Self {
        Self {
            sound: None,
            mix: TRACK_MIX,
            slot_volume: [0; NULL_TRACK_STEPS],
            slot_pitch: [0; NULL_TRACK_STEPS],
            slot_delay: [1; NULL_TRACK_STEPS],
            slot_lowpass: [1; NULL_TRACK_STEPS],
            slot_lowpass_q: [0; NULL_TRACK_STEPS],
            slot_variant: [0; NULL_TRACK_STEPS],
            slot_rest: [0; NULL_TRACK_STEPS],
            slot_flam: [0; NULL_TRACK_STEPS],
            slot_pan: [0; NULL_TRACK_STEPS],
            slot_effect: serde_json::Map::new(),
        }
    }
}

/// One entry of a project's `tracks` list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TrackRecord {
    Sound(SoundTrack),
    Null(NullTrack),
}

impl SlotSource for TrackRecord {
    fn sound(&self) -> Option<&str> {
        match self {
            TrackRecord::Sound(track) => track.sound(),
            TrackRecord::Null(_) => None,
        }
    }

    fn slots(&self) -> Result<Cow<'_, SlotProperties>, CodecError> {
        match self {
            TrackRecord::Sound(track) => track.slots(),
            // The sentinel has no sound, so lookups never reach its lanes.
            TrackRecord::Null(_) => Ok(Cow::Owned(SlotProperties::default())),
        }
    }
}

/// A complete project ready to be shared.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EncodedProject {
    #[serde(flatten)]
    pub settings: ProjectSettings,
    pub tracks: Vec<TrackRecord>,
}

impl EncodedProject {
    /// The data-carrying tracks, in kit order
    pub fn sound_tracks(&self) -> impl Iterator<Item = &SoundTrack> {
        self.tracks.iter().filter_map(|record| match record {
            TrackRecord::Sound(track) => Some(track),
            TrackRecord::Null(_) => None,
        })
    }
}

// =============================================================================
// Stored project
// =============================================================================

/// A track as read back from the service or a payload file.
///
/// The record is kept as it came in. Any JSON value is accepted here, so the
/// sentinel or a record the service adds can never fail a lookup. Lanes are
/// parsed (strictly) by [`SlotSource::slots`]; fields other than the sound
/// name and the eight lanes are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct StoredTrack(serde_json::Value);

impl From<serde_json::Value> for StoredTrack {
    fn from(value: serde_json::Value) -> Self {
        Self(value)
    }
}

impl SlotSource for StoredTrack {
    fn sound(&self) -> Option<&str> {
        self.0.get("sound").and_then(serde_json::Value::as_str)
    }

    fn slots(&self) -> Result<Cow<'_, SlotProperties>, CodecError> {
        SlotProperties::deserialize(&self.0)
            .map(Cow::Owned)
            .map_err(|e| CodecError::MalformedTrack {
                sound: self.sound().unwrap_or_default().to_string(),
                reason: e.to_string(),
            })
    }
}

/// Response body of a project lookup by share code.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct StoredProject {
    pub content: ProjectContent,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProjectContent {
    pub tracks: Vec<StoredTrack>,
}
