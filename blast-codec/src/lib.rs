//! Blast-Codec: bytes stored as drum-machine step sequencer cells
//!
//! The OneMotion Drum-Machine keeps, for every sound, eight per-step
//! parameter lanes (volume, pitch, delay, ...). Each cell of a lane is a
//! number, so a lane can carry one bit per cell. Eight sounds with eight
//! lanes each give 64 parallel tracks.
//!
//! **This is a pure codec** - it turns bytes into a project payload and a
//! stored project back into bytes. HTTP and image handling live in the
//! `blastbeat` CLI.
//!
//! # Layout
//!
//! ```text
//! bytes  ->  bits (MSB first)  ->  track k % 64  ->  sound k/8, lane k%8
//!
//!   track  0..7   forzee_kick     slot_volume .. slot_pan
//!   track  8..15  forzee_snare    slot_volume .. slot_pan
//!   ...
//!   track 56..63  forzee_tom_med  slot_volume .. slot_pan
//! ```
//!
//! A ninth "null" sentinel track is appended on encode. It carries no data
//! and is never read back.
//!
//! # Usage
//!
//! ```
//! use blast_codec::{decode, encode};
//!
//! let bytes = b"\x89PNG\r\n\x1a\n";
//! let project = encode(bytes);
//! assert_eq!(project.tracks.len(), 9);
//!
//! let decoded = decode(&project.tracks).unwrap();
//! assert_eq!(decoded, bytes);
//! ```

mod bits;
mod decode;
mod encode;
mod error;
mod layout;
mod payload;

pub use bits::{bits_to_bytes, bytes_to_bits};
pub use decode::{collect_tracks, decode, decode_project};
pub use encode::{encode, encode_tracks};
pub use error::CodecError;
pub use layout::{distribute, reconstruct};
pub use payload::{
    EncodedProject, NULL_TRACK_STEPS, NullTrack, PROJECT_SETTINGS, PlaybackConfig,
    ProjectContent, ProjectSettings, SlotArray, SlotProperties, SlotSource, SoundTrack,
    StoredProject, StoredTrack, TRACK_MIX, TrackMix, TrackRecord,
};

// =============================================================================
// Constants
// =============================================================================

/// One sequencer track: the bits stored in a single slot lane
pub type Track = Vec<bool>;

/// Number of parallel tracks the bitstream is spread across
pub const TRACK_COUNT: usize = 64;

/// Slot lanes per sound
pub const SLOTS_PER_SOUND: usize = 8;

/// Sounds of the `forzee` kit, in track order
pub const SOUNDS: [&str; 8] = [
    "forzee_kick",
    "forzee_snare",
    "forzee_hihat",
    "forzee_tom_lo",
    "forzee_ride",
    "forzee_crash",
    "forzee_tom_hi",
    "forzee_tom_med",
];

/// A per-step parameter lane of a sound.
///
/// Variant order is the order tracks are assigned within a sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotProperty {
    Volume,
    Pitch,
    Delay,
    Lowpass,
    LowpassQ,
    Variant,
    Rest,
    Pan,
}

impl SlotProperty {
    /// All lanes in track order
    pub const ALL: [SlotProperty; SLOTS_PER_SOUND] = [
        SlotProperty::Volume,
        SlotProperty::Pitch,
        SlotProperty::Delay,
        SlotProperty::Lowpass,
        SlotProperty::LowpassQ,
        SlotProperty::Variant,
        SlotProperty::Rest,
        SlotProperty::Pan,
    ];

    /// Field name used by the drum machine
    pub fn key(self) -> &'static str {
        match self {
            SlotProperty::Volume => "slot_volume",
            SlotProperty::Pitch => "slot_pitch",
            SlotProperty::Delay => "slot_delay",
            SlotProperty::Lowpass => "slot_lowpass",
            SlotProperty::LowpassQ => "slot_lowpass_q",
            SlotProperty::Variant => "slot_variant",
            SlotProperty::Rest => "slot_rest",
            SlotProperty::Pan => "slot_pan",
        }
    }
}
