//! Bytes -> drum-machine project

use crate::{
    EncodedProject, NullTrack, PROJECT_SETTINGS, SLOTS_PER_SOUND, SOUNDS, SlotProperties,
    SoundTrack, TRACK_COUNT, Track, TrackRecord, bytes_to_bits, distribute,
};

/// Spread bytes across the [`TRACK_COUNT`] sequencer tracks.
pub fn encode_tracks(bytes: &[u8]) -> Vec<Track> {
    distribute(&bytes_to_bits(bytes))
}

/// Encode bytes into a shareable project.
///
/// Tracks are handed out eight at a time to the kit sounds in [`SOUNDS`]
/// order, then the null sentinel is appended. Never fails; empty input gives
/// empty lanes.
pub fn encode(bytes: &[u8]) -> EncodedProject {
    let tracks = encode_tracks(bytes);
    tracing::debug!(
        bytes = bytes.len(),
        bits = bytes.len() * 8,
        longest_track = tracks.first().map_or(0, Vec::len),
        "distributed bitstream across {} tracks",
        TRACK_COUNT
    );

    let mut lanes = tracks.into_iter();
    let mut records = Vec::with_capacity(SOUNDS.len() + 1);
    for sound in SOUNDS {
        let slots = SlotProperties::from_tracks(lanes.by_ref().take(SLOTS_PER_SOUND));
        records.push(TrackRecord::Sound(SoundTrack::new(sound, slots)));
    }
    records.push(TrackRecord::Null(NullTrack::default()));

    EncodedProject {
        settings: PROJECT_SETTINGS,
        tracks: records,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SlotProperty;

    #[test]
    fn test_encode_empty() {
        let project = encode(&[]);
        assert_eq!(project.tracks.len(), SOUNDS.len() + 1);
        for track in project.sound_tracks() {
            for property in SlotProperty::ALL {
                assert!(track.slots.get(property).is_empty());
            }
        }
    }

    #[test]
    fn test_sound_order() {
        let project = encode(b"abc");
        let sounds: Vec<&str> = project.sound_tracks().map(|t| t.sound).collect();
        assert_eq!(sounds, SOUNDS);
        assert!(matches!(project.tracks.last(), Some(TrackRecord::Null(_))));
    }

    #[test]
    fn test_lane_assignment() {
        // 0x80: only the first bit is set, so only kick/slot_volume holds a 1.
        let project = encode(&[0x80; 8]);
        let kick = project.sound_tracks().next().unwrap();
        assert_eq!(kick.slots.slot_volume.bits(), &[true]);
        assert_eq!(kick.slots.slot_pitch.bits(), &[false]);

        let snare = project.sound_tracks().nth(1).unwrap();
        assert_eq!(snare.slots.slot_volume.bits(), &[true]);
        assert_eq!(snare.slots.slot_pan.bits(), &[false]);
    }

    #[test]
    fn test_encode_tracks_length() {
        let tracks = encode_tracks(&[0u8; 20]);
        assert_eq!(tracks.len(), TRACK_COUNT);
        let total: usize = tracks.iter().map(Vec::len).sum();
        assert_eq!(total, 160);
    }
}
