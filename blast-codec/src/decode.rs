//! Stored project -> bytes

use crate::{
    CodecError, SOUNDS, SlotSource, StoredProject, TRACK_COUNT, Track, bits_to_bytes,
    reconstruct,
};

/// Gather the [`TRACK_COUNT`] lanes of a project in encode order.
///
/// Each kit sound is looked up by name; the first matching record wins.
/// Only those records have their lanes read. Records without a sound (the
/// sentinel) and later duplicates are never looked at.
pub fn collect_tracks<T: SlotSource>(records: &[T]) -> Result<Vec<Track>, CodecError> {
    let mut tracks = Vec::with_capacity(TRACK_COUNT);
    for sound in SOUNDS {
        let record = records
            .iter()
            .find(|record| record.sound() == Some(sound))
            .ok_or_else(|| CodecError::MissingTrack {
                sound: sound.to_string(),
            })?;
        tracks.extend(record.slots()?.into_owned().into_tracks());
    }
    Ok(tracks)
}

/// Decode the bytes stored in a project's track records.
///
/// # Errors
/// Returns [`CodecError::MissingTrack`] if a kit sound has no record, and
/// [`CodecError::MalformedTrack`] if the record read for a sound has a
/// missing or malformed lane.
///
/// A bit count that is not a multiple of 8 is truncated to whole bytes.
pub fn decode<T: SlotSource>(records: &[T]) -> Result<Vec<u8>, CodecError> {
    let tracks = collect_tracks(records)?;
    let bits = reconstruct(&tracks);

    let dropped = bits.len() % 8;
    if dropped != 0 {
        tracing::warn!("dropping {} trailing bits that do not fill a byte", dropped);
    }
    tracing::debug!(bits = bits.len(), bytes = bits.len() / 8, "rebuilt bitstream");

    Ok(bits_to_bytes(&bits))
}

/// Decode a project fetched by share code.
pub fn decode_project(project: &StoredProject) -> Result<Vec<u8>, CodecError> {
    decode(&project.content.tracks)
}
