//! Round-robin track layout
//!
//! `distribute` deals bit `k` to track `k % 64`. `reconstruct` walks the
//! tracks position by position and skips tracks that are already exhausted.
//!
//! For tracks produced by `distribute` the pair is an exact inverse: the
//! longer tracks are always the leading ones, so the final partial round is
//! read back in the same order it was dealt. Tracks of any other shape (an
//! edited project where a later track is longer than an earlier one) are
//! still read with the skip rule, which then interleaves differently from
//! the original stream.

use crate::{TRACK_COUNT, Track};

/// Deal bits round-robin across [`TRACK_COUNT`] tracks.
pub fn distribute(bits: &[bool]) -> Vec<Track> {
    let per_track = bits.len().div_ceil(TRACK_COUNT);
    let mut tracks: Vec<Track> = (0..TRACK_COUNT)
        .map(|_| Vec::with_capacity(per_track))
        .collect();
    for (index, &bit) in bits.iter().enumerate() {
        tracks[index % TRACK_COUNT].push(bit);
    }
    tracks
}

/// Interleave tracks back into one bitstream.
///
/// Position `i` of every track is emitted before position `i + 1` of any
/// track; tracks shorter than `i + 1` contribute nothing at that position.
pub fn reconstruct<T: AsRef<[bool]>>(tracks: &[T]) -> Vec<bool> {
    let max_len = tracks
        .iter()
        .map(|track| track.as_ref().len())
        .max()
        .unwrap_or(0);
    let total: usize = tracks.iter().map(|track| track.as_ref().len()).sum();

    let mut bits = Vec::with_capacity(total);
    for position in 0..max_len {
        for track in tracks {
            if let Some(&bit) = track.as_ref().get(position) {
                bits.push(bit);
            }
        }
    }
    bits
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(len: usize) -> Vec<bool> {
        (0..len).map(|i| (i * 7 + i / 3) % 5 < 2).collect()
    }

    #[test]
    fn test_distribute_even() {
        let tracks = distribute(&pattern(128));
        assert_eq!(tracks.len(), TRACK_COUNT);
        assert!(tracks.iter().all(|t| t.len() == 2));
    }

    #[test]
    fn test_distribute_preallocates_every_track() {
        // Nine bits per track; growing by pushes alone would end at 16.
        let tracks = distribute(&pattern(TRACK_COUNT * 9));
        assert!(tracks.iter().all(|t| (9..16).contains(&t.capacity())));
    }

    #[test]
    fn test_distribute_remainder_goes_to_leading_tracks() {
        let tracks = distribute(&pattern(64 * 3 + 10));
        for (index, track) in tracks.iter().enumerate() {
            let expected = if index < 10 { 4 } else { 3 };
            assert_eq!(track.len(), expected, "track {}", index);
        }
    }

    #[test]
    fn test_distribute_assigns_by_index() {
        let bits = pattern(200);
        let tracks = distribute(&bits);
        for (k, &bit) in bits.iter().enumerate() {
            assert_eq!(tracks[k % TRACK_COUNT][k / TRACK_COUNT], bit);
        }
    }

    #[test]
    fn test_reconstruct_inverts_distribute() {
        for len in [0, 1, 8, 63, 64, 65, 127, 128, 1000, 4096 + 24] {
            let bits = pattern(len);
            assert_eq!(reconstruct(&distribute(&bits)), bits, "length {}", len);
        }
    }

    #[test]
    fn test_reconstruct_empty() {
        let tracks: Vec<Track> = Vec::new();
        assert!(reconstruct(&tracks).is_empty());
        assert!(reconstruct(&distribute(&[])).is_empty());
    }

    #[test]
    fn test_reconstruct_skips_exhausted_tracks() {
        // A later track longer than an earlier one: not a distribute shape.
        let tracks = vec![vec![true], vec![false, true, true], vec![false, false]];
        assert_eq!(
            reconstruct(&tracks),
            vec![true, false, false, true, false, true]
        );
    }

    #[test]
    fn test_reconstruct_borrowed_slices() {
        let a = [true, false];
        let b = [false];
        let tracks: Vec<&[bool]> = vec![&a, &b];
        assert_eq!(reconstruct(&tracks), vec![true, false, false]);
    }
}
