//! Byte <-> bit expansion (MSB first)

/// Expand bytes into bits, most significant bit first.
pub fn bytes_to_bits(bytes: &[u8]) -> Vec<bool> {
    let mut bits = Vec::with_capacity(bytes.len() * 8);
    for &byte in bytes {
        for shift in (0..8).rev() {
            bits.push((byte >> shift) & 1 == 1);
        }
    }
    bits
}

/// Pack bits into bytes, most significant bit first.
///
/// Trailing bits that do not fill a whole byte are dropped.
pub fn bits_to_bytes(bits: &[bool]) -> Vec<u8> {
    bits.chunks_exact(8)
        .map(|chunk| chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | u8::from(bit)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_msb_first() {
        let bits = bytes_to_bits(&[0b1000_0001, 0x40]);
        assert_eq!(bits.len(), 16);
        assert!(bits[0]);
        assert!(!bits[1]);
        assert!(bits[7]);
        assert!(bits[9]);
        assert_eq!(bits.iter().filter(|&&b| b).count(), 3);
    }

    #[test]
    fn test_pack_bytes() {
        let bits = [true, false, true, false, false, false, false, true];
        assert_eq!(bits_to_bytes(&bits), vec![0xA1]);
    }

    #[test]
    fn test_pack_drops_partial_byte() {
        let mut bits = bytes_to_bits(&[0xFF, 0x0F]);
        bits.extend([true, true, true]);
        assert_eq!(bits_to_bytes(&bits), vec![0xFF, 0x0F]);
    }

    #[test]
    fn test_empty() {
        assert!(bytes_to_bits(&[]).is_empty());
        assert!(bits_to_bytes(&[]).is_empty());
        assert!(bits_to_bytes(&[true; 7]).is_empty());
    }
}
