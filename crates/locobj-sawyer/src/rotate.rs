//! Rotate obfuscation: byte `i` is rotated by a code cycling 1, 3, 5, 7.

fn codes() -> impl Iterator<Item = u32> {
    std::iter::successors(Some(1u32), |code| Some((code + 2) & 7))
}

pub(crate) fn decode(data: &[u8]) -> Vec<u8> {
    data.iter()
        .zip(codes())
        .map(|(&b, code)| b.rotate_right(code))
        .collect()
}

pub(crate) fn encode(data: &[u8]) -> Vec<u8> {
    data.iter()
        .zip(codes())
        .map(|(&b, code)| b.rotate_left(code))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_sequence() {
        assert_eq!(codes().take(6).collect::<Vec<_>>(), [1, 3, 5, 7, 1, 3]);
    }

    #[test]
    fn test_decode_known() {
        assert_eq!(decode(&[0x02, 0x08, 0x20, 0x80]), [0x01, 0x01, 0x01, 0x01]);
        assert_eq!(encode(&[0x01, 0x01, 0x01, 0x01]), [0x02, 0x08, 0x20, 0x80]);
    }
}
