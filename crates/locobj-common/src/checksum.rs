//! Object payload checksums.
//!
//! Every object file carries a 32-bit checksum in its header. It is built by
//! folding bytes into an accumulator: XOR the byte in, then rotate left by 11.

/// Seed value every object checksum starts from.
pub const OBJECT_CHECKSUM_SEED: u32 = 0xF369_A75B;

/// Running checksum accumulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Checksum(u32);

impl Checksum {
    /// Start a checksum from an arbitrary seed.
    #[inline]
    pub const fn new(seed: u32) -> Self {
        Self(seed)
    }

    /// Fold a run of bytes into the accumulator.
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        self.0 = checksum_bytes(data, self.0);
    }

    /// Current accumulator value.
    #[inline]
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl Default for Checksum {
    fn default() -> Self {
        Self::new(OBJECT_CHECKSUM_SEED)
    }
}

/// Fold `data` into `seed` and return the new accumulator value.
#[inline]
pub fn checksum_bytes(data: &[u8], seed: u32) -> u32 {
    data.iter()
        .fold(seed, |acc, &b| (acc ^ u32::from(b)).rotate_left(11))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_keeps_seed() {
        assert_eq!(checksum_bytes(&[], OBJECT_CHECKSUM_SEED), OBJECT_CHECKSUM_SEED);
    }

    #[test]
    fn test_single_byte() {
        assert_eq!(checksum_bytes(&[0], 1), 1 << 11);
        assert_eq!(checksum_bytes(&[1], 1), 0);
        assert_eq!(
            checksum_bytes(&[0], OBJECT_CHECKSUM_SEED),
            OBJECT_CHECKSUM_SEED.rotate_left(11)
        );
    }

    #[test]
    fn test_incremental_matches_one_shot() {
        let data = b"VEHICLE payload bytes";
        let mut checksum = Checksum::default();
        checksum.update(&data[..7]);
        checksum.update(&data[7..]);
        assert_eq!(checksum.value(), checksum_bytes(data, OBJECT_CHECKSUM_SEED));
    }

    #[test]
    fn test_order_sensitive() {
        assert_ne!(
            checksum_bytes(&[1, 2], OBJECT_CHECKSUM_SEED),
            checksum_bytes(&[2, 1], OBJECT_CHECKSUM_SEED)
        );
    }
}
