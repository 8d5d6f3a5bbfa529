//! Chunk encoding tags and dispatch.

use std::fmt;

use crate::{rle, rotate, Error, Result};

/// How a chunk's bytes are stored on disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Encoding {
    Uncompressed = 0,
    RunLengthSingle = 1,
    RunLengthMulti = 2,
    Rotate = 3,
}

impl Encoding {
    /// Map a raw tag to an encoding.
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Uncompressed),
            1 => Some(Self::RunLengthSingle),
            2 => Some(Self::RunLengthMulti),
            3 => Some(Self::Rotate),
            _ => None,
        }
    }

    /// Decode `data` stored with this encoding.
    pub fn decode(self, data: &[u8]) -> Result<Vec<u8>> {
        match self {
            Self::Uncompressed => Ok(data.to_vec()),
            Self::RunLengthSingle => {
                let mut out = Vec::with_capacity(data.len());
                rle::decode_single(data, &mut out)?;
                Ok(out)
            }
            Self::RunLengthMulti => {
                let mut single = Vec::with_capacity(data.len());
                rle::decode_single(data, &mut single)?;
                let mut out = Vec::with_capacity(single.len());
                rle::decode_multi(&single, &mut out)?;
                Ok(out)
            }
            Self::Rotate => Ok(rotate::decode(data)),
        }
    }

    /// Encode `data` with this encoding.
    pub fn encode(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Uncompressed => data.to_vec(),
            Self::RunLengthSingle => {
                let mut out = Vec::with_capacity(data.len());
                rle::encode_single(data, &mut out);
                out
            }
            Self::RunLengthMulti => {
                let mut multi = Vec::with_capacity(data.len());
                rle::encode_multi(data, &mut multi);
                let mut out = Vec::with_capacity(multi.len());
                rle::encode_single(&multi, &mut out);
                out
            }
            Self::Rotate => rotate::encode(data),
        }
    }
}

impl TryFrom<u8> for Encoding {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        Self::from_u8(value).ok_or(Error::UnknownEncoding(value))
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Uncompressed => "uncompressed",
            Self::RunLengthSingle => "rle-single",
            Self::RunLengthMulti => "rle-multi",
            Self::Rotate => "rotate",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<u8> {
        let mut data = b"INTERDEF".to_vec();
        data.extend(std::iter::repeat(0u8).take(300));
        data.extend((0..=255u8).cycle().take(700));
        data.extend_from_slice(b"abcabcabcabcabcabcabcabc\xFF\xFF\xFF");
        data
    }

    #[test]
    fn test_every_encoding_restores_input() {
        let data = sample();
        for encoding in [
            Encoding::Uncompressed,
            Encoding::RunLengthSingle,
            Encoding::RunLengthMulti,
            Encoding::Rotate,
        ] {
            let encoded = encoding.encode(&data);
            assert_eq!(encoding.decode(&encoded).unwrap(), data, "{encoding}");
        }
    }

    #[test]
    fn test_empty_input() {
        for encoding in [Encoding::RunLengthSingle, Encoding::RunLengthMulti] {
            assert!(encoding.encode(&[]).is_empty());
            assert!(encoding.decode(&[]).unwrap().is_empty());
        }
    }

    #[test]
    fn test_unknown_tag() {
        assert!(matches!(Encoding::try_from(4), Err(Error::UnknownEncoding(4))));
        assert_eq!(Encoding::try_from(2).unwrap(), Encoding::RunLengthMulti);
    }
}
