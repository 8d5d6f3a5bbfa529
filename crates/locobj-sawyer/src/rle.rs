//! Run-length codecs.
//!
//! Single RLE control bytes: bit 7 set means "repeat the next byte
//! `257 - code` times", clear means "copy the next `code + 1` bytes".
//!
//! Multi RLE runs on top of single RLE. `0xFF` escapes one literal byte; any
//! other byte `b` copies `(b & 7) + 1` bytes starting `32 - (b >> 3)` bytes
//! behind the write head.

use crate::{Error, Result};

/// Longest literal or repeat run a single control byte can describe.
const MAX_RUN: usize = 125;

/// How far back a multi-RLE reference can reach.
const WINDOW: usize = 32;

/// Longest copy a multi-RLE reference can describe.
const MAX_COPY: usize = 8;

const LITERAL_ESCAPE: u8 = 0xFF;

pub(crate) fn decode_single(data: &[u8], out: &mut Vec<u8>) -> Result<()> {
    let mut i = 0;
    while i < data.len() {
        let code = data[i];
        if code & 0x80 != 0 {
            let value = *data.get(i + 1).ok_or(Error::InvalidRle { position: i })?;
            let count = 257 - usize::from(code);
            out.resize(out.len() + count, value);
            i += 2;
        } else {
            let count = usize::from(code) + 1;
            let literal = data
                .get(i + 1..i + 1 + count)
                .ok_or(Error::InvalidRle { position: i })?;
            out.extend_from_slice(literal);
            i += 1 + count;
        }
    }
    Ok(())
}

pub(crate) fn encode_single(data: &[u8], out: &mut Vec<u8>) {
    let mut i = 0;
    let mut literal_start = 0;
    while i < data.len() {
        let value = data[i];
        let run = data[i..]
            .iter()
            .take(MAX_RUN)
            .take_while(|&&b| b == value)
            .count();
        if run >= 2 {
            push_literals(&data[literal_start..i], out);
            out.push((257 - run) as u8);
            out.push(value);
            i += run;
            literal_start = i;
        } else {
            i += 1;
        }
    }
    push_literals(&data[literal_start..], out);
}

fn push_literals(literals: &[u8], out: &mut Vec<u8>) {
    for chunk in literals.chunks(MAX_RUN) {
        out.push((chunk.len() - 1) as u8);
        out.extend_from_slice(chunk);
    }
}

pub(crate) fn decode_multi(data: &[u8], out: &mut Vec<u8>) -> Result<()> {
    let mut i = 0;
    while i < data.len() {
        let code = data[i];
        if code == LITERAL_ESCAPE {
            let value = *data.get(i + 1).ok_or(Error::InvalidRle { position: i })?;
            out.push(value);
            i += 2;
            continue;
        }

        let distance = WINDOW - usize::from(code >> 3);
        let count = usize::from(code & 7) + 1;
        if distance > out.len() {
            return Err(Error::InvalidBackReference {
                position: i,
                distance,
                available: out.len(),
            });
        }
        let start = out.len() - distance;
        for k in 0..count {
            let value = out[start + k];
            out.push(value);
        }
        i += 1;
    }
    Ok(())
}

/// Greedy encoder: at each position take the longest match in the window.
/// Matches never overlap the write head, so a distance-1 reference always
/// copies a single byte and can never collide with the literal escape.
pub(crate) fn encode_multi(data: &[u8], out: &mut Vec<u8>) {
    let Some(&first) = data.first() else {
        return;
    };
    out.push(LITERAL_ESCAPE);
    out.push(first);

    let mut i = 1;
    while i < data.len() {
        let mut best_start = 0;
        let mut best_len = 0;
        for start in i.saturating_sub(WINDOW)..i {
            let limit = MAX_COPY.min(i - start).min(data.len() - i);
            let len = (0..limit)
                .take_while(|&k| data[start + k] == data[i + k])
                .count();
            if len > best_len {
                best_start = start;
                best_len = len;
                if len == MAX_COPY {
                    break;
                }
            }
        }

        if best_len == 0 {
            out.push(LITERAL_ESCAPE);
            out.push(data[i]);
            i += 1;
        } else {
            let distance = i - best_start;
            out.push((((WINDOW - distance) << 3) | (best_len - 1)) as u8);
            i += best_len;
        }
    }
}
