// LZO1X-1 compressor: greedy match search and record emission.
//
// The input is processed in segments of at most MAX_SEGMENT bytes so that
// segment-relative offsets fit the table's u16 entries and the encoded
// distance fields. Within a segment, a single-probe hash table maps each
// 4-byte prefix to its most recent occurrence; the scan skips ahead
// faster the longer it has gone without a match, which bounds the cost
// on incompressible data.
//
// Record layouts (first byte `t` of each record):
//   t >= 64            2-byte match, len 3..=8, distance <= 0x0800
//   32 <= t <= 63      match with 16-bit distance field, distance <= 0x4000
//   16 <= t <= 31      far match, distance 0x4001..=0xBFFF; distance bit 14
//                      is carried in tag bit 3
//   1 <= t <= 15       literal run of t + 3 bytes
//   t == 0             literal run of 18 + continuation bytes
// The low 2 bits of the byte before each tag position hold a 0..=3 byte
// literal run squeezed between a match and the next record.

use thiserror::Error;

use super::lengths::write_continuation;
use super::table::{MatchTable, prefix_hash};
use super::{END_MARKER, LOOKAHEAD_SLACK, MAX_SEGMENT};

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for compression into a caller-supplied buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CompressError {
    /// Destination buffer is smaller than the worst-case bound for the input.
    #[error("destination holds {provided} byte(s), worst case needs {required}")]
    BufferTooSmall { provided: usize, required: usize },
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Worst-case compressed size for `len` input bytes.
pub const fn compress_worst_size(len: usize) -> usize {
    len + len / 16 + 64 + 3
}

/// Compress `input`, returning a buffer holding exactly the compressed bytes.
///
/// A zero-length input compresses to just the end marker.
pub fn compress(input: &[u8]) -> Vec<u8> {
    let mut out = vec![0u8; compress_worst_size(input.len())];
    let written = compress_all(input, &mut out);
    out.truncate(written);
    out
}

/// Compress `input` into `out`, returning the compressed length.
///
/// `out` must be at least [`compress_worst_size`]`(input.len())` bytes;
/// the bound is checked up front so the encoder itself never writes out
/// of range.
pub fn compress_into(input: &[u8], out: &mut [u8]) -> Result<usize, CompressError> {
    let required = compress_worst_size(input.len());
    if out.len() < required {
        return Err(CompressError::BufferTooSmall {
            provided: out.len(),
            required,
        });
    }
    Ok(compress_all(input, out))
}

// ---------------------------------------------------------------------------
// Segment driver
// ---------------------------------------------------------------------------

fn compress_all(input: &[u8], out: &mut [u8]) -> usize {
    let mut table = MatchTable::new();
    let mut op = 0usize;
    let mut in_pos = 0usize;
    let mut remaining = input.len();
    // Literal bytes scanned but not yet emitted, carried across segments.
    let mut pending = 0usize;

    while remaining > LOOKAHEAD_SLACK {
        let seg_len = remaining.min(MAX_SEGMENT);
        if (pending + seg_len) >> 5 == 0 {
            break;
        }
        table.reset();
        pending = compress_segment(input, in_pos, seg_len, pending, out, &mut op, &mut table);
        in_pos += seg_len;
        remaining -= seg_len;
    }

    pending += remaining;
    if pending > 0 {
        let tail = input.len() - pending;
        emit_run_length(out, &mut op, pending, true);
        out[op..op + pending].copy_from_slice(&input[tail..]);
        op += pending;
    }

    out[op..op + END_MARKER.len()].copy_from_slice(&END_MARKER);
    op + END_MARKER.len()
}

// ---------------------------------------------------------------------------
// Per-segment match search
// ---------------------------------------------------------------------------

/// Compress one segment, returning the count of trailing bytes left for
/// the caller to emit (or to hand to the next segment).
///
/// `pending` literal bytes immediately before `in_start` are still
/// unemitted; they join the first literal run flushed here.
fn compress_segment(
    input: &[u8],
    in_start: usize,
    seg_len: usize,
    pending: usize,
    out: &mut [u8],
    op: &mut usize,
    table: &mut MatchTable,
) -> usize {
    let in_end = in_start + seg_len;
    let scan_end = in_end - LOOKAHEAD_SLACK;
    // Start of the unemitted literal run.
    let mut run_start = in_start;
    let mut pending = pending;
    let mut ip = in_start + if pending < 4 { 4 - pending } else { 0 };
    // Set after a match: retry the current position before skipping ahead.
    let mut at_match_end = false;

    loop {
        if !at_match_end {
            ip += 1 + ((ip - run_start) >> 5);
        }
        at_match_end = false;
        if ip >= scan_end {
            break;
        }

        let dv = read_u32_le(input, ip);
        let bucket = prefix_hash(dv);
        let m_pos = in_start + table.get(bucket);
        table.put(bucket, (ip - in_start) as u16);
        if dv != read_u32_le(input, m_pos) {
            continue;
        }

        // Flush literals gathered since the last match.
        run_start -= pending;
        pending = 0;
        let run = ip - run_start;
        if run != 0 {
            emit_run_length(out, op, run, false);
            out[*op..*op + run].copy_from_slice(&input[run_start..ip]);
            *op += run;
        }

        // Extend the match 4 bytes at a time; the first differing byte
        // shows up as the lowest non-zero byte of the XOR.
        let mut m_len = 4usize;
        loop {
            let x = read_u32_le(input, ip + m_len) ^ read_u32_le(input, m_pos + m_len);
            if x != 0 {
                m_len += (x.trailing_zeros() >> 3) as usize;
                break;
            }
            m_len += 4;
            if ip + m_len >= scan_end {
                break;
            }
        }

        let m_off = ip - m_pos;
        ip += m_len;
        run_start = ip;
        emit_match(out, op, m_off, m_len);
        at_match_end = true;
    }

    in_end - (run_start - pending)
}

// ---------------------------------------------------------------------------
// Record emission
// ---------------------------------------------------------------------------

/// Emit the length portion of a literal run of `len` bytes.
///
/// Runs of 1..=3 bytes occupy the low 2 bits of the second-to-last byte
/// already written (free in every match record). The very first record of
/// a stream gets a single-byte form when the whole output is one short
/// run.
fn emit_run_length(out: &mut [u8], op: &mut usize, len: usize, is_final: bool) {
    if is_final && *op == 0 && len <= 238 {
        out[*op] = (17 + len) as u8;
        *op += 1;
    } else if len <= 3 {
        out[*op - 2] |= len as u8;
    } else if len <= 18 {
        out[*op] = (len - 3) as u8;
        *op += 1;
    } else {
        out[*op] = 0;
        *op += 1;
        write_continuation(out, op, len - 18);
    }
}

/// Emit one back-reference record for a match of `m_len` bytes at
/// distance `m_off`.
fn emit_match(out: &mut [u8], op: &mut usize, mut m_off: usize, mut m_len: usize) {
    if m_len <= 8 && m_off <= 0x0800 {
        m_off -= 1;
        out[*op] = ((m_len - 1) << 5 | (m_off & 7) << 2) as u8;
        out[*op + 1] = (m_off >> 3) as u8;
        *op += 2;
    } else if m_off <= 0x4000 {
        m_off -= 1;
        if m_len <= 33 {
            out[*op] = (32 | (m_len - 2)) as u8;
            *op += 1;
        } else {
            m_len -= 33;
            out[*op] = 32;
            *op += 1;
            write_continuation(out, op, m_len);
        }
        out[*op] = (m_off << 2) as u8;
        out[*op + 1] = (m_off >> 6) as u8;
        *op += 2;
    } else {
        m_off -= 0x4000;
        if m_len <= 9 {
            out[*op] = (16 | ((m_off >> 11) & 8) | (m_len - 2)) as u8;
            *op += 1;
        } else {
            m_len -= 9;
            out[*op] = (16 | ((m_off >> 11) & 8)) as u8;
            *op += 1;
            write_continuation(out, op, m_len);
        }
        out[*op] = (m_off << 2) as u8;
        out[*op + 1] = (m_off >> 6) as u8;
        *op += 2;
    }
}

/// Read 4 bytes at `pos` as a little-endian u32.
#[inline(always)]
fn read_u32_le(buf: &[u8], pos: usize) -> u32 {
    debug_assert!(pos + 4 <= buf.len());
    u32::from_le_bytes([buf[pos], buf[pos + 1], buf[pos + 2], buf[pos + 3]])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_just_the_end_marker() {
        assert_eq!(compress(&[]), END_MARKER);
    }

    #[test]
    fn tiny_input_uses_initial_run_shortcut() {
        // 5 bytes: single-byte length 17 + 5, the raw bytes, end marker.
        let data = b"hello";
        let compressed = compress(data);
        assert_eq!(compressed[0], 17 + 5);
        assert_eq!(&compressed[1..6], data);
        assert_eq!(&compressed[6..], END_MARKER);
    }

    #[test]
    fn short_inputs_stay_uncompressed() {
        // At or below the lookahead slack the match loop never runs.
        for len in 1..=LOOKAHEAD_SLACK {
            let data: Vec<u8> = (0..len as u8).collect();
            let compressed = compress(&data);
            assert_eq!(compressed[0] as usize, 17 + len);
            assert_eq!(&compressed[1..1 + len], &data[..]);
        }
    }

    #[test]
    fn zeros_compress_far_below_input_size() {
        let data = [0u8; 4096];
        let compressed = compress(&data);
        assert!(compressed.len() < 64, "got {} bytes", compressed.len());
    }

    #[test]
    fn repeated_block_yields_known_stream() {
        // 100 zero bytes: 5-byte literal run, one long match, 19-byte tail run.
        let data = [0u8; 100];
        let compressed = compress(&data);
        let expected = [
            &[2u8][..],            // literal run of 5
            &[0; 5],               // the run itself
            &[32, 43, 16, 0],      // match: len 33+43=76, distance 5
            &[0, 1],               // literal escape: 18+1=19
            &[0; 19],              // tail run
            &END_MARKER,
        ]
        .concat();
        assert_eq!(compressed, expected);
    }

    #[test]
    fn determinism() {
        let data: Vec<u8> = (0..2000u32).map(|i| (i * 31 % 251) as u8).collect();
        assert_eq!(compress(&data), compress(&data));
    }

    #[test]
    fn compressed_size_respects_worst_case_bound() {
        for len in [0usize, 1, 20, 21, 100, 400, 2000] {
            let data: Vec<u8> = (0..len as u32).map(|i| (i * 7 + i / 3) as u8).collect();
            assert!(compress(&data).len() <= compress_worst_size(len));
        }
    }

    #[test]
    fn compress_into_rejects_small_buffer() {
        let data = [0u8; 100];
        let mut out = [0u8; 10];
        assert_eq!(
            compress_into(&data, &mut out),
            Err(CompressError::BufferTooSmall {
                provided: 10,
                required: compress_worst_size(100),
            })
        );
    }

    #[test]
    fn compress_into_matches_compress() {
        let data: Vec<u8> = (0..500u32).map(|i| (i % 17) as u8).collect();
        let mut out = vec![0u8; compress_worst_size(data.len())];
        let n = compress_into(&data, &mut out).unwrap();
        assert_eq!(&out[..n], &compress(&data)[..]);
    }
}
