// LZO1X run-length continuation encoding.
//
// Lengths too large for a record's inline field are escaped: the field is
// written as zero and the excess follows as continuation bytes, 255 per
// zero byte, terminated by a non-zero byte holding the final increment.
// Both sides of the codec share these helpers and must match exactly.

/// Append the continuation bytes for `extra` to `out` at `*op`.
///
/// `extra` must be at least 1; a length that fits the inline field is
/// never escaped.
#[inline]
pub fn write_continuation(out: &mut [u8], op: &mut usize, mut extra: usize) {
    debug_assert!(extra >= 1);
    while extra > 255 {
        out[*op] = 0;
        *op += 1;
        extra -= 255;
    }
    out[*op] = extra as u8;
    *op += 1;
}

/// Number of bytes `write_continuation` will emit for `extra`.
#[inline]
pub fn continuation_len(extra: usize) -> usize {
    (extra - 1) / 255 + 1
}

/// Read a continuation starting at `src[ip]`.
///
/// Returns `(value, next_ip)`, or `None` if the input ends before the
/// terminating non-zero byte.
#[inline]
pub fn read_continuation(src: &[u8], mut ip: usize) -> Option<(usize, usize)> {
    let mut value = 0usize;
    loop {
        let byte = *src.get(ip)?;
        ip += 1;
        if byte == 0 {
            value += 255;
        } else {
            return Some((value + byte as usize, ip));
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
