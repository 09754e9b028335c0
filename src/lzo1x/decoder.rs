// LZO1X decompressor: tag dispatch state machine.
//
// The stream is a sequence of self-delimiting records; which layout the
// next tag byte uses depends on what the previous record was, so the
// decoder runs an explicit state machine rather than a flat loop:
//
//   Start          initial-run special case (first byte > 17)
//   Tag            read a tag after a match with no trailing literals
//   TagAfterRun    read a tag right after a literal run; tags < 16 mean
//                  a 3-byte copy with the distance offset by 0x800
//   Match(t)       decode one of the four back-reference layouts
//   MatchDone      low 2 bits of the last consumed byte give 0..=3
//                  trailing literals, then the next tag goes straight
//                  back to Match
//
// The end of stream is the 16..=31 layout with a zero effective offset;
// after it the input cursor must land exactly on the end of the buffer.
//
// Back-references may overlap the bytes being written (distance shorter
// than length encodes a repeating pattern), so the copy must go byte by
// byte in that case.

use thiserror::Error;

use super::lengths::read_continuation;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Error type for decompression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecompressError {
    /// The compressed input ended before the end-of-stream marker.
    #[error("compressed input truncated at byte {offset}")]
    TruncatedInput { offset: usize },
    /// Unconsumed bytes remain after the end-of-stream marker.
    #[error("{remaining} trailing byte(s) after end-of-stream marker")]
    TrailingData { remaining: usize },
    /// A write would exceed the declared output length.
    #[error("write of {len} byte(s) at {pos} exceeds output length {limit}")]
    BufferOverflow { pos: usize, len: usize, limit: usize },
    /// A back-reference reaches before the start of the output.
    #[error("back-reference distance {distance} exceeds {available} byte(s) written")]
    LookbehindOverrun { distance: usize, available: usize },
    /// The stream ended with fewer bytes than the caller declared.
    #[error("stream produced {actual} of {expected} declared byte(s)")]
    ShortOutput { expected: usize, actual: usize },
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Decompress `src` into a buffer of exactly `expected_len` bytes.
///
/// The LZO1X stream does not record its decompressed size; the caller
/// must supply it. Any malformation is reported as an error, never as
/// partial output.
pub fn decompress(src: &[u8], expected_len: usize) -> Result<Vec<u8>, DecompressError> {
    let mut decoder = Decoder {
        src,
        ip: 0,
        out: vec![0u8; expected_len],
        op: 0,
    };
    decoder.run()?;
    Ok(decoder.out)
}

// ---------------------------------------------------------------------------
// State machine
// ---------------------------------------------------------------------------

enum State {
    Tag,
    TagAfterRun,
    Match(u8),
    MatchDone,
}

struct Decoder<'a> {
    src: &'a [u8],
    ip: usize,
    out: Vec<u8>,
    op: usize,
}

impl Decoder<'_> {
    fn run(&mut self) -> Result<(), DecompressError> {
        let mut state = self.start()?;

        loop {
            state = match state {
                State::Tag => {
                    let t = self.take_byte()?;
                    if t >= 16 {
                        State::Match(t)
                    } else {
                        self.literal_run(t)?
                    }
                }
                State::TagAfterRun => {
                    let t = self.take_byte()?;
                    if t >= 16 {
                        State::Match(t)
                    } else {
                        // 2-byte record: 3-byte copy, distance offset by 0x800.
                        let high = self.take_byte()? as usize;
                        let distance = 0x801 + ((t as usize) >> 2) + (high << 2);
                        self.copy_match(distance, 3)?;
                        State::MatchDone
                    }
                }
                State::Match(t) => match self.decode_match(t)? {
                    Some(next) => next,
                    None => break, // end-of-stream sentinel
                },
                State::MatchDone => {
                    // Low 2 bits of the byte before the input cursor hold a
                    // short literal run glued to the match just copied.
                    let trailing = (self.src[self.ip - 2] & 3) as usize;
                    if trailing == 0 {
                        State::Tag
                    } else {
                        self.copy_literals(trailing)?;
                        let t = self.take_byte()?;
                        State::Match(t)
                    }
                }
            };
        }

        if self.ip < self.src.len() {
            return Err(DecompressError::TrailingData {
                remaining: self.src.len() - self.ip,
            });
        }
        if self.op != self.out.len() {
            return Err(DecompressError::ShortOutput {
                expected: self.out.len(),
                actual: self.op,
            });
        }
        Ok(())
    }

    /// Handle the stream-start special case: a first byte above 17 is an
    /// initial literal run of `byte - 17` bytes.
    fn start(&mut self) -> Result<State, DecompressError> {
        match self.src.first() {
            None => Err(DecompressError::TruncatedInput { offset: 0 }),
            Some(&b) if b > 17 => {
                self.ip = 1;
                let len = (b - 17) as usize;
                self.copy_literals(len)?;
                // A run of 4+ already counts as the post-run state; shorter
                // initial runs go through normal dispatch.
                if len >= 4 {
                    Ok(State::TagAfterRun)
                } else {
                    Ok(State::Tag)
                }
            }
            Some(_) => Ok(State::Tag),
        }
    }

    /// Literal run from the `Tag` state: tag 1..=15 copies `t + 3` bytes,
    /// tag 0 escapes to a continuation length.
    fn literal_run(&mut self, t: u8) -> Result<State, DecompressError> {
        let len = if t == 0 {
            15 + self.read_run_length()?
        } else {
            t as usize
        };
        self.copy_literals(len + 3)?;
        Ok(State::TagAfterRun)
    }

    /// Decode one back-reference record. Returns the next state, or `None`
    /// for the end-of-stream sentinel.
    fn decode_match(&mut self, t: u8) -> Result<Option<State>, DecompressError> {
        if t >= 64 {
            // len 3..=8 and 11-bit distance packed into tag + one byte.
            let high = self.take_byte()? as usize;
            let distance = 1 + ((t as usize >> 2) & 7) + (high << 3);
            let len = (t as usize >> 5) + 1;
            self.copy_match(distance, len)?;
        } else if t >= 32 {
            let mut len = (t & 31) as usize;
            if len == 0 {
                len = 31 + self.read_run_length()?;
            }
            let d = self.take_u16_le()? as usize;
            self.copy_match(1 + (d >> 2), len + 2)?;
        } else if t >= 16 {
            // Distance bit 14 rides in tag bit 3; the length field is the
            // low 3 bits.
            let distance_high = (t as usize & 8) << 11;
            let mut len = (t & 7) as usize;
            if len == 0 {
                len = 7 + self.read_run_length()?;
            }
            let d = self.take_u16_le()? as usize;
            let distance_low = d >> 2;
            if distance_high | distance_low == 0 {
                return Ok(None);
            }
            self.copy_match(0x4000 + distance_high + distance_low, len + 2)?;
        } else {
            // Reachable only via MatchDone: 2-byte copy at a short distance.
            let high = self.take_byte()? as usize;
            let distance = 1 + (t as usize >> 2) + (high << 2);
            self.copy_match(distance, 2)?;
        }
        Ok(Some(State::MatchDone))
    }

    // -- cursor helpers -----------------------------------------------------

    #[inline]
    fn take_byte(&mut self) -> Result<u8, DecompressError> {
        match self.src.get(self.ip) {
            Some(&b) => {
                self.ip += 1;
                Ok(b)
            }
            None => Err(DecompressError::TruncatedInput { offset: self.ip }),
        }
    }

    #[inline]
    fn take_u16_le(&mut self) -> Result<u16, DecompressError> {
        match self.src.get(self.ip..self.ip + 2) {
            Some(pair) => {
                self.ip += 2;
                Ok(u16::from_le_bytes([pair[0], pair[1]]))
            }
            None => Err(DecompressError::TruncatedInput { offset: self.ip }),
        }
    }

    #[inline]
    fn read_run_length(&mut self) -> Result<usize, DecompressError> {
        match read_continuation(self.src, self.ip) {
            Some((value, next)) => {
                self.ip = next;
                Ok(value)
            }
            None => Err(DecompressError::TruncatedInput {
                offset: self.src.len(),
            }),
        }
    }

    // -- copy helpers -------------------------------------------------------

    /// Copy `len` bytes from the input to the output.
    fn copy_literals(&mut self, len: usize) -> Result<(), DecompressError> {
        if self.ip + len > self.src.len() {
            return Err(DecompressError::TruncatedInput { offset: self.ip });
        }
        self.check_write(len)?;
        self.out[self.op..self.op + len].copy_from_slice(&self.src[self.ip..self.ip + len]);
        self.ip += len;
        self.op += len;
        Ok(())
    }

    /// Copy `len` bytes from `distance` bytes behind the write position.
    ///
    /// When the source range overlaps the destination the copy must run
    /// byte by byte so the already-written prefix repeats; a block copy is
    /// only safe once the ranges are disjoint.
    fn copy_match(&mut self, distance: usize, len: usize) -> Result<(), DecompressError> {
        if distance > self.op {
            return Err(DecompressError::LookbehindOverrun {
                distance,
                available: self.op,
            });
        }
        self.check_write(len)?;
        let from = self.op - distance;
        if distance >= len {
            self.out.copy_within(from..from + len, self.op);
        } else {
            for i in 0..len {
                self.out[self.op + i] = self.out[from + i];
            }
        }
        self.op += len;
        Ok(())
    }

    #[inline]
    fn check_write(&self, len: usize) -> Result<(), DecompressError> {
        if self.op + len > self.out.len() {
            return Err(DecompressError::BufferOverflow {
                pos: self.op,
                len,
                limit: self.out.len(),
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
