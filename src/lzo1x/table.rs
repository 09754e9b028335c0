// Prefix-match table for the LZO1X compressor.
//
// A single-slot-per-bucket table keyed by a multiplicative hash of the
// 4 bytes at the scan position. Collisions overwrite; the compressor
// verifies every candidate by re-reading the prefix, so a wrong entry
// only costs a missed match. One table is allocated per compress call
// and cleared at each segment boundary, keeping the codec reentrant.

/// Bucket count exponent.
pub const TABLE_BITS: u32 = 14;

/// Number of buckets.
pub const TABLE_SIZE: usize = 1 << TABLE_BITS;

/// Multiplier for the 4-byte-prefix hash.
pub const HASH_MULT: u32 = 0x1824_429D;

/// Hash a little-endian 4-byte prefix to a bucket index.
#[inline(always)]
pub fn prefix_hash(dv: u32) -> usize {
    ((dv.wrapping_mul(HASH_MULT) >> (32 - TABLE_BITS)) & (TABLE_SIZE as u32 - 1)) as usize
}

/// Match table mapping bucket index to a segment-relative offset.
///
/// There is no "empty" sentinel: a cleared bucket reads as offset 0, the
/// segment base. The compressor's byte comparison rejects it unless the
/// bytes there genuinely match, in which case it is a usable match.
pub struct MatchTable {
    slots: Vec<u16>,
}

impl MatchTable {
    pub fn new() -> Self {
        Self {
            slots: vec![0u16; TABLE_SIZE],
        }
    }

    /// Reset the table for a new segment.
    pub fn reset(&mut self) {
        self.slots.fill(0);
    }

    /// Segment-relative offset most recently stored in `bucket`.
    #[inline(always)]
    pub fn get(&self, bucket: usize) -> usize {
        debug_assert!(bucket < TABLE_SIZE);
        self.slots[bucket] as usize
    }

    /// Record `offset` as the most recent occurrence for `bucket`.
    /// Overwrites any previous entry.
    #[inline(always)]
    pub fn put(&mut self, bucket: usize, offset: u16) {
        debug_assert!(bucket < TABLE_SIZE);
        self.slots[bucket] = offset;
    }
}

impl Default for MatchTable {
    fn default() -> Self {
        Self::new()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
