#![no_main]
use libfuzzer_sys::fuzz_target;
use oxilzo::lzo1x;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First two bytes pick the declared output length; the rest is the
    // compressed stream. Any outcome except a panic is acceptable.
    let declared = u16::from_le_bytes([data[0], data[1]]) as usize;
    let stream = &data[2..];
    let _ = lzo1x::decompress(stream, declared);
});
