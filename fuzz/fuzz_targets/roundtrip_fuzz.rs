#![no_main]
use libfuzzer_sys::fuzz_target;
use oxilzo::lzo1x;

fuzz_target!(|data: &[u8]| {
    let compressed = lzo1x::compress(data);
    assert!(compressed.len() <= lzo1x::compress_worst_size(data.len()));
    let decoded = lzo1x::decompress(&compressed, data.len()).expect("own stream must decode");
    assert_eq!(decoded, data);
});
