#![cfg(feature = "cli")]

use std::process::Command;
use tempfile::tempdir;

fn bin() -> String {
    env!("CARGO_BIN_EXE_oxilzo").to_string()
}

#[test]
fn cli_compress_decompress_roundtrip() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("input.bin");
    let packed = dir.path().join("input.bin.lzo");
    let output = dir.path().join("output.bin");

    let data: Vec<u8> = (0..50_000u32).map(|i| (i % 113) as u8).collect();
    std::fs::write(&input, &data).unwrap();

    let st = Command::new(bin())
        .arg("compress")
        .arg(&input)
        .status()
        .unwrap();
    assert!(st.success());
    assert!(packed.exists());

    let st = Command::new(bin())
        .arg("decompress")
        .arg(&packed)
        .arg(&output)
        .status()
        .unwrap();
    assert!(st.success());
    assert_eq!(std::fs::read(&output).unwrap(), data);
}

#[test]
fn cli_refuses_overwrite_without_force() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.bin");
    let packed = dir.path().join("in.bin.lzo");
    std::fs::write(&input, b"payload payload payload").unwrap();
    std::fs::write(&packed, b"already here").unwrap();

    let st = Command::new(bin())
        .arg("compress")
        .arg(&input)
        .status()
        .unwrap();
    assert!(!st.success());

    let st = Command::new(bin())
        .args(["--force", "compress"])
        .arg(&input)
        .status()
        .unwrap();
    assert!(st.success());
}

#[test]
fn cli_info_reports_sizes() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("in.bin");
    let packed = dir.path().join("in.bin.lzo");
    std::fs::write(&input, vec![7u8; 1234]).unwrap();

    let st = Command::new(bin())
        .arg("compress")
        .arg(&input)
        .status()
        .unwrap();
    assert!(st.success());

    let out = Command::new(bin()).arg("info").arg(&packed).output().unwrap();
    assert!(out.status.success());
    let text = String::from_utf8_lossy(&out.stdout);
    assert!(text.contains("uncompressed size: 1234"), "got: {text}");
}

#[test]
fn cli_rejects_corrupt_file() {
    let dir = tempdir().unwrap();
    let bogus = dir.path().join("bogus.lzo");
    std::fs::write(&bogus, b"not an oxlz frame at all").unwrap();

    let st = Command::new(bin())
        .arg("decompress")
        .arg(&bogus)
        .status()
        .unwrap();
    assert!(!st.success());
}
