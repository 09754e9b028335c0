use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use oxilzo::lzo1x::{compress, decompress};

fn gen_data(size: usize, seed: u64) -> Vec<u8> {
    let mut s = seed;
    let mut out = Vec::with_capacity(size);
    for _ in 0..size {
        s = s.wrapping_mul(6364136223846793005).wrapping_add(1);
        out.push((s >> 33) as u8);
    }
    out
}

fn gen_compressible(size: usize) -> Vec<u8> {
    // 512-byte blocks of noise, each repeated once.
    let block = gen_data(512, 7);
    block.iter().cycle().take(size).copied().collect()
}

fn bench_compress(c: &mut Criterion) {
    let mut group = c.benchmark_group("compress");
    for &size in &[4 * 1024usize, 64 * 1024, 1024 * 1024] {
        group.throughput(Throughput::Bytes(size as u64));
        let random = gen_data(size, 1);
        group.bench_with_input(BenchmarkId::new("random", size), &random, |b, data| {
            b.iter(|| compress(black_box(data)));
        });
        let repetitive = gen_compressible(size);
        group.bench_with_input(
            BenchmarkId::new("repetitive", size),
            &repetitive,
            |b, data| {
                b.iter(|| compress(black_box(data)));
            },
        );
    }
    group.finish();
}

fn bench_decompress(c: &mut Criterion) {
    let mut group = c.benchmark_group("decompress");
    for &size in &[4 * 1024usize, 64 * 1024, 1024 * 1024] {
        group.throughput(Throughput::Bytes(size as u64));
        let data = gen_compressible(size);
        let compressed = compress(&data);
        group.bench_with_input(
            BenchmarkId::new("repetitive", size),
            &compressed,
            |b, compressed| {
                b.iter(|| decompress(black_box(compressed), size).unwrap());
            },
        );
    }
    group.finish();
}

criterion_group!(benches, bench_compress, bench_decompress);
criterion_main!(benches);
