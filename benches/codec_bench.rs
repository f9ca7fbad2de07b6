use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use scavenger::decoder::Decoder;
use scavenger::encoder::Encoder;
use tempfile::NamedTempFile;

fn build_archive(object_size: usize, object_count: usize) -> std::path::PathBuf {
    let path = NamedTempFile::new().unwrap().into_temp_path().keep().unwrap();
    let mut enc = Encoder::new(&path, "01020304", "exampl").unwrap();
    let data = vec![0xABu8; object_size];
    for _ in 0..object_count {
        enc.begin_object().unwrap();
        enc.write(&data).unwrap();
    }
    enc.complete().unwrap();
    path
}

fn bench_encode(c: &mut Criterion) {
    let data = vec![0xABu8; 64 * 1024];
    let mut group = c.benchmark_group("encode");
    group.throughput(Throughput::Bytes(data.len() as u64 * 64));
    group.bench_function("64_objects_64kib", |b| {
        b.iter(|| {
            let path = NamedTempFile::new().unwrap().into_temp_path().keep().unwrap();
            let mut enc = Encoder::new(&path, "01020304", "exampl").unwrap();
            for _ in 0..64 {
                enc.begin_object().unwrap();
                enc.write(black_box(&data)).unwrap();
            }
            enc.complete().unwrap();
            std::fs::remove_file(&path).ok();
        })
    });
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let path = build_archive(64 * 1024, 64);
    let mut group = c.benchmark_group("decode");
    group.throughput(Throughput::Bytes(64 * 1024 * 64));
    group.bench_function("read_full_64_objects", |b| {
        b.iter(|| {
            let mut dec = Decoder::open(&path).unwrap();
            for i in 0..dec.count() {
                black_box(dec.read_full(i).unwrap());
            }
        })
    });
    group.finish();
    std::fs::remove_file(&path).ok();
}

criterion_group!(benches, bench_encode, bench_decode);
criterion_main!(benches);
