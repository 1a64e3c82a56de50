use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use trickle_tests::{inflate_pull, inflate_push, noise, text, zlib};

fn bench_push_chunk_sizes(c: &mut Criterion) {
    let data = text(256 * 1024);
    let compressed = zlib(&data);

    let mut group = c.benchmark_group("push_chunk_size");
    group.throughput(Throughput::Bytes(data.len() as u64));
    for chunk in [64, 1024, 4096, compressed.len()] {
        group.bench_with_input(BenchmarkId::from_parameter(chunk), &chunk, |b, &chunk| {
            b.iter(|| inflate_push(&compressed, data.len(), chunk).unwrap());
        });
    }
    group.finish();
}

fn bench_pull_read_sizes(c: &mut Criterion) {
    let data = text(256 * 1024);
    let compressed = zlib(&data);

    let mut group = c.benchmark_group("pull_read_size");
    group.throughput(Throughput::Bytes(data.len() as u64));
    for read in [1, 256, 4096, 65_536] {
        group.bench_with_input(BenchmarkId::from_parameter(read), &read, |b, &read| {
            b.iter(|| inflate_pull(&compressed, data.len(), 4096, read).unwrap());
        });
    }
    group.finish();
}

fn bench_payload_kind(c: &mut Criterion) {
    let text_data = text(128 * 1024);
    let noise_data = noise(128 * 1024);
    let text_z = zlib(&text_data);
    let noise_z = zlib(&noise_data);

    let mut group = c.benchmark_group("payload_kind");
    group.throughput(Throughput::Bytes(text_data.len() as u64));
    group.bench_function("text", |b| {
        b.iter(|| inflate_push(&text_z, text_data.len(), 4096).unwrap());
    });
    group.bench_function("noise", |b| {
        b.iter(|| inflate_push(&noise_z, noise_data.len(), 4096).unwrap());
    });
    group.finish();
}

criterion_group!(benches, bench_push_chunk_sizes, bench_pull_read_sizes, bench_payload_kind);
criterion_main!(benches);
