use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use binpak::codec::{PakReader, PakWriter};
use binpak::dataset::{Dataset, DatasetBuilder, DatasetName};
use binpak::session::{run_files, transform_dataset, ChannelSelection, SessionConfig};
use binpak::transform::GaussianFilter;
use tempfile::TempDir;

/// Build a single-row sine dataset with `nx` samples
fn sine_dataset(nx: usize) -> Dataset {
    let x: Vec<f64> = (0..nx).map(|i| i as f64 * 0.01).collect();
    let y: Vec<f64> = x.iter().map(|v| v.sin()).collect();
    DatasetBuilder::new(DatasetName::new("sine").unwrap())
        .x(x, false)
        .z(vec![0.0], false)
        .y_row(y, false)
        .build()
        .unwrap()
}

fn encode(dataset: &Dataset) -> Vec<u8> {
    let mut writer = PakWriter::new(Vec::new());
    writer.write_file_header(1).unwrap();
    writer.write_dataset_group_header(1).unwrap();
    writer.write_dataset(dataset).unwrap();
    writer.finish().unwrap()
}

/// Benchmark encoding and decoding one dataset of increasing length
fn bench_codec(c: &mut Criterion) {
    let mut group = c.benchmark_group("codec");

    for nx in [1_000, 100_000, 1_000_000] {
        let dataset = sine_dataset(nx);
        let bytes = encode(&dataset);
        group.throughput(Throughput::Bytes(bytes.len() as u64));

        group.bench_with_input(BenchmarkId::new("encode", nx), &dataset, |b, ds| {
            b.iter(|| encode(black_box(ds)))
        });

        group.bench_with_input(BenchmarkId::new("decode", nx), &bytes, |b, bytes| {
            b.iter(|| {
                let mut reader = PakReader::new(black_box(bytes.as_slice())).unwrap();
                reader.read_dataset_group_header().unwrap();
                reader.read_dataset().unwrap()
            })
        });
    }

    group.finish();
}

/// Benchmark the Gaussian rebuild of a dataset without any I/O
fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("transform");
    let config = SessionConfig::default().with_channels(ChannelSelection::y_only());

    for sigma in [1.0, 4.0, 16.0] {
        let dataset = sine_dataset(100_000);
        let filter = GaussianFilter::new(sigma);
        group.throughput(Throughput::Elements(100_000));

        group.bench_with_input(BenchmarkId::new("gaussian", sigma), &dataset, |b, ds| {
            b.iter(|| transform_dataset(black_box(ds), &filter, &config).unwrap())
        });
    }

    group.finish();
}

/// Benchmark a full file-to-file session
fn bench_session(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let input = temp_dir.path().join("input.pak52");
    let output = temp_dir.path().join("output.pak52");
    std::fs::write(&input, encode(&sine_dataset(250_000))).unwrap();

    let filter = GaussianFilter::new(2.0);
    c.bench_function("session/run_files", |b| {
        b.iter(|| run_files(&input, &output, &filter, SessionConfig::default()).unwrap())
    });
}

criterion_group!(benches, bench_codec, bench_transform, bench_session);
criterion_main!(benches);
