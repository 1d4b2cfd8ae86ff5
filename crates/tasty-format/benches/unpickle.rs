use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use tasty_format::format::{ASTS_SECTION, UUID_LEN};
use tasty_format::{NameTag, RawSection, TastyReader, TastyVersion, TastyWriter, Unpickler};

/// A file with `count` packages, each with a class and a qualified path to it
fn build_file(count: u32) -> Vec<u8> {
    let mut writer = TastyWriter::new();
    writer.emit_header(TastyVersion::CURRENT, "bench", [0; UUID_LEN]);
    writer.emit_framed(|w| {
        w.emit_utf8_name(ASTS_SECTION);
        for i in 0..count {
            let base = 1 + i * 3;
            w.emit_utf8_name(&format!("pkg{}", i));
            w.emit_utf8_name(&format!("Class{}", i));
            w.emit_name_record(NameTag::Qualified, |w| {
                w.emit_nat(base);
                w.emit_nat(base + 1);
            });
        }
    });
    writer.emit_section(0, &[0u8; 4096]);
    writer.into_bytes()
}

fn bench_unpickle(c: &mut Criterion) {
    let mut group = c.benchmark_group("unpickle");

    for count in [10u32, 100, 1000] {
        let bytes = build_file(count);
        group.throughput(Throughput::Bytes(bytes.len() as u64));
        group.bench_with_input(BenchmarkId::new("names", count), &bytes, |b, bytes| {
            b.iter(|| Unpickler::new(black_box(bytes)).unwrap());
        });
    }

    group.finish();
}

fn bench_section_lookup(c: &mut Criterion) {
    let bytes = build_file(100);
    let unpickler = Unpickler::new(&bytes).unwrap();
    let plugin = RawSection::new(ASTS_SECTION);

    c.bench_function("lookup_asts", |b| {
        b.iter(|| unpickler.lookup(black_box(&plugin)).unwrap());
    });
}

fn bench_nats(c: &mut Criterion) {
    let mut writer = TastyWriter::new();
    for i in 0..10_000u64 {
        writer.emit_long_nat(i * 7919);
    }
    let bytes = writer.into_bytes();

    c.bench_function("read_nats", |b| {
        b.iter(|| {
            let mut reader = TastyReader::new(black_box(&bytes));
            let mut sum = 0u64;
            while !reader.is_at_end() {
                sum = sum.wrapping_add(reader.read_long_nat().unwrap());
            }
            sum
        });
    });
}

criterion_group!(benches, bench_unpickle, bench_section_lookup, bench_nats);
criterion_main!(benches);
