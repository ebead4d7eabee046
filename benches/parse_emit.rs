use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use situjson::{parse, Arena, Document, EmitOptions};

/// A records-style document of the given row count, compact JSON.
fn synthesize(rows: usize) -> String {
    let mut out = String::from(r#"{"generator":"bench","rows":["#);
    for i in 0..rows {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&format!(
            r#"{{"id":{i},"name":"row {i} é","score":{}.{:03},"flags":[true,false,null],"note":"escaped \"text\" with\nnewline"}}"#,
            i % 1000,
            (i * 37) % 1000,
        ));
    }
    out.push_str("]}");
    out
}

fn bench_parse(c: &mut Criterion) {
    let text = synthesize(500);
    let mut group = c.benchmark_group("parse");
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("fresh_arena", |b| {
        b.iter(|| {
            let mut buf = text.as_bytes().to_vec();
            buf.push(0);
            let mut arena = Arena::new();
            black_box(parse(&mut buf, &mut arena).unwrap());
        })
    });

    group.bench_function("recycled_arena", |b| {
        let mut arena = Arena::new();
        b.iter(|| {
            let mut buf = text.as_bytes().to_vec();
            buf.push(0);
            arena.reset();
            black_box(parse(&mut buf, &mut arena).unwrap());
        })
    });

    group.finish();
}

fn bench_emit(c: &mut Criterion) {
    let text = synthesize(500);
    let mut doc = Document::new();
    doc.parse_text(&text).unwrap();

    let mut group = c.benchmark_group("emit");
    group.throughput(Throughput::Bytes(text.len() as u64));

    group.bench_function("compact", |b| {
        let options = EmitOptions::new();
        b.iter(|| black_box(doc.dom().dump_to_vec(&options)))
    });

    group.bench_function("formatted", |b| {
        let options = EmitOptions::new().with_formatted(true);
        b.iter(|| black_box(doc.dom().dump_to_vec(&options)))
    });

    group.finish();
}

criterion_group!(benches, bench_parse, bench_emit);
criterion_main!(benches);
