use criterion::{black_box, criterion_group, criterion_main, Criterion};
use git_utils::date::{DateFormat, GitDate, Signature};
use git_utils::BStr;

fn date_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("date_parse");

    group.bench_function("parse_raw", |b| {
        b.iter(|| GitDate::parse_raw(black_box("1700000000 +0000")).unwrap())
    });

    group.bench_function("format_rfc2822", |b| {
        let date = GitDate::parse_raw("1700000000 +0200").unwrap();
        b.iter(|| date.format(black_box(DateFormat::Rfc2822)))
    });

    group.finish();
}

fn signature_parse(c: &mut Criterion) {
    let raw = BStr::new("Jane Doe <jane@example.com> 1700000000 +0200");

    let mut group = c.benchmark_group("signature");

    group.bench_function("parse", |b| {
        b.iter(|| Signature::parse(black_box(raw)).unwrap())
    });

    group.bench_function("to_bytes", |b| {
        let sig = Signature::parse(raw).unwrap();
        b.iter(|| black_box(&sig).to_bytes())
    });

    group.finish();
}

criterion_group!(benches, date_parse, signature_parse);
criterion_main!(benches);
