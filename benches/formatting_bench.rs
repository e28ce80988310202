// benches/formatting_bench.rs
//! Benchmarks for property and block formatting.

use content_relay::formatting::{content_blocks, to_external_schema, FieldMap, FieldValue};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

/// A field map shaped like the pages the workflows create.
fn create_sample_fields(extra_fields: usize, text_len: usize) -> FieldMap {
    let mut fields = FieldMap::new();
    fields.insert("title".into(), "Quarterly planning notes".into());
    fields.insert("status".into(), "Generated".into());
    fields.insert("score".into(), FieldValue::Number(7.5));
    fields.insert("published".into(), true.into());
    fields.insert(
        "tags".into(),
        vec!["planning", "q3", "roadmap"].into(),
    );

    for i in 0..extra_fields {
        let text = "lorem ipsum ".repeat(text_len / 12 + 1);
        fields.insert(format!("field_{}", i), text.into());
    }
    fields
}

fn create_sample_content(sections: usize) -> String {
    let mut content = String::new();
    for i in 0..sections {
        content.push_str(&format!("## Section {}\n\n", i));
        content.push_str("A paragraph describing the section in a sentence or two.\n");
        content.push_str("It continues on a second line.\n\n");
        content.push_str("- first point\n- second point\n1. ordered step\n\n");
    }
    content
}

fn bench_property_formatting(c: &mut Criterion) {
    let mut group = c.benchmark_group("properties");

    let configs = vec![(5, 100, "small"), (50, 500, "medium"), (200, 5000, "long_text")];

    for (extra_fields, text_len, name) in configs {
        let fields = create_sample_fields(extra_fields, text_len);
        group.bench_with_input(
            BenchmarkId::new("to_external_schema", name),
            &fields,
            |b, fields| b.iter(|| to_external_schema(black_box(fields))),
        );
    }

    group.finish();
}

fn bench_content_blocks(c: &mut Criterion) {
    let mut group = c.benchmark_group("blocks");

    for sections in [10, 100, 1000] {
        let content = create_sample_content(sections);
        group.bench_with_input(
            BenchmarkId::new("content_blocks", sections),
            &content,
            |b, content| b.iter(|| content_blocks(black_box(content))),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_property_formatting, bench_content_blocks);
criterion_main!(benches);
