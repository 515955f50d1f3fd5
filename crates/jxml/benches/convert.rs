use criterion::{black_box, criterion_group, criterion_main, Criterion};

use jxml::{convert, json_to_xml, xml_to_json, Format};

const XML_INPUT: &str = r#"<catalog version="2"><book id="b1"><title>Rust in Action</title><author>Tim McNamara</author></book><book id="b2"><title>Programming Rust</title><author>Jim Blandy</author><author>Jason Orendorff</author></book></catalog>"#;
const JSON_INPUT: &str = r#"{"catalog":{"_version":"2","book":[{"_id":"b1","title":{"__text":"Rust in Action"},"author":{"__text":"Tim McNamara"}},{"_id":"b2","title":{"__text":"Programming Rust"},"author":[{"__text":"Jim Blandy"},{"__text":"Jason Orendorff"}]}]}}"#;

fn wide_xml(items: usize) -> String {
    let mut out = String::from("<root>");
    for i in 0..items {
        out.push_str(&format!(r#"<item id="{i}"><name>item {i}</name><tag>a</tag><tag>b</tag></item>"#));
    }
    out.push_str("</root>");
    out
}

fn bench_xml_to_json(c: &mut Criterion) {
    c.bench_function("convert_xml_json", |b| {
        b.iter(|| convert(Some(black_box(XML_INPUT)), Format::Xml, Format::Json))
    });
}

fn bench_json_to_xml(c: &mut Criterion) {
    c.bench_function("convert_json_xml", |b| {
        b.iter(|| convert(Some(black_box(JSON_INPUT)), Format::Json, Format::Xml))
    });
}

fn bench_wide_document(c: &mut Criterion) {
    let xml = wide_xml(1_000);
    c.bench_function("convert_wide_xml_json", |b| {
        b.iter(|| xml_to_json(black_box(&xml)))
    });

    if let Ok(json) = xml_to_json(&xml) {
        c.bench_function("convert_wide_json_xml", |b| {
            b.iter(|| json_to_xml(black_box(&json)))
        });
    }
}

criterion_group!(
    benches,
    bench_xml_to_json,
    bench_json_to_xml,
    bench_wide_document
);
criterion_main!(benches);
