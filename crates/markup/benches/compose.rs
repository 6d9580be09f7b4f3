use criterion::{black_box, criterion_group, criterion_main, Criterion};
use markup::{close, Node, EMPTY};

fn build_list(items: usize) -> markup::Result<markup::Cursor> {
    let mut list = (EMPTY << Node::element("ul"))?;
    for i in 0..items {
        list = (list << Node::element("li") >> Node::text(format!("item {i}")) << close())?;
    }
    Ok(list)
}

fn bench_compose(c: &mut Criterion) {
    c.bench_function("compose 100 items", |b| {
        b.iter(|| build_list(black_box(100)))
    });

    let list = build_list(100).unwrap();
    c.bench_function("render 100 items", |b| b.iter(|| list.render_document()));
}

criterion_group!(benches, bench_compose);
criterion_main!(benches);
