use criterion::{black_box, criterion_group, criterion_main, Criterion};
use item_api::{feature::item::item_repository::NewItem, infra::validation::Valid};

fn validate_benchmark(c: &mut Criterion) {
    c.bench_function("validate_new_item", |b| {
        b.iter(|| {
            Valid::new(black_box(NewItem {
                title: "My item".to_string(),
                description: Some("A very interesting item".to_string()),
            }))
        })
    });
}

criterion_group!(benches, validate_benchmark);
criterion_main!(benches);
