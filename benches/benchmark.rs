use criterion::{black_box, criterion_group, criterion_main, Criterion};
use jset::{Document, PathAccessor};
use std::collections::HashMap;

const PATHS: [&str; 4] = [
    "a.b.c.d.e",
    "users[2].profile.tags[0][1]",
    "features[0].geometry.coordinates[0][3][2]",
    "matrix[63][63]",
];

fn tokenize(c: &mut Criterion) {
    for path in PATHS {
        c.bench_function(&format!("tokenize {path}"), |b| {
            b.iter(|| PathAccessor::new(black_box(path)))
        });
    }
}

fn apply_fresh(c: &mut Criterion) {
    for path in PATHS {
        let accessor = PathAccessor::new(path);

        c.bench_function(&format!("apply to empty root {path}"), |b| {
            b.iter(|| {
                let mut root = Document::Object(HashMap::new());
                accessor
                    .apply(&mut root, black_box(Document::Bool(true)))
                    .unwrap();
                root
            })
        });
    }
}

fn apply_existing(c: &mut Criterion) {
    for path in PATHS {
        let accessor = PathAccessor::new(path);
        let mut root = Document::Object(HashMap::new());
        accessor.apply(&mut root, Document::Bool(false)).unwrap();

        c.bench_function(&format!("apply to existing root {path}"), |b| {
            b.iter(|| {
                accessor
                    .apply(&mut root, black_box(Document::Bool(true)))
                    .unwrap()
            })
        });
    }
}

criterion_group!(benches, tokenize, apply_fresh, apply_existing);
criterion_main!(benches);
