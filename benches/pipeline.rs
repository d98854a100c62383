use criterion::{Criterion, criterion_group, criterion_main};
use std::fmt::Write;
use std::hint::black_box;
use mathly::{Engine, SymbolicEngine, Tutor, normalize, parse};

// ==============================================================================
// Query Pipeline Benchmarks
// ==============================================================================

const QUERIES: [(&str, &str); 8] = [
    ("legacy_quadratic", "solve x^2 - 5x + 6 = 0"),
    ("linear_equation", "solve the equation 3x + 7 = 22"),
    ("derivative", "differentiate 3x^3 - 2x^2 + sin(x)"),
    ("integral", "integrate 4x^3 + cos(x)"),
    ("limit_lhopital", "limit of sin(x)/x as x approaches 0"),
    ("factor", "factor x^3 - 6x^2 + 11x - 6"),
    ("expand", "expand (x + 1)(x - 2)(x + 3)"),
    ("calculation", "what is 12 divided by 4 plus sqrt(16)"),
];

fn bench_queries(c: &mut Criterion) {
    let mut group = c.benchmark_group("solve_query");
    let tutor = Tutor::new();

    for (name, query) in QUERIES {
        group.bench_function(name, |b| b.iter(|| tutor.solve(black_box(query))));
    }

    group.finish();
}

fn bench_front_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("front_end");
    let tutor = Tutor::new();

    group.bench_function("classify_all", |b| {
        b.iter(|| {
            for (_, query) in QUERIES {
                black_box(tutor.classify(black_box(query)));
            }
        })
    });

    group.bench_function("normalize", |b| {
        b.iter(|| normalize(black_box("3x^2 + 2x² - 4x^3 + 12x")))
    });

    group.finish();
}

// ==============================================================================
// Engine Benchmarks
// ==============================================================================

/// Polynomial with `n` terms: `1*x^1 + 2*x^2 + ...`
fn generate_polynomial(n: usize) -> String {
    let mut s = String::with_capacity(n * 10);
    for i in 1..=n {
        if i > 1 {
            s.push_str(" + ");
        }
        let _ = write!(s, "{}*x^{}", i, i);
    }
    s
}

fn bench_engine(c: &mut Criterion) {
    let mut group = c.benchmark_group("engine");
    let engine = Engine::new();

    let poly = parse("x^3 + 2*x^2 + x").expect("benchmark input parses");
    let trig = parse("sin(x) * cos(x)").expect("benchmark input parses");
    let large = generate_polynomial(50);

    group.bench_function("parse_large_polynomial", |b| {
        b.iter(|| parse(black_box(&large)))
    });
    group.bench_function("diff_poly", |b| {
        b.iter(|| engine.differentiate(black_box(&poly), "x"))
    });
    group.bench_function("diff_trig", |b| {
        b.iter(|| engine.differentiate(black_box(&trig), "x"))
    });
    group.bench_function("factor_poly", |b| b.iter(|| engine.factor(black_box(&poly))));

    group.finish();
}

criterion_group!(benches, bench_queries, bench_front_end, bench_engine);
criterion_main!(benches);
