use criterion::{black_box, criterion_group, criterion_main, Criterion};

use fitcheck_core::bank::parse_bank_str;

fn bench_toml_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("toml_parsing");

    let reference_toml = include_str!("../banks/blockchain.toml");
    let medium_toml = generate_bank_toml(50);
    let large_toml = generate_bank_toml(500);

    group.bench_function("reference", |b| {
        b.iter(|| parse_bank_str(black_box(reference_toml), black_box("blockchain.toml".as_ref())))
    });

    group.bench_function("50_per_instrument", |b| {
        b.iter(|| parse_bank_str(black_box(&medium_toml), black_box("bench.toml".as_ref())))
    });

    group.bench_function("500_per_instrument", |b| {
        b.iter(|| parse_bank_str(black_box(&large_toml), black_box("bench.toml".as_ref())))
    });

    group.finish();
}

fn generate_bank_toml(n: usize) -> String {
    let mut s = String::new();
    s.push_str(
        r#"[bank]
id = "bench"
name = "Benchmark"
"#,
    );
    for i in 0..n {
        s.push_str(&format!(
            r#"
[[questions]]
id = "t_{i}"
instrument = "trait"
category = "interest"
prompt = "Statement {i}"

[[questions]]
id = "k_{i}"
instrument = "knowledge"
category = "programming"
prompt = "Question {i}"
options = ["a", "b", "c", "d"]
correct_index = {correct}
explanation = "Because {i}."

[[questions]]
id = "r_{i}"
instrument = "readiness"
category = "real_world"
prompt = "Readiness statement {i}"
"#,
            correct = i % 4
        ));
    }
    s
}

criterion_group!(benches, bench_toml_parsing);
criterion_main!(benches);
