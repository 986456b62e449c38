//! Criterion benchmarks for the template-compat-core pipeline.
//!
//! Trees are built outside the benchmark loop and cloned per iteration, so
//! only the passes are measured.

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use serde_json::{json, Value};

use template_compat_core::{check_file, CheckOptions, TemplateFile};

fn loc(line: u32) -> Value {
    json!({
        "file_path": "bench.tmpl",
        "begin": { "line": line, "column": 1 },
        "end": { "line": line, "column": 8 }
    })
}

/// One template per index, each with a let, a loop holding a call and a
/// comprehension, and a ve() print.
fn synthetic_file(templates: u32) -> TemplateFile {
    let templates: Vec<Value> = (0..templates)
        .map(|t| {
            let line = t * 10;
            json!({
                "id": t * 10,
                "name": { "identifier": format!("t{t}"), "location": loc(line) },
                "params": [{ "name": { "identifier": "items", "location": loc(line) } }],
                "children": [
                    {
                        "kind": "let",
                        "id": t * 10 + 1,
                        "var": { "original_name": if t % 7 == 0 { "x" } else { "$x" }, "name_location": loc(line + 1) },
                        "value": { "expr": { "kind": "var_ref", "name": "$items", "location": loc(line + 1) } }
                    },
                    {
                        "kind": "for",
                        "id": t * 10 + 2,
                        "iterable": { "kind": "var_ref", "name": "$x", "location": loc(line + 2) },
                        "nonempty": {
                            "var": { "original_name": "$item", "name_location": loc(line + 2) },
                            "children": [
                                {
                                    "kind": "call",
                                    "id": t * 10 + 3,
                                    "open_tag_location": loc(line + 3),
                                    "callee": { "kind": "var_ref", "name": format!("ns.t{}", t + 1), "location": loc(line + 3) },
                                    "data": "all"
                                },
                                {
                                    "kind": "print",
                                    "id": t * 10 + 4,
                                    "expr": {
                                        "kind": "list_comprehension",
                                        "list_iter_var": { "original_name": "$c", "name_location": loc(line + 4) },
                                        "list_expr": { "kind": "var_ref", "name": "$item", "location": loc(line + 4) },
                                        "item_map": { "kind": "var_ref", "name": "GLOBAL", "location": loc(line + 4) },
                                        "location": loc(line + 4)
                                    }
                                }
                            ]
                        }
                    },
                    {
                        "kind": "print",
                        "id": t * 10 + 5,
                        "expr": { "kind": "ve_literal", "name": { "identifier": "Banner", "location": loc(line + 5) }, "location": loc(line + 5) }
                    }
                ]
            })
        })
        .collect();

    serde_json::from_value(json!({
        "file_path": "bench.tmpl",
        "namespace": "ns",
        "templates": templates
    }))
    .expect("synthetic tree should deserialize")
}

fn bench_check_small(c: &mut Criterion) {
    let file = synthetic_file(10);
    let options = CheckOptions::default();

    c.bench_function("check_file/small", |b| {
        b.iter_batched(
            || file.clone(),
            |mut f| check_file(black_box(&mut f), black_box(&options)).unwrap(),
            BatchSize::SmallInput,
        )
    });
}

fn bench_check_large(c: &mut Criterion) {
    let file = synthetic_file(1_000);
    let options = CheckOptions::default();

    c.bench_function("check_file/large", |b| {
        b.iter_batched(
            || file.clone(),
            |mut f| check_file(black_box(&mut f), black_box(&options)).unwrap(),
            BatchSize::LargeInput,
        )
    });
}

criterion_group!(benches, bench_check_small, bench_check_large);
criterion_main!(benches);
