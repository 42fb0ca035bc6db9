// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Proteus-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Proteus and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use proteus::search::{apply_filtered_edit, filter_lines};

// Benchmark identity (keep stable):
// - Group names in this file: `search.filter_lines`, `search.apply_filtered_edit`
// - Case IDs must remain stable across refactors so results stay comparable over time.
fn buffer_with_lines(lines: usize) -> String {
    let mut buffer = String::from("{\n");
    for index in 0..lines {
        let key = if index % 7 == 0 { "screen_name" } else { "field" };
        buffer.push_str(&format!("  \"{key}_{index}\": \"value {index}\",\n"));
    }
    buffer.push('}');
    buffer
}

fn benches_filter(c: &mut Criterion) {
    {
        let mut group = c.benchmark_group("search.filter_lines");

        for (case_id, lines, term) in [
            ("small_sparse", 200usize, "screen_name"),
            ("large_sparse", 20_000, "screen_name"),
            ("large_dense", 20_000, "value"),
        ] {
            let buffer = buffer_with_lines(lines);
            group.throughput(Throughput::Elements(lines as u64));
            group.bench_function(case_id, |b| {
                b.iter(|| black_box(filter_lines(black_box(&buffer), black_box(term))))
            });
        }

        group.finish();
    }

    {
        let mut group = c.benchmark_group("search.apply_filtered_edit");

        let buffer = buffer_with_lines(20_000);
        let view = filter_lines(&buffer, "screen_name");
        let edited = view.display.to_uppercase();
        group.throughput(Throughput::Elements(20_000));
        group.bench_function("large_sparse", |b| {
            b.iter(|| {
                black_box(apply_filtered_edit(
                    black_box(&edited),
                    black_box(&buffer),
                    view.line_indices.as_deref(),
                ))
            })
        });

        group.finish();
    }
}

criterion_group!(benches, benches_filter);
criterion_main!(benches);
