//! # Closure Benchmarks
//!
//! Performance benchmarks for closure resolution and ingredient search.
//!
//! Run with: `cargo bench -p larder-core`

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use larder_core::{Catalog, ClosureResolver, RecipeId, catalog_from_bytes, catalog_to_bytes};
use std::hint::black_box;

/// A chain R0 -> R1 -> ... -> Rn, each recipe with one own ingredient.
fn create_chain_catalog(size: usize) -> Catalog {
    let mut catalog = Catalog::new();
    let mut prev = None;

    for i in 0..size {
        let recipe = catalog.insert_recipe(&format!("R{i}")).expect("insert");
        let ingredient = catalog.insert_ingredient(&format!("I{i}")).expect("insert");
        catalog
            .insert_recipe_ingredient(recipe, ingredient)
            .expect("link");
        if let Some(parent) = prev {
            catalog.insert_component(parent, recipe).expect("link");
        }
        prev = Some(recipe);
    }

    catalog
}

/// A binary tree of recipes; leaves share a small ingredient pool.
fn create_tree_catalog(size: usize) -> Catalog {
    let mut catalog = Catalog::new();
    let pool: Vec<_> = (0..8)
        .map(|i| catalog.insert_ingredient(&format!("P{i}")).expect("insert"))
        .collect();
    let recipes: Vec<RecipeId> = (0..size)
        .map(|i| catalog.insert_recipe(&format!("T{i}")).expect("insert"))
        .collect();

    for (i, &recipe) in recipes.iter().enumerate() {
        for child in [2 * i + 1, 2 * i + 2] {
            if let Some(&c) = recipes.get(child) {
                catalog.insert_component(recipe, c).expect("link");
            }
        }
        if 2 * i + 1 >= size {
            catalog
                .insert_recipe_ingredient(recipe, pool[i % pool.len()])
                .expect("link");
        }
    }

    catalog
}

fn bench_resolve_ingredients(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_ingredients");

    for size in [10, 100, 1000] {
        let chain = create_chain_catalog(size);
        group.bench_with_input(BenchmarkId::new("chain", size), &chain, |b, catalog| {
            b.iter(|| ClosureResolver::resolve_ingredients(catalog, black_box(RecipeId(1))));
        });

        let tree = create_tree_catalog(size);
        group.bench_with_input(BenchmarkId::new("tree", size), &tree, |b, catalog| {
            b.iter(|| ClosureResolver::resolve_ingredients(catalog, black_box(RecipeId(1))));
        });
    }

    group.finish();
}

fn bench_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("search_by_ingredient");

    for size in [10, 100, 1000] {
        let tree = create_tree_catalog(size);
        group.bench_with_input(BenchmarkId::new("tree", size), &tree, |b, catalog| {
            b.iter(|| ClosureResolver::search_by_ingredient(catalog, black_box("p3")));
        });
    }

    group.finish();
}

fn bench_snapshot_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("snapshot_decode");

    for size in [100, 1000] {
        let bytes = catalog_to_bytes(&create_tree_catalog(size)).expect("encode");
        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| catalog_from_bytes(black_box(bytes)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_resolve_ingredients,
    bench_search,
    bench_snapshot_decode
);
criterion_main!(benches);
