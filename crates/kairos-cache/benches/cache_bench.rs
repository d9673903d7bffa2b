use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};

use kairos_cache::ContentCache;
use kairos_core::config::CacheConfig;
use test_fixtures::ScriptedFetcher;

fn bench_cache_hit(c: &mut Criterion) {
    let cache = ContentCache::new(Arc::new(ScriptedFetcher::new()), &CacheConfig::default());
    cache.get_or_fetch("pubmed", "panic attacks", 10).unwrap();

    c.bench_function("content_cache_hit", |b| {
        b.iter(|| cache.get_or_fetch("pubmed", "Panic  Attacks", 10).unwrap())
    });
}

fn bench_cache_churn(c: &mut Criterion) {
    let config = CacheConfig {
        capacity_weight: 300,
        ..Default::default()
    };
    let cache = ContentCache::new(Arc::new(ScriptedFetcher::new()), &config);
    let queries: Vec<String> = (0..500).map(|i| format!("query {i}")).collect();

    c.bench_function("content_cache_churn_500", |b| {
        b.iter(|| {
            for q in &queries {
                cache.get_or_fetch("pubmed", q, 10).unwrap();
            }
        })
    });
}

criterion_group!(benches, bench_cache_hit, bench_cache_churn);
criterion_main!(benches);
