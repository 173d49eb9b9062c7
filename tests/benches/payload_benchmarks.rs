//! # Payload Strategy Benchmarks
//!
//! Commit throughput of lightweight (digest) versus naive (embedded)
//! evidence under the same ordering limits.
//!
//! | Group | Measures |
//! |-------|----------|
//! | `event-encoding` | JSON encoding of one event per strategy and size |
//! | `commit-throughput` | 16 concurrent creations through the ledger |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;
use tokio::task::JoinSet;

use pc_01_ledger::LedgerConfig;
use pc_02_provenance::prelude::*;
use pc_tests::fixtures::{evidence, material_request, org1, Harness};

const EVIDENCE_SIZES: [usize; 3] = [1024, 16 * 1024, 64 * 1024];
const STRATEGIES: [(PayloadStrategy, &str); 2] = [
    (PayloadStrategy::Lightweight, "lightweight"),
    (PayloadStrategy::Naive, "naive"),
];
const CONCURRENT_TXS: usize = 16;

fn bench_event_encoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("event-encoding");

    for size in EVIDENCE_SIZES {
        let content = vec![0xA5u8; size];
        for (strategy, label) in STRATEGIES {
            let event = ProvenanceEvent {
                details: EventDetails::MaterialCertification {
                    material_type: "Ti-6Al-4V".to_string(),
                    material_batch_id: "BATCH-1".to_string(),
                    supplier_id: "SUP-1".to_string(),
                },
                agent_id: "Org1MSP".to_string(),
                timestamp: chrono::Utc::now(),
                evidence: evidence(strategy, &content),
            };
            group.throughput(Throughput::Bytes(size as u64));
            group.bench_with_input(BenchmarkId::new(label, size), &event, |b, event| {
                b.iter(|| black_box(serde_json::to_vec(event).map(|v| v.len())))
            });
        }
    }

    group.finish();
}

fn bench_commit_throughput(c: &mut Criterion) {
    let rt = Runtime::new().expect("tokio runtime");
    let mut group = c.benchmark_group("commit-throughput");
    group.sample_size(10);
    group.measurement_time(Duration::from_secs(10));
    group.throughput(Throughput::Elements(CONCURRENT_TXS as u64));

    for size in EVIDENCE_SIZES {
        let content = vec![0xA5u8; size];
        for (strategy, label) in STRATEGIES {
            let harness = rt.block_on(async {
                let mut config = LedgerConfig::for_testing();
                config.batch.max_message_count = CONCURRENT_TXS;
                config.batch.preferred_max_bytes = 64 * 1024;
                config.batch.batch_timeout_ms = 5;
                let contract = ContractConfig {
                    payload_strategy: strategy,
                    ..ContractConfig::default()
                };
                Harness::start(config, contract)
            });
            let next_id = AtomicUsize::new(0);

            group.bench_function(BenchmarkId::new(label, size), |b| {
                b.iter(|| {
                    rt.block_on(async {
                        let mut tasks = JoinSet::new();
                        for _ in 0..CONCURRENT_TXS {
                            let id = next_id.fetch_add(1, Ordering::Relaxed);
                            let service = Arc::clone(&harness.service);
                            let asset_id = format!("LOT-{}", id);
                            let request = material_request(&asset_id, evidence(strategy, &content));
                            tasks.spawn(async move {
                                service.create_material_certification(org1(), request).await
                            });
                        }
                        while let Some(joined) = tasks.join_next().await {
                            let _ = black_box(joined);
                        }
                    })
                })
            });

            rt.block_on(harness.stop());
        }
    }

    group.finish();
}

criterion_group!(benches, bench_event_encoding, bench_commit_throughput);
criterion_main!(benches);
