//! # Concurrency
//!
//! Submitters racing on the ledger. Each operation reads and writes one
//! asset key, so:
//!
//! - Same asset, same block or back to back: exactly one commits, the other
//!   sees `ConflictAborted` and can retry against fresh state
//! - Different assets: never conflict

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use pc_01_ledger::LedgerConfig;
    use pc_02_provenance::prelude::*;
    use std::sync::Arc;
    use tokio::task::JoinSet;

    #[tokio::test]
    async fn test_same_asset_race_one_conflict() {
        let harness = Harness::default_config();
        let service = &harness.service;
        service
            .create_material_certification(org1(), material_request("A1", Evidence::None))
            .await
            .unwrap();

        let (first, second) = tokio::join!(
            service.create_print_job_completion(org1(), completion_request("A1", Evidence::None)),
            service.create_qa_certify(org2(), qa_request("A1", FIT_FOR_USE, Evidence::None)),
        );

        let ok = [first.is_ok(), second.is_ok()];
        assert_eq!(ok.iter().filter(|ok| **ok).count(), 1);
        let err = first.err().or(second.err()).unwrap();
        assert!(matches!(err, ProvenanceError::ConflictAborted { .. }));
        assert!(err.is_retriable());

        let asset = service.read_asset("A1").await.unwrap();
        assert_eq!(asset.history_tx_ids.len(), 2);
        assert_eq!(service.stats().await.conflicts, 1);
        harness.stop().await;
    }

    #[tokio::test]
    async fn test_conflict_retry_succeeds() {
        let harness = Harness::default_config();
        let service = &harness.service;
        service
            .create_material_certification(org1(), material_request("A1", Evidence::None))
            .await
            .unwrap();

        let (first, second) = tokio::join!(
            service.create_print_job_completion(org1(), completion_request("A1", Evidence::None)),
            service.create_print_job_completion(org2(), completion_request("A1", Evidence::None)),
        );
        assert!(first.is_ok() ^ second.is_ok());

        // Resubmitting re-simulates against the committed state.
        service
            .create_qa_certify(org1(), qa_request("A1", FIT_FOR_USE, Evidence::None))
            .await
            .unwrap();
        let asset = service.read_asset("A1").await.unwrap();
        assert_eq!(asset.history_tx_ids.len(), 3);
        assert_eq!(asset.current_lifecycle_stage, LifecycleStage::Certified);
        harness.stop().await;
    }

    #[tokio::test]
    async fn test_concurrent_creation_of_same_asset() {
        let harness = Harness::default_config();
        let service = &harness.service;

        let (first, second) = tokio::join!(
            service.create_material_certification(org1(), material_request("A1", Evidence::None)),
            service.create_print_job_start(org2(), print_start_request("A1", Evidence::None)),
        );
        assert!(first.is_ok() ^ second.is_ok());
        let err = first.err().or(second.err()).unwrap();
        assert!(matches!(err, ProvenanceError::ConflictAborted { .. }));

        let asset = service.read_asset("A1").await.unwrap();
        assert_eq!(asset.history_tx_ids.len(), 1);
        harness.stop().await;
    }

    #[tokio::test]
    async fn test_different_assets_never_conflict() {
        let mut config = LedgerConfig::for_testing();
        config.batch.max_message_count = 4;
        let harness = Harness::start(config, ContractConfig::default());

        let mut tasks = JoinSet::new();
        for i in 0..16 {
            let service = Arc::clone(&harness.service);
            tasks.spawn(async move {
                let asset_id = format!("PART-{:03}", i);
                service
                    .create_material_certification(org1(), material_request(&asset_id, Evidence::None))
                    .await
            });
        }

        let mut committed = 0;
        while let Some(joined) = tasks.join_next().await {
            joined.unwrap().unwrap();
            committed += 1;
        }
        assert_eq!(committed, 16);

        let ledger_stats = harness.ledger.stats();
        assert_eq!(ledger_stats.committed, 16);
        assert_eq!(ledger_stats.invalidated, 0);
        assert!(ledger_stats.blocks >= 4);
        harness.stop().await;
    }
}
