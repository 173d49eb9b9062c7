//! # Payload Strategies
//!
//! Lightweight records carry a digest of off-chain evidence; naive records
//! embed the evidence. Both share schema and transitions, but naive
//! envelopes fill the ordering layer's byte budget and travel in smaller
//! blocks.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use pc_01_ledger::LedgerConfig;
    use pc_02_provenance::prelude::*;
    use std::sync::Arc;
    use tokio::task::JoinSet;

    const EVIDENCE_BYTES: usize = 8 * 1024;

    fn batch_limited() -> LedgerConfig {
        let mut config = LedgerConfig::for_testing();
        config.batch.max_message_count = 8;
        config.batch.preferred_max_bytes = 16 * 1024;
        config.batch.batch_timeout_ms = 200;
        config
    }

    async fn certify_in_parallel(harness: &Harness, strategy: PayloadStrategy, count: usize) {
        let content = vec![0x5Au8; EVIDENCE_BYTES];
        let mut tasks = JoinSet::new();
        for i in 0..count {
            let service = Arc::clone(&harness.service);
            let request = material_request(&format!("LOT-{}", i), evidence(strategy, &content));
            tasks.spawn(async move { service.create_material_certification(org1(), request).await });
        }
        while let Some(joined) = tasks.join_next().await {
            joined.unwrap().unwrap();
        }
    }

    #[tokio::test]
    async fn test_naive_payload_embedded_on_chain() {
        let harness = Harness::start(LedgerConfig::for_testing(), ContractConfig::naive());
        let content = b"full tensile test report".to_vec();
        let tx_id = harness
            .service
            .create_material_certification(
                org1(),
                material_request("A1", evidence(PayloadStrategy::Naive, &content)),
            )
            .await
            .unwrap();

        let history = harness.service.get_asset_history("A1").await.unwrap();
        assert_eq!(
            history.events[0].evidence,
            Evidence::OnChain(OnChainPayload::new(content.clone()))
        );
        assert_eq!(
            history.events[0].evidence.content_hash(),
            Some(ContentHash::of(&content))
        );

        let raw = serde_json::to_value(&history.events[0]).unwrap();
        assert!(raw.get("onChainDataPayload").is_some());
        assert!(raw.get("offChainDataHash").is_none());
        assert_eq!(harness.service.read_asset("A1").await.unwrap().history_tx_ids, vec![tx_id]);
        harness.stop().await;
    }

    #[tokio::test]
    async fn test_lightweight_payload_stores_digest() {
        let harness = Harness::default_config();
        let content = vec![7u8; EVIDENCE_BYTES];
        harness
            .service
            .create_material_certification(
                org1(),
                material_request("A1", evidence(PayloadStrategy::Lightweight, &content)),
            )
            .await
            .unwrap();

        let history = harness.service.get_asset_history("A1").await.unwrap();
        let raw = serde_json::to_value(&history.events[0]).unwrap();
        assert_eq!(
            raw["offChainDataHash"],
            serde_json::json!(ContentHash::of(&content).to_hex())
        );
        assert!(raw.get("onChainDataPayload").is_none());
        harness.stop().await;
    }

    #[tokio::test]
    async fn test_naive_payloads_need_more_blocks() {
        let light = Harness::start(batch_limited(), ContractConfig::default());
        certify_in_parallel(&light, PayloadStrategy::Lightweight, 8).await;
        let light_blocks = light.ledger.height().unwrap();
        light.stop().await;

        let naive = Harness::start(batch_limited(), ContractConfig::naive());
        certify_in_parallel(&naive, PayloadStrategy::Naive, 8).await;
        let naive_blocks = naive.ledger.height().unwrap();
        naive.stop().await;

        assert_eq!(light_blocks, 1);
        assert_eq!(naive_blocks, 8);
    }

    #[tokio::test]
    async fn test_envelope_above_absolute_max_is_refused() {
        let mut config = LedgerConfig::for_testing();
        config.batch.absolute_max_bytes = 4 * 1024;
        config.batch.preferred_max_bytes = 2 * 1024;
        let harness = Harness::start(config, ContractConfig::naive());

        let result = harness
            .service
            .create_material_certification(
                org1(),
                material_request("A1", evidence(PayloadStrategy::Naive, &[1u8; EVIDENCE_BYTES])),
            )
            .await;
        assert!(matches!(
            result,
            Err(ProvenanceError::Ledger(pc_01_ledger::LedgerError::EnvelopeTooLarge { .. }))
        ));
        assert!(!harness.service.asset_exists("A1").await.unwrap());
        harness.stop().await;
    }
}
