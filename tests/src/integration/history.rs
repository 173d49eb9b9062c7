//! # History Traversal
//!
//! `GetAssetHistory` walks `historyTxIDs` in order. Entries whose event is
//! missing or does not decode are skipped; the rest are still returned.

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use pc_02_provenance::domain::{asset_key, event_key};
    use pc_02_provenance::prelude::*;
    use provenance_telemetry::metrics;

    async fn certified_asset(harness: &Harness, asset_id: &str) -> Vec<TxId> {
        let service = &harness.service;
        vec![
            service
                .create_material_certification(org1(), material_request(asset_id, Evidence::None))
                .await
                .unwrap(),
            service
                .create_print_job_completion(org1(), completion_request(asset_id, Evidence::None))
                .await
                .unwrap(),
            service
                .create_qa_certify(org1(), qa_request(asset_id, FIT_FOR_USE, Evidence::None))
                .await
                .unwrap(),
        ]
    }

    #[tokio::test]
    async fn test_history_matches_tx_ids() {
        let harness = Harness::default_config();
        let tx_ids = certified_asset(&harness, "A1").await;

        let history = harness.service.get_asset_history("A1").await.unwrap();
        assert_eq!(history.events.len(), tx_ids.len());
        assert!(matches!(
            history.events[0].details,
            EventDetails::MaterialCertification { .. }
        ));
        harness.stop().await;
    }

    #[tokio::test]
    async fn test_corrupt_event_is_skipped() {
        let harness = Harness::default_config();
        let tx_ids = certified_asset(&harness, "A1").await;
        let skipped_before = metrics::HISTORY_ENTRIES_SKIPPED.get();

        harness
            .store
            .insert_raw(event_key(&tx_ids[1]).unwrap(), b"{not json".to_vec())
            .unwrap();

        let history = harness.service.get_asset_history("A1").await.unwrap();
        let types: Vec<_> = history.events.iter().map(|e| e.event_type()).collect();
        assert_eq!(types, vec!["MATERIAL_CERTIFICATION", "QA_CERTIFICATION"]);
        assert!(metrics::HISTORY_ENTRIES_SKIPPED.get() >= skipped_before + 1.0);
        harness.stop().await;
    }

    #[tokio::test]
    async fn test_missing_event_is_skipped() {
        let harness = Harness::default_config();
        certified_asset(&harness, "A1").await;

        let mut asset = harness.service.read_asset("A1").await.unwrap();
        asset.history_tx_ids.insert(1, TxId::new("never-committed"));
        harness
            .store
            .insert_raw(asset_key("A1").unwrap(), serde_json::to_vec(&asset).unwrap())
            .unwrap();

        let history = harness.service.get_asset_history("A1").await.unwrap();
        assert_eq!(history.events.len(), 3);
        harness.stop().await;
    }

    #[tokio::test]
    async fn test_corrupt_asset_record_is_malformed() {
        let harness = Harness::default_config();
        certified_asset(&harness, "A1").await;
        harness
            .store
            .insert_raw(asset_key("A1").unwrap(), b"not json".to_vec())
            .unwrap();

        let result = harness.service.read_asset("A1").await;
        assert!(matches!(result, Err(ProvenanceError::MalformedRecord { .. })));
        let result = harness.service.get_asset_history("A1").await;
        assert!(matches!(result, Err(ProvenanceError::MalformedRecord { .. })));
        harness.stop().await;
    }

    #[tokio::test]
    async fn test_history_of_unknown_asset() {
        let harness = Harness::default_config();
        let result = harness.service.get_asset_history("nope").await;
        assert_eq!(
            result,
            Err(ProvenanceError::NotFound {
                asset_id: "nope".to_string()
            })
        );
        harness.stop().await;
    }
}
