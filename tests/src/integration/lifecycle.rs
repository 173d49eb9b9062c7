//! # Lifecycle Flows
//!
//! Full asset lifecycles committed through the ledger:
//!
//! 1. **A1**: material certified, printed, inspected, certified fit for use
//! 2. **A2**: same path, rejected at QA
//! 3. Create and update guards: double creation, update before creation
//! 4. Strict sequence policy
//! 5. No update re-enters the initial stage, under either policy

#[cfg(test)]
mod tests {
    use crate::fixtures::*;
    use pc_01_ledger::LedgerConfig;
    use pc_02_provenance::prelude::*;

    async fn run_to_qa(harness: &Harness, asset_id: &str, result: &str) -> Vec<TxId> {
        let service = &harness.service;
        let e = |label: &str| evidence(PayloadStrategy::Lightweight, label.as_bytes());
        vec![
            service
                .create_print_job_start(org1(), print_start_request(asset_id, e("build-log")))
                .await
                .unwrap(),
            service
                .create_print_job_completion(org1(), completion_request(asset_id, e("ct-scan")))
                .await
                .unwrap(),
            service
                .create_qa_certify(org2(), qa_request(asset_id, result, e("tensile-report")))
                .await
                .unwrap(),
        ]
    }

    #[tokio::test]
    async fn test_asset_certified_fit_for_use() {
        let harness = Harness::default_config();
        let tx_ids = run_to_qa(&harness, "A1", FIT_FOR_USE).await;

        let asset = harness.service.read_asset("A1").await.unwrap();
        assert_eq!(asset.current_lifecycle_stage, LifecycleStage::Certified);
        assert_eq!(asset.owner, "Org1MSP");
        assert_eq!(asset.history_tx_ids, tx_ids);

        let history = harness.service.get_asset_history("A1").await.unwrap();
        let types: Vec<_> = history.events.iter().map(|e| e.event_type()).collect();
        assert_eq!(
            types,
            vec!["PRINT_JOB_START", "PRINT_JOB_COMPLETION", "QA_CERTIFICATION"]
        );
        assert_eq!(history.events[2].agent_id, "Org2MSP");
        assert!(history
            .events
            .windows(2)
            .all(|pair| pair[0].timestamp <= pair[1].timestamp));
        harness.stop().await;
    }

    #[tokio::test]
    async fn test_asset_rejected_at_qa() {
        let harness = Harness::default_config();
        run_to_qa(&harness, "A2", "FAILED_POROSITY").await;

        let asset = harness.service.read_asset("A2").await.unwrap();
        assert_eq!(asset.current_lifecycle_stage, LifecycleStage::Rejected);
        assert_eq!(asset.history_tx_ids.len(), 3);
        harness.stop().await;
    }

    #[tokio::test]
    async fn test_material_certification_then_annotation() {
        let harness = Harness::default_config();
        let service = &harness.service;
        service
            .create_material_certification(org1(), material_request("A3", Evidence::None))
            .await
            .unwrap();
        service
            .add_history_event(
                org1(),
                AddHistoryEventRequest {
                    asset_id: "A3".to_string(),
                    event_type: "IN_PRODUCTION".to_string(),
                    evidence: Evidence::None,
                },
            )
            .await
            .unwrap();

        let asset = service.read_asset("A3").await.unwrap();
        assert_eq!(asset.current_lifecycle_stage, LifecycleStage::InProduction);
        let history = service.get_asset_history("A3").await.unwrap();
        assert_eq!(
            history.events[1].details,
            EventDetails::StageAnnotation {
                target_stage: LifecycleStage::InProduction
            }
        );
        harness.stop().await;
    }

    #[tokio::test]
    async fn test_double_creation_fails_without_writes() {
        let harness = Harness::default_config();
        let service = &harness.service;
        service
            .create_material_certification(org1(), material_request("A1", Evidence::None))
            .await
            .unwrap();
        let height = harness.ledger.height().unwrap();

        let result = service
            .create_print_job_start(org1(), print_start_request("A1", Evidence::None))
            .await;
        assert_eq!(
            result,
            Err(ProvenanceError::AlreadyExists {
                asset_id: "A1".to_string()
            })
        );
        assert_eq!(harness.ledger.height().unwrap(), height);
        assert_eq!(service.read_asset("A1").await.unwrap().history_tx_ids.len(), 1);
        harness.stop().await;
    }

    #[tokio::test]
    async fn test_update_before_creation_is_not_found() {
        let harness = Harness::default_config();
        let result = harness
            .service
            .create_print_job_completion(org1(), completion_request("ghost", Evidence::None))
            .await;
        assert!(matches!(result, Err(ProvenanceError::NotFound { .. })));
        assert!(!harness.service.asset_exists("ghost").await.unwrap());
        assert_eq!(harness.ledger.height().unwrap(), 0);
        harness.stop().await;
    }

    #[tokio::test]
    async fn test_strict_policy_enforces_sequence() {
        let config = ContractConfig {
            sequence_policy: SequencePolicy::Strict,
            ..ContractConfig::default()
        };
        let harness = Harness::start(LedgerConfig::for_testing(), config);
        let service = &harness.service;
        service
            .create_material_certification(org1(), material_request("A1", Evidence::None))
            .await
            .unwrap();

        let skipped = service
            .create_qa_certify(org1(), qa_request("A1", FIT_FOR_USE, Evidence::None))
            .await;
        assert_eq!(
            skipped,
            Err(ProvenanceError::InvalidTransition {
                from: LifecycleStage::MaterialCertified,
                to: LifecycleStage::Certified,
            })
        );

        run_to_qa_from_material(&harness, "A1").await;
        let asset = service.read_asset("A1").await.unwrap();
        assert_eq!(asset.current_lifecycle_stage, LifecycleStage::Certified);
        assert_eq!(asset.history_tx_ids.len(), 4);
        harness.stop().await;
    }

    async fn run_to_qa_from_material(harness: &Harness, asset_id: &str) {
        let service = &harness.service;
        service
            .add_history_event(
                org1(),
                AddHistoryEventRequest {
                    asset_id: asset_id.to_string(),
                    event_type: "IN_PRODUCTION".to_string(),
                    evidence: Evidence::None,
                },
            )
            .await
            .unwrap();
        service
            .create_print_job_completion(org1(), completion_request(asset_id, Evidence::None))
            .await
            .unwrap();
        service
            .create_qa_certify(org1(), qa_request(asset_id, FIT_FOR_USE, Evidence::None))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_permissive_policy_accepts_any_order() {
        let harness = Harness::default_config();
        let service = &harness.service;
        service
            .create_material_certification(org1(), material_request("A1", Evidence::None))
            .await
            .unwrap();
        service
            .create_qa_certify(org1(), qa_request("A1", FIT_FOR_USE, Evidence::None))
            .await
            .unwrap();
        service
            .create_print_job_completion(org1(), completion_request("A1", Evidence::None))
            .await
            .unwrap();

        let asset = service.read_asset("A1").await.unwrap();
        assert_eq!(asset.current_lifecycle_stage, LifecycleStage::AwaitingQa);
        assert_eq!(asset.history_tx_ids.len(), 3);
        harness.stop().await;
    }

    #[tokio::test]
    async fn test_initial_stage_not_reentered_under_either_policy() {
        for policy in [SequencePolicy::Permissive, SequencePolicy::Strict] {
            let config = ContractConfig {
                sequence_policy: policy,
                ..ContractConfig::default()
            };
            let harness = Harness::start(LedgerConfig::for_testing(), config);
            let service = &harness.service;
            service
                .create_print_job_start(org1(), print_start_request("P1", Evidence::None))
                .await
                .unwrap();
            let height = harness.ledger.height().unwrap();

            let result = service
                .add_history_event(
                    org1(),
                    AddHistoryEventRequest {
                        asset_id: "P1".to_string(),
                        event_type: "MATERIAL_CERTIFIED".to_string(),
                        evidence: Evidence::None,
                    },
                )
                .await;
            assert_eq!(
                result,
                Err(ProvenanceError::InvalidTransition {
                    from: LifecycleStage::InProduction,
                    to: LifecycleStage::MaterialCertified,
                })
            );

            let asset = service.read_asset("P1").await.unwrap();
            assert_eq!(asset.current_lifecycle_stage, LifecycleStage::InProduction);
            assert_eq!(asset.history_tx_ids.len(), 1);
            assert_eq!(harness.ledger.height().unwrap(), height);
            harness.stop().await;
        }
    }

    #[tokio::test]
    async fn test_evidence_of_other_strategy_is_refused() {
        let harness = Harness::default_config();
        let result = harness
            .service
            .create_material_certification(
                org1(),
                material_request("A1", evidence(PayloadStrategy::Naive, b"mill cert")),
            )
            .await;
        assert!(matches!(result, Err(ProvenanceError::InvalidArgument(_))));
        assert!(!harness.service.asset_exists("A1").await.unwrap());
        assert_eq!(harness.ledger.height().unwrap(), 0);
        harness.stop().await;
    }
}
