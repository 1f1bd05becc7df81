//! Integration tests for vpc-overlap
//!
//! These tests verify the workflow from reading a VPC cache to the overlap report.

use vpc_overlap::{
    aws::read_vpc_cache,
    compute_overlaps,
    models::NetworkRecord,
    output::{render, OutputFormat},
    processing::{detect_overlaps, OverlapError},
};

const CACHE_01: &str = "src/tests/test_data/vpc_test_cache_01.json";
const CACHE_02: &str = "src/tests/test_data/vpc_test_cache_02.json";

fn pair_ids(networks: &[NetworkRecord]) -> Vec<(String, String)> {
    detect_overlaps(networks)
        .expect("Failed to detect overlaps")
        .into_iter()
        .map(|o| (o.first.network_id, o.second.network_id))
        .collect()
}

#[test]
fn test_full_workflow_with_cache() {
    let networks = read_vpc_cache(CACHE_01).expect("Failed to read VPC cache");
    assert_eq!(networks.len(), 9, "Expected 9 VPC blocks in test data");

    let overlaps = compute_overlaps(networks.clone(), false, &[]).expect("Failed to compute");
    let ids: Vec<(&str, &str)> = overlaps
        .iter()
        .map(|o| (o.first.network_id.as_str(), o.second.network_id.as_str()))
        .collect();
    assert_eq!(
        ids,
        vec![
            ("vpc-0a1", "vpc-0b1"),
            ("vpc-0a2", "vpc-0a3"),
            ("vpc-0a2", "vpc-0b2"),
            ("vpc-0a3", "vpc-0b2"),
            ("vpc-0b3", "vpc-0c1"),
        ]
    );

    let overlaps = compute_overlaps(networks.clone(), true, &[]).expect("Failed to compute");
    assert_eq!(overlaps.len(), 2, "Default VPCs should be skipped");

    let overlaps =
        compute_overlaps(networks, true, &["10.20.0.0/16"]).expect("Failed to compute");
    assert_eq!(overlaps.len(), 1);
    assert_eq!(overlaps[0].first.account_name, "shared-services");
    assert_eq!(overlaps[0].second.account_name, "prod");
}

#[test]
fn test_every_overlap_is_symmetric_and_unique() {
    let networks = read_vpc_cache(CACHE_01).expect("Failed to read VPC cache");
    let ids = pair_ids(&networks);

    let position = |id: &str| networks.iter().position(|n| n.network_id == id).unwrap();
    for (i, (a, b)) in ids.iter().enumerate() {
        assert!(position(a) < position(b), "first must precede second");
        assert!(
            !ids.iter().skip(i + 1).any(|(x, y)| (x, y) == (a, b) || (x, y) == (b, a)),
            "pair {a}/{b} reported twice"
        );
    }
}

#[test]
fn test_reversed_input_swaps_labels() {
    let mut networks = read_vpc_cache(CACHE_01).expect("Failed to read VPC cache");
    let forward = pair_ids(&networks);
    networks.reverse();
    let backward = pair_ids(&networks);

    assert_eq!(forward.len(), backward.len());
    for (a, b) in &forward {
        assert!(backward.contains(&(b.clone(), a.clone())));
    }
}

#[test]
fn test_malformed_cache_entry_is_fatal() {
    let networks = read_vpc_cache(CACHE_02).expect("Failed to read VPC cache");
    assert_eq!(networks.len(), 3);
    assert!(networks.iter().all(|n| !n.is_default), "is_default defaults to false");

    match detect_overlaps(&networks) {
        Err(OverlapError::MalformedAddressBlock {
            index,
            account_id,
            network_id,
            ..
        }) => {
            assert_eq!(index, 2);
            assert_eq!(account_id, "333333333333");
            assert_eq!(network_id, "vpc-0c9");
        }
        other => panic!("expected MalformedAddressBlock, got {other:?}"),
    }
    assert!(compute_overlaps(networks, false, &[]).is_err());
}

#[test]
fn test_csv_report() {
    let networks = read_vpc_cache(CACHE_01).expect("Failed to read VPC cache");
    let overlaps = compute_overlaps(networks, true, &[]).expect("Failed to compute");

    let mut out = Vec::new();
    render(&mut out, OutputFormat::Csv, &overlaps).expect("Failed to render");
    let csv = String::from_utf8(out).unwrap();

    assert_eq!(csv.lines().count(), 3);
    assert!(csv.lines().all(|l| l.split(',').count() == 10));
}
