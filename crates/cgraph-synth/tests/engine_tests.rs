//! End-to-end tests for the in-process engine

use cgraph_synth::*;
use std::io::Write;

const AND_INV_BLIF: &str = ".model and_inv\n.inputs a b\n.outputs y\n.names a b y\n10 1\n.end\n";
const AND_INV_AAG: &str = "aag 3 2 0 1 1\n2\n4\n6\n6 2 5\ni0 a\ni1 b\no0 y\n";
const TOGGLE_AAG: &str = "aag 1 0 1 1 0\n2 3\n2\n";

fn temp_file(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

fn load(session: &mut AigSession, file: &tempfile::NamedTempFile) {
    let status = session.execute(&format!("read {}; st", file.path().display()));
    assert!(status.success, "load failed: {status}");
}

#[test]
fn test_blif_and_aiger_agree() {
    let blif = temp_file(".blif", AND_INV_BLIF);
    let aag = temp_file(".aag", AND_INV_AAG);

    let mut from_blif = AigSession::new();
    let mut from_aag = AigSession::new();
    load(&mut from_blif, &blif);
    load(&mut from_aag, &aag);

    for typing in [NodeTyping::Combinational, NodeTyping::CiCo] {
        for inverter in InverterEncoding::ALL {
            let a = from_blif.graph_data(typing, inverter).unwrap();
            let b = from_aag.graph_data(typing, inverter).unwrap();
            assert_eq!(a, b, "t={typing} i={inverter}");
        }
    }

    let data = from_aag
        .graph_data(NodeTyping::Combinational, InverterEncoding::EdgeWeight)
        .unwrap();
    assert_eq!(data.num_edges(), 3);
    assert_eq!(data.num_rows(), from_aag.num_nodes());
    assert_eq!(data.edge_weight.iter().filter(|&&w| w == -1).count(), 1);
}

#[test]
fn test_sequential_design_needs_sequential_typing() {
    let aag = temp_file(".aag", TOGGLE_AAG);
    let mut session = AigSession::new();
    load(&mut session, &aag);

    assert!(matches!(
        session.graph_data(NodeTyping::Combinational, InverterEncoding::NodeType),
        Err(SynthError::UnexpectedObject { .. })
    ));

    let data = session
        .graph_data(NodeTyping::Sequential, InverterEncoding::NodeType)
        .unwrap();
    assert_eq!(data.feature_dim, 9);
    assert_eq!(data.num_rows(), session.num_nodes());
    // PO and latch input each read the latch output
    assert_eq!(data.num_edges(), 2);

    let data = session
        .graph_data(NodeTyping::Sequential, InverterEncoding::EdgeWeight)
        .unwrap();
    assert!(data.edge_weight.iter().all(|&w| w == 1));
}

#[test]
fn test_stats_after_load() {
    let blif = temp_file(".blif", AND_INV_BLIF);
    let mut session = AigSession::new();
    load(&mut session, &blif);

    let stats = session.ntk_stats().unwrap();
    assert!(stats.is_aig);
    assert_eq!((stats.inputs, stats.outputs, stats.nodes), (2, 1, 1));
    assert_eq!(stats.levels, 1);

    let gates = session.yosys_stats().unwrap();
    assert_eq!(gates.and_gates, 1);
    assert_eq!(gates.not_gates, 1);

    assert!(session.scl_stats().is_err());
}

#[test]
fn test_missing_file_fails_softly() {
    let mut session = AigSession::new();
    let status = session.execute("read /nonexistent/design.blif; st");
    assert!(!status.success);
    assert!(session.network().is_none());
}
