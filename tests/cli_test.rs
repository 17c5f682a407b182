//! Tests for the cgraph binary

use std::io::Write;
use std::process::Command;

const AND_INV_BLIF: &str = ".model and_inv\n.inputs a b\n.outputs y\n.names a b y\n10 1\n.end\n";

#[test]
fn test_graph_stdout_is_json_with_verbose_logging() {
    let mut file = tempfile::Builder::new().suffix(".blif").tempfile().unwrap();
    file.write_all(AND_INV_BLIF.as_bytes()).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_cgraph"))
        .args(["-vv", "graph", "--ver", "0.2"])
        .arg(file.path())
        .output()
        .expect("Failed to run cgraph");
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let json: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("stdout should hold only the graph JSON");
    assert_eq!(json["num_nodes"], 5);
    assert!(json["edata"].get("w").is_some());

    // The load is logged at info level, on stderr
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Loaded"), "{stderr}");
}
