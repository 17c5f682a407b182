//! In-process engine session
//!
//! [`AigSession`] owns at most one current network and interprets the
//! command language from [`crate::commands`]. It implements [`Engine`], so
//! the adapter can drive it exactly like an external engine.

use crate::aiger::read_aiger;
use crate::blif::read_blif;
use crate::commands::{split_script, Command};
use crate::engine::{Engine, ExecStatus};
use crate::error::{SynthError, SynthResult};
use crate::extract::{graph_data, GraphData, InverterEncoding, NodeTyping};
use crate::network::Network;
use crate::stats::{ntk_stats, yosys_stats, NtkStats, YosysStats};
use crate::strash::{cleanup, rebuild, RebuildOptions};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info};

/// Engine session over an in-memory network
#[derive(Debug, Default)]
pub struct AigSession {
    network: Option<Network>,
    /// Sub-commands executed successfully over the session lifetime
    executed: usize,
}

impl AigSession {
    /// Create a session with no current network
    pub fn new() -> Self {
        Self::default()
    }

    pub fn network(&self) -> Option<&Network> {
        self.network.as_ref()
    }

    pub fn executed(&self) -> usize {
        self.executed
    }

    fn current(&self) -> SynthResult<&Network> {
        self.network.as_ref().ok_or(SynthError::NoNetwork)
    }

    /// Read a circuit file, picking the reader from the extension
    pub fn read_file(&mut self, path: &Path) -> SynthResult<()> {
        let name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("top")
            .to_string();
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let network = match ext.as_str() {
            "aag" | "aig" => read_aiger(&std::fs::read(path)?, &name)?,
            "blif" => read_blif(&std::fs::read_to_string(path)?, &name)?,
            _ => return Err(SynthError::UnsupportedFormat(path.display().to_string())),
        };

        debug!(
            "read '{}': {} PIs, {} POs, {} latches, {} nodes",
            path.display(),
            network.num_pis(),
            network.num_pos(),
            network.num_latches(),
            network.num_nodes()
        );
        self.network = Some(network);
        Ok(())
    }

    /// Run one parsed sub-command
    pub fn run(&mut self, command: &Command) -> SynthResult<()> {
        match command {
            Command::Read { path } => self.read_file(path)?,
            Command::Strash { keep_dangling } => {
                let hashed = rebuild(
                    self.current()?,
                    RebuildOptions {
                        hash: true,
                        keep_dangling: *keep_dangling,
                    },
                )?;
                self.network = Some(hashed);
            }
            Command::Cleanup => {
                let cleaned = cleanup(self.current()?)?;
                self.network = Some(cleaned);
            }
            Command::PrintStats => {
                let ntk = self.current()?;
                info!("{:<12} : {}", ntk.name, ntk_stats(ntk)?);
            }
        }
        self.executed += 1;
        Ok(())
    }

    /// Parse and run a command string, stopping at the first failure
    pub fn run_script(&mut self, script: &str) -> SynthResult<()> {
        for text in split_script(script) {
            let command = Command::parse(text)?;
            debug!("exec: {}", text);
            self.run(&command)?;
        }
        Ok(())
    }
}

impl Engine for AigSession {
    fn execute(&mut self, command: &str) -> ExecStatus {
        let start = Instant::now();
        let result = self.run_script(command);
        let elapsed = start.elapsed();
        match result {
            Ok(()) => ExecStatus::ok(elapsed),
            Err(e) => {
                error!("Cannot execute command \"{}\": {}", command, e);
                ExecStatus::failed(elapsed)
            }
        }
    }

    fn graph_data(
        &mut self,
        typing: NodeTyping,
        inverter: InverterEncoding,
    ) -> SynthResult<GraphData> {
        graph_data(self.current()?, typing, inverter)
    }

    fn num_nodes(&self) -> usize {
        self.network.as_ref().map_or(0, Network::num_objects)
    }

    fn ntk_stats(&self) -> SynthResult<NtkStats> {
        ntk_stats(self.current()?)
    }

    fn yosys_stats(&self) -> SynthResult<YosysStats> {
        yosys_stats(self.current()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const XOR_BLIF: &str = ".model xor\n.inputs a b\n.outputs y\n.names a b y\n10 1\n01 1\n.end\n";

    fn write_temp(suffix: &str, contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_then_strash() {
        let file = write_temp(".blif", XOR_BLIF);
        let mut session = AigSession::new();

        let status = session.execute(&format!("read {}; st", file.path().display()));
        assert!(status.success);
        assert_eq!(session.executed(), 2);

        let ntk = session.network().unwrap();
        assert!(ntk.is_strashed());
        assert_eq!(ntk.num_nodes(), 3);
        assert_eq!(session.num_nodes(), ntk.num_objects());
    }

    #[test]
    fn test_failing_command_stops_script() {
        let mut session = AigSession::new();
        let status = session.execute("st; ps");
        assert!(!status.success);
        assert_eq!(session.executed(), 0);
    }

    #[test]
    fn test_unknown_extension() {
        let file = write_temp(".v", "module m; endmodule\n");
        let mut session = AigSession::new();
        assert!(matches!(
            session.read_file(file.path()),
            Err(SynthError::UnsupportedFormat(_))
        ));
    }

    #[test]
    fn test_graph_data_needs_network_and_strash() {
        let mut session = AigSession::new();
        assert!(matches!(
            session.graph_data(NodeTyping::Combinational, InverterEncoding::NodeType),
            Err(SynthError::NoNetwork)
        ));

        let file = write_temp(".blif", XOR_BLIF);
        assert!(session.execute(&format!("r {}", file.path().display())).success);
        assert!(matches!(
            session.graph_data(NodeTyping::Combinational, InverterEncoding::NodeType),
            Err(SynthError::NotStrashed)
        ));
    }

    #[test]
    fn test_scl_stats_unsupported() {
        let session = AigSession::new();
        assert!(matches!(
            session.scl_stats(),
            Err(SynthError::Unsupported(_))
        ));
    }
}
