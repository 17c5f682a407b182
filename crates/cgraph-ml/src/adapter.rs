//! Circuit-graph adapter
//!
//! Owns one engine session and translates between the graph-learning side
//! (version codes, keyword options, tensor graphs) and the engine's command
//! language and raw arrays.

use crate::command::{load_command, render};
use crate::config::AdapterConfig;
use crate::error::AdapterResult;
use crate::graph::CircuitGraph;
use crate::options::{CommandOptions, KeywordValue};
use crate::version::GraphVersion;
use cgraph_synth::{Engine, ExecStatus, NtkStats, SclStats, YosysStats};
use tracing::debug;

/// Adapter over exactly one engine session
#[derive(Debug)]
pub struct CircuitGraphAdapter<E: Engine> {
    engine: E,
    config: AdapterConfig,
}

impl<E: Engine> CircuitGraphAdapter<E> {
    /// Take ownership of an engine session
    pub fn open(engine: E, config: AdapterConfig) -> Self {
        Self { engine, config }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn config(&self) -> &AdapterConfig {
        &self.config
    }

    /// Release the engine session
    pub fn close(self) -> E {
        self.engine
    }

    /// Build the tensor graph of the current network for a `t.i` code
    pub fn build_graph(&mut self, ver: f64) -> AdapterResult<CircuitGraph> {
        self.build_graph_with(GraphVersion::from_code(ver)?)
    }

    /// Build with the configured default version
    pub fn build_default_graph(&mut self) -> AdapterResult<CircuitGraph> {
        self.build_graph_with(self.config.version()?)
    }

    pub fn build_graph_with(&mut self, version: GraphVersion) -> AdapterResult<CircuitGraph> {
        let data = self.engine.graph_data(version.typing, version.inverter)?;
        let num_nodes = self.engine.num_nodes();
        let graph = CircuitGraph::from_graph_data(num_nodes, &data, version.has_edge_weights())?;
        debug!(
            "built graph v{}: {} nodes, {} edges",
            version,
            graph.num_nodes,
            graph.num_edges()
        );
        Ok(graph)
    }

    /// Render typed options onto `base` and execute the result
    pub fn run_command(&mut self, base: &str, options: &CommandOptions) -> ExecStatus {
        let cmd = render(base, options);
        self.execute(&cmd)
    }

    /// Classify keywords by letter case, then run as [`Self::run_command`]
    pub fn run_keywords<K: AsRef<str>>(
        &mut self,
        base: &str,
        keywords: &[(K, KeywordValue)],
    ) -> AdapterResult<ExecStatus> {
        let options = CommandOptions::from_keywords(keywords, self.config.option_policy)?;
        Ok(self.run_command(base, &options))
    }

    /// Load a circuit file and structurally check it in one command
    pub fn load_file(&mut self, path: &str) -> ExecStatus {
        let cmd = load_command(path, &self.config.read_command, &self.config.check_command);
        self.execute(&cmd)
    }

    fn execute(&mut self, cmd: &str) -> ExecStatus {
        debug!("execute: {}", cmd);
        self.engine.execute(cmd)
    }

    pub fn ntk_stats(&self) -> AdapterResult<NtkStats> {
        Ok(self.engine.ntk_stats()?)
    }

    pub fn scl_stats(&self) -> AdapterResult<SclStats> {
        Ok(self.engine.scl_stats()?)
    }

    pub fn yosys_stats(&self) -> AdapterResult<YosysStats> {
        Ok(self.engine.yosys_stats()?)
    }
}
