mod flow_decomposition;
mod initialization;
mod network;
mod root_selection;
mod tree_processing;

pub mod config;
pub mod optimality;
pub mod statistics;

pub use config::{BucketOrder, Config, RootSelection};
pub use optimality::{OptimalityReport, Violation};
pub use statistics::Statistics;

use crate::maximum_flow::graph::Graph;
use crate::maximum_flow::status::Status;
use log::debug;
use network::PseudoFlowNetwork;
use num_traits::NumAssign;
use std::fmt::Display;
use std::ops::Neg;

/// Hochbaum's pseudoflow algorithm.
///
/// Phase one grows and merges trees of strong (excess carrying) nodes until no
/// strong root can reach a weak node, which yields a maximum preflow and a
/// minimum cut. The preflow is then decomposed into a feasible flow that is
/// written back into the graph.
///
/// ```
/// use pseudoflow::maximum_flow::graph::Graph;
/// use pseudoflow::maximum_flow::pseudo_flow::PseudoFlow;
/// use pseudoflow::maximum_flow::status::Status;
///
/// let mut graph = Graph::default();
/// let nodes = graph.add_nodes(4);
/// graph.add_directed_edge(nodes[0], nodes[1], 10);
/// graph.add_directed_edge(nodes[0], nodes[2], 5);
/// graph.add_directed_edge(nodes[1], nodes[2], 15);
/// graph.add_directed_edge(nodes[1], nodes[3], 10);
/// graph.add_directed_edge(nodes[2], nodes[3], 10);
///
/// let mut solver = PseudoFlow::default();
/// assert_eq!(solver.solve(nodes[0], nodes[3], &mut graph), Status::Optimal);
/// assert_eq!(graph.maximum_flow(nodes[0]), 15);
/// ```
#[derive(Default)]
pub struct PseudoFlow<Flow> {
    config: Config,
    network: Option<PseudoFlowNetwork<Flow>>,
    report: Option<OptimalityReport<Flow>>,
}

impl<Flow> PseudoFlow<Flow>
where
    Flow: NumAssign + Neg<Output = Flow> + Ord + Copy + Display,
{
    pub fn new(config: Config) -> Self {
        Self { config, network: None, report: None }
    }

    pub fn solve(&mut self, source: usize, sink: usize, graph: &mut Graph<Flow>) -> Status {
        self.network = None;
        self.report = None;
        if source >= graph.num_nodes() || sink >= graph.num_nodes() || source == sink {
            return Status::BadInput;
        }

        let mut network = PseudoFlowNetwork::build(graph, source, sink, self.config);
        debug!("built network with {} nodes and {} arcs", graph.num_nodes(), graph.num_edges());

        network.simple_initialization();
        network.flow_phase_one();
        debug!("phase one finished, gap at label {}: {:?}", network.gap(), network.stats);

        network.recover_flow();
        network.set_flow(graph);

        let report = network.check_optimality();
        let status = report.status();
        debug!("maximum flow {} with minimum cut {}: {:?}", report.maximum_flow, report.minimum_cut, status);

        self.network = Some(network);
        self.report = Some(report);
        status
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Counters of the last solve, zero before the first one.
    pub fn statistics(&self) -> Statistics {
        self.network.as_ref().map(|network| network.stats).unwrap_or_default()
    }

    /// Nodes on the source side of the minimum cut found by the last solve.
    pub fn minimum_cut(&self) -> Vec<usize> {
        self.network.as_ref().map(|network| network.source_side()).unwrap_or_default()
    }

    pub fn optimality_report(&self) -> Option<&OptimalityReport<Flow>> {
        self.report.as_ref()
    }
}
