use crate::maximum_flow::pseudo_flow::network::PseudoFlowNetwork;
use crate::maximum_flow::status::Status;
use log::warn;
use num_traits::NumAssign;
use std::ops::Neg;
use thiserror::Error;

/// A constraint the final flow fails to satisfy.
#[derive(Error, PartialEq, Eq, Debug, Clone)]
pub enum Violation<Flow> {
    #[error("capacity constraint violated on arc ({from}, {to}): flow = {flow}, capacity = {capacity}")]
    Capacity { from: usize, to: usize, flow: Flow, capacity: Flow },

    #[error("flow balance constraint violated in node {node}: excess = {excess}")]
    Conservation { node: usize, excess: Flow },

    #[error("flow is not optimal: maximum flow {maximum_flow} does not equal minimum cut {minimum_cut}")]
    CutMismatch { maximum_flow: Flow, minimum_cut: Flow },
}

/// Feasibility and optimality of a finished solve.
///
/// `minimum_cut` is the capacity of the arcs leaving the nodes labelled at or
/// above `gap`, `maximum_flow` the net flow arriving at the sink.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct OptimalityReport<Flow> {
    pub minimum_cut: Flow,
    pub maximum_flow: Flow,
    pub gap: usize,
    pub violations: Vec<Violation<Flow>>,
}

impl<Flow> OptimalityReport<Flow> {
    pub fn is_feasible(&self) -> bool {
        !self.violations.iter().any(|v| matches!(v, Violation::Capacity { .. } | Violation::Conservation { .. }))
    }

    pub fn is_optimal(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn status(&self) -> Status {
        if !self.is_feasible() {
            Status::Infeasible
        } else if !self.is_optimal() {
            Status::NotOptimal
        } else {
            Status::Optimal
        }
    }
}

impl<Flow> PseudoFlowNetwork<Flow>
where
    Flow: NumAssign + Neg<Output = Flow> + Ord + Copy + std::fmt::Display,
{
    pub(crate) fn check_optimality(&self) -> OptimalityReport<Flow> {
        let gap = self.gap();
        let mut minimum_cut = Flow::zero();
        let mut excess = vec![Flow::zero(); self.num_nodes];
        let mut violations = Vec::new();

        for arc in self.arcs.iter() {
            if self.nodes[arc.from].label >= gap && self.nodes[arc.to].label < gap {
                minimum_cut += arc.capacity;
            }
            if arc.flow > arc.capacity || arc.flow < Flow::zero() {
                violations.push(Violation::Capacity { from: arc.from, to: arc.to, flow: arc.flow, capacity: arc.capacity });
            }
            excess[arc.from] -= arc.flow;
            excess[arc.to] += arc.flow;
        }

        for (node, &excess) in excess.iter().enumerate() {
            if !self.is_terminal(node) && excess != Flow::zero() {
                violations.push(Violation::Conservation { node, excess });
            }
        }

        let maximum_flow = excess[self.sink];
        if maximum_flow != minimum_cut {
            violations.push(Violation::CutMismatch { maximum_flow, minimum_cut });
        }

        for violation in violations.iter() {
            warn!("{violation}");
        }

        OptimalityReport { minimum_cut, maximum_flow, gap, violations }
    }

    // source side of the minimum cut
    pub(crate) fn source_side(&self) -> Vec<usize> {
        let gap = self.gap();
        (0..self.num_nodes).filter(|&u| self.nodes[u].label >= gap).collect()
    }
}
