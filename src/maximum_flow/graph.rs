use crate::maximum_flow::csr::CSR;
use num_traits::NumAssign;
use std::collections::VecDeque;

#[derive(PartialEq, Debug, Clone)]
pub struct Edge<Flow> {
    pub from: usize,
    pub to: usize,
    pub flow: Flow,
    pub upper: Flow,
}

#[derive(Clone)]
pub struct Graph<Flow> {
    num_nodes: usize,
    num_edges: usize,
    pub(crate) edges: Vec<Edge<Flow>>,
}

impl<Flow> Default for Graph<Flow> {
    fn default() -> Self {
        Self { num_nodes: 0, num_edges: 0, edges: Vec::new() }
    }
}

impl<Flow> Graph<Flow>
where
    Flow: NumAssign + Ord + Copy,
{
    #[inline]
    pub fn num_nodes(&self) -> usize {
        self.num_nodes
    }

    #[inline]
    pub fn num_edges(&self) -> usize {
        self.num_edges
    }

    pub fn add_node(&mut self) -> usize {
        self.num_nodes += 1;
        self.num_nodes - 1
    }

    pub fn add_nodes(&mut self, num_nodes: usize) -> Vec<usize> {
        self.num_nodes += num_nodes;
        ((self.num_nodes - num_nodes)..self.num_nodes).collect()
    }

    // return edge index
    pub fn add_directed_edge(&mut self, from: usize, to: usize, upper: Flow) -> Option<usize> {
        if upper < Flow::zero() || from >= self.num_nodes || to >= self.num_nodes {
            return None;
        }

        self.edges.push(Edge { from, to, flow: Flow::zero(), upper });

        self.num_edges += 1;
        Some(self.num_edges - 1)
    }

    pub fn get_edge(&self, edge_id: usize) -> Option<Edge<Flow>> {
        self.edges.get(edge_id).cloned()
    }

    #[inline]
    pub fn edges(&self) -> std::slice::Iter<'_, Edge<Flow>> {
        self.edges.iter()
    }

    // net flow leaving the source
    pub fn maximum_flow(&self, source: usize) -> Flow {
        self.edges.iter().fold(Flow::zero(), |mut flow, edge| {
            if edge.from == source && edge.to != source {
                flow += edge.flow;
            } else if edge.to == source && edge.from != source {
                flow -= edge.flow;
            }
            flow
        })
    }

    // nodes reachable from the source in the residual network of the current flow
    pub fn minimum_cut(&self, source: usize) -> Vec<usize> {
        if source >= self.num_nodes {
            return Vec::new();
        }

        let mut csr = CSR::default();
        csr.build(self);

        let mut visited = vec![false; self.num_nodes];
        let mut que = VecDeque::from([source]);
        visited[source] = true;
        while let Some(u) = que.pop_front() {
            for e in csr.neighbors(u) {
                if !visited[e.to] && e.residual_capacity() > Flow::zero() {
                    visited[e.to] = true;
                    que.push_back(e.to);
                }
            }
        }

        (0..self.num_nodes).filter(|&u| visited[u]).collect()
    }

    // total capacity of the edges leaving `cut`
    pub fn cut_capacity(&self, cut: &[usize]) -> Flow {
        let mut in_cut = vec![false; self.num_nodes];
        cut.iter().for_each(|&u| in_cut[u] = true);
        self.edges
            .iter()
            .filter(|e| in_cut[e.from] && !in_cut[e.to])
            .fold(Flow::zero(), |sum, e| sum + e.upper)
    }
}
