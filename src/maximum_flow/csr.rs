use crate::maximum_flow::graph::Graph;
use num_traits::NumAssign;
use std::ops::Sub;

#[derive(Default, PartialEq, Debug)]
pub struct InsideEdge<Flow> {
    pub to: usize,
    pub flow: Flow,
    pub upper: Flow,
    pub rev: usize,
}

impl<Flow> InsideEdge<Flow>
where
    Flow: Sub<Output = Flow> + Copy,
{
    pub fn residual_capacity(&self) -> Flow {
        self.upper - self.flow
    }
}

// residual network in compressed sparse row form
// every edge (u, v) yields a forward entry at u and a reverse entry at v
pub struct CSR<Flow> {
    pub num_nodes: usize,
    pub edge_index_to_inside_edge_index: Vec<usize>,

    pub start: Vec<usize>,
    pub inside_edge_list: Vec<InsideEdge<Flow>>,
}

impl<Flow> Default for CSR<Flow> {
    fn default() -> Self {
        Self { num_nodes: 0, edge_index_to_inside_edge_index: Vec::new(), start: Vec::new(), inside_edge_list: Vec::new() }
    }
}

impl<Flow> CSR<Flow>
where
    Flow: NumAssign + Ord + Copy,
{
    // the residual network starts from the flow currently stored in the graph
    pub fn build(&mut self, graph: &Graph<Flow>) {
        self.num_nodes = graph.num_nodes();

        self.edge_index_to_inside_edge_index = vec![usize::MAX; graph.num_edges()];
        self.start = vec![0; self.num_nodes + 1];
        self.inside_edge_list = (0..2 * graph.num_edges()).map(|_| InsideEdge { to: 0, flow: Flow::zero(), upper: Flow::zero(), rev: 0 }).collect();

        let mut degree = vec![0; self.num_nodes];
        for edge in graph.edges() {
            degree[edge.to] += 1;
            degree[edge.from] += 1;
        }

        for i in 1..=self.num_nodes {
            self.start[i] += self.start[i - 1] + degree[i - 1];
        }

        let mut counter = vec![0; self.num_nodes];
        for (edge_index, e) in graph.edges().enumerate() {
            let (u, v) = (e.from, e.to);
            let inside_edge_index_u = self.start[u] + counter[u];
            counter[u] += 1;
            let inside_edge_index_v = self.start[v] + counter[v];
            counter[v] += 1;
            self.edge_index_to_inside_edge_index[edge_index] = inside_edge_index_u;

            self.inside_edge_list[inside_edge_index_u] = InsideEdge { to: v, flow: e.flow, upper: e.upper, rev: inside_edge_index_v };
            self.inside_edge_list[inside_edge_index_v] = InsideEdge { to: u, flow: e.upper - e.flow, upper: e.upper, rev: inside_edge_index_u };
        }
    }

    pub fn set_flow(&self, graph: &mut Graph<Flow>) {
        for edge_id in 0..graph.num_edges() {
            let i = self.edge_index_to_inside_edge_index[edge_id];
            graph.edges[edge_id].flow = self.inside_edge_list[i].flow;
        }
    }

    #[inline]
    pub fn neighbors(&self, u: usize) -> std::slice::Iter<'_, InsideEdge<Flow>> {
        self.inside_edge_list[self.start[u]..self.start[u + 1]].iter()
    }

    #[inline]
    pub fn push_flow(&mut self, inside_edge_index: usize, flow: Flow) {
        let rev = self.inside_edge_list[inside_edge_index].rev;

        self.inside_edge_list[inside_edge_index].flow += flow;
        self.inside_edge_list[rev].flow -= flow;
    }
}
