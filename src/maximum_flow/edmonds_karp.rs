use crate::maximum_flow::csr::CSR;
use crate::maximum_flow::graph::Graph;
use crate::maximum_flow::status::Status;
use log::trace;
use num_traits::NumAssign;
use std::collections::VecDeque;

// shortest augmenting paths, O(nm^2)
// independent of the pseudoflow solver, used to cross-check its results
#[derive(Default)]
pub struct EdmondsKarp<Flow> {
    csr: CSR<Flow>,
    prev: Vec<(usize, usize)>,
}

impl<Flow> EdmondsKarp<Flow>
where
    Flow: NumAssign + Ord + Copy,
{
    pub fn solve(&mut self, source: usize, sink: usize, graph: &mut Graph<Flow>) -> Status {
        if source >= graph.num_nodes() || sink >= graph.num_nodes() || source == sink {
            return Status::BadInput;
        }
        graph.edges.iter_mut().for_each(|e| e.flow = Flow::zero());
        self.csr.build(graph);

        let mut num_augmentations = 0_usize;
        while self.bfs(source, sink) {
            let mut delta = self.csr.inside_edge_list[self.prev[sink].1].residual_capacity();
            let mut v = sink;
            while v != source {
                let (u, i) = self.prev[v];
                delta = delta.min(self.csr.inside_edge_list[i].residual_capacity());
                v = u;
            }

            let mut v = sink;
            while v != source {
                let (u, i) = self.prev[v];
                self.csr.push_flow(i, delta);
                v = u;
            }
            num_augmentations += 1;
        }
        trace!("edmonds-karp finished after {num_augmentations} augmentations");

        self.csr.set_flow(graph);
        Status::Optimal
    }

    // true if the sink is reachable; prev holds (parent, inside edge) per reached node
    fn bfs(&mut self, source: usize, sink: usize) -> bool {
        self.prev.clear();
        self.prev.resize(self.csr.num_nodes, (usize::MAX, usize::MAX));
        self.prev[source] = (source, usize::MAX);

        let mut que = VecDeque::from([source]);
        while let Some(u) = que.pop_front() {
            for i in self.csr.start[u]..self.csr.start[u + 1] {
                let edge = &self.csr.inside_edge_list[i];
                if self.prev[edge.to].0 != usize::MAX || edge.residual_capacity() == Flow::zero() {
                    continue;
                }
                self.prev[edge.to] = (u, i);
                if edge.to == sink {
                    return true;
                }
                que.push_back(edge.to);
            }
        }
        false
    }
}
