use crate::maximum_flow::pseudo_flow::network::PseudoFlowNetwork;
use log::debug;
use num_traits::NumAssign;
use std::ops::Neg;

impl<Flow> PseudoFlowNetwork<Flow>
where
    Flow: NumAssign + Neg<Output = Flow> + Ord + Copy,
{
    // saturate every source and sink arc, then every node with positive
    // excess becomes a strong root at label 1
    pub(crate) fn simple_initialization(&mut self) {
        let (source, sink) = (self.source, self.sink);

        for i in 0..self.nodes[source].out_of_tree.len() {
            let arc = &mut self.arcs[self.nodes[source].out_of_tree[i]];
            arc.flow = arc.capacity;
            let (to, capacity) = (arc.to, arc.capacity);
            self.nodes[to].excess += capacity;
        }

        for i in 0..self.nodes[sink].out_of_tree.len() {
            let arc = &mut self.arcs[self.nodes[sink].out_of_tree[i]];
            arc.flow = arc.capacity;
            let (from, capacity) = (arc.from, arc.capacity);
            self.nodes[from].excess -= capacity;
        }

        self.nodes[source].excess = Flow::zero();
        self.nodes[sink].excess = Flow::zero();

        for u in 0..self.num_nodes {
            if self.nodes[u].excess > Flow::zero() {
                self.nodes[u].label = 1;
                self.label_count[1] += 1;
                self.add_to_strong_bucket(u);
            }
        }

        self.nodes[source].label = self.num_nodes;
        self.nodes[sink].label = 0;
        self.label_count[0] = (self.num_nodes - 2) - self.label_count[1];

        debug!("initialized {} strong roots, {} nodes at label 0", self.label_count[1], self.label_count[0]);
    }
}
