use crate::maximum_flow::graph::Graph;
use crate::maximum_flow::pseudo_flow::config::{BucketOrder, Config};
use crate::maximum_flow::pseudo_flow::statistics::Statistics;
use num_traits::NumAssign;
use std::collections::VecDeque;
use std::ops::Neg;

// orientation of a tree arc relative to the child that owns it
#[derive(Default, PartialEq, Eq, Debug, Clone, Copy)]
pub(crate) enum Direction {
    // child is `from`, residual is capacity - flow
    #[default]
    Forward,
    // child is `to`, residual is the flow itself
    Backward,
}

impl Direction {
    #[inline]
    pub(crate) fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct InternalArc<Flow> {
    pub(crate) from: usize,
    pub(crate) to: usize,
    pub(crate) capacity: Flow,
    pub(crate) flow: Flow,
    pub(crate) direction: Direction,
}

#[derive(Debug, Clone)]
pub(crate) struct Node<Flow> {
    pub(crate) label: usize,
    pub(crate) excess: Flow,
    pub(crate) visited: usize,

    // tree links, usize::MAX when absent
    pub(crate) parent: usize,
    pub(crate) arc_to_parent: usize,
    pub(crate) first_child: usize,
    pub(crate) next_sibling: usize,
    pub(crate) next_scan: usize,

    // arcs not in any tree; [next_arc..] is still unexamined
    pub(crate) out_of_tree: Vec<usize>,
    pub(crate) next_arc: usize,
}

impl<Flow> Node<Flow>
where
    Flow: NumAssign,
{
    fn new() -> Self {
        Self {
            label: 0,
            excess: Flow::zero(),
            visited: 0,
            parent: usize::MAX,
            arc_to_parent: usize::MAX,
            first_child: usize::MAX,
            next_sibling: usize::MAX,
            next_scan: usize::MAX,
            out_of_tree: Vec::new(),
            next_arc: 0,
        }
    }

    #[inline]
    pub(crate) fn is_root(&self) -> bool {
        self.parent == usize::MAX
    }
}

// all mutable solver state of one solve
pub(crate) struct PseudoFlowNetwork<Flow> {
    pub(crate) num_nodes: usize,
    pub(crate) source: usize,
    pub(crate) sink: usize,
    pub(crate) nodes: Vec<Node<Flow>>,
    pub(crate) arcs: Vec<InternalArc<Flow>>,

    // strong roots waiting at each label 0..=num_nodes
    pub(crate) strong_roots: Vec<VecDeque<usize>>,
    // non-terminal nodes at each label 0..=num_nodes
    pub(crate) label_count: Vec<usize>,
    pub(crate) lowest_strong_label: usize,
    pub(crate) highest_strong_label: usize,

    pub(crate) config: Config,
    pub(crate) stats: Statistics,
}

impl<Flow> PseudoFlowNetwork<Flow>
where
    Flow: NumAssign + Neg<Output = Flow> + Ord + Copy,
{
    // arcs into the source, out of the sink and self-loops never carry flow
    // and are left out of every out-of-tree set
    pub(crate) fn build(graph: &Graph<Flow>, source: usize, sink: usize, config: Config) -> Self {
        let num_nodes = graph.num_nodes();
        let mut nodes: Vec<Node<Flow>> = (0..num_nodes).map(|_| Node::new()).collect();
        let mut arcs = Vec::with_capacity(graph.num_edges());

        for (arc_id, edge) in graph.edges().enumerate() {
            let (from, to) = (edge.from, edge.to);
            let mut arc = InternalArc { from, to, capacity: edge.upper, flow: Flow::zero(), direction: Direction::Forward };

            if to != source && from != sink && from != to {
                if from == source && to == sink {
                    arc.flow = arc.capacity;
                } else if to == sink {
                    nodes[sink].out_of_tree.push(arc_id);
                } else {
                    nodes[from].out_of_tree.push(arc_id);
                }
            }
            arcs.push(arc);
        }

        Self {
            num_nodes,
            source,
            sink,
            nodes,
            arcs,
            strong_roots: vec![VecDeque::new(); num_nodes + 1],
            label_count: vec![0; num_nodes + 1],
            lowest_strong_label: 0,
            highest_strong_label: 1,
            config,
            stats: Statistics::default(),
        }
    }

    #[inline]
    pub(crate) fn is_terminal(&self, u: usize) -> bool {
        u == self.source || u == self.sink
    }

    pub(crate) fn add_to_strong_bucket(&mut self, u: usize) {
        let bucket = &mut self.strong_roots[self.nodes[u].label];
        match self.config.bucket_order {
            BucketOrder::Fifo => bucket.push_back(u),
            BucketOrder::Lifo => bucket.push_front(u),
        }
    }

    pub(crate) fn add_relationship(&mut self, new_parent: usize, child: usize) {
        self.nodes[child].parent = new_parent;
        self.nodes[child].next_sibling = self.nodes[new_parent].first_child;
        self.nodes[new_parent].first_child = child;
    }

    pub(crate) fn break_relationship(&mut self, old_parent: usize, child: usize) {
        self.nodes[child].parent = usize::MAX;

        if self.nodes[old_parent].first_child == child {
            self.nodes[old_parent].first_child = self.nodes[child].next_sibling;
        } else {
            let mut current = self.nodes[old_parent].first_child;
            while self.nodes[current].next_sibling != child {
                current = self.nodes[current].next_sibling;
            }
            self.nodes[current].next_sibling = self.nodes[child].next_sibling;
        }
        self.nodes[child].next_sibling = usize::MAX;
    }

    // source side of the cut: every node labelled at or above this value
    pub(crate) fn gap(&self) -> usize {
        if self.config.is_lowest_label() {
            self.lowest_strong_label
        } else {
            self.num_nodes
        }
    }

    pub(crate) fn set_flow(&self, graph: &mut Graph<Flow>) {
        for (edge, arc) in graph.edges.iter_mut().zip(self.arcs.iter()) {
            edge.flow = arc.flow;
        }
    }
}
