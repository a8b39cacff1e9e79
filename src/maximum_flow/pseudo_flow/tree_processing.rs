use crate::maximum_flow::pseudo_flow::network::{Direction, PseudoFlowNetwork};
use log::trace;
use num_traits::NumAssign;
use std::ops::Neg;

impl<Flow> PseudoFlowNetwork<Flow>
where
    Flow: NumAssign + Neg<Output = Flow> + Ord + Copy,
{
    pub(crate) fn flow_phase_one(&mut self) {
        while let Some(strong_root) = self.next_strong_root() {
            trace!("processing strong root {strong_root} at label {}", self.nodes[strong_root].label);
            self.process_root(strong_root);
        }
    }

    // depth-first walk over the nodes of the tree sharing the root's label.
    // the first weak neighbor found absorbs the tree; otherwise every walked
    // node is relabelled on the way back up
    pub(crate) fn process_root(&mut self, strong_root: usize) {
        let mut strong_node = strong_root;
        self.nodes[strong_root].next_scan = self.nodes[strong_root].first_child;

        if let Some((out, weak_node)) = self.find_weak_node(strong_root) {
            self.merge(weak_node, strong_root, out);
            self.push_excess(strong_root);
            return;
        }

        self.check_children(strong_root);

        while strong_node != usize::MAX {
            while self.nodes[strong_node].next_scan != usize::MAX {
                let child = self.nodes[strong_node].next_scan;
                self.nodes[strong_node].next_scan = self.nodes[child].next_sibling;
                strong_node = child;
                self.nodes[strong_node].next_scan = self.nodes[strong_node].first_child;

                if let Some((out, weak_node)) = self.find_weak_node(strong_node) {
                    self.merge(weak_node, strong_node, out);
                    self.push_excess(strong_root);
                    return;
                }

                self.check_children(strong_node);
            }

            strong_node = self.nodes[strong_node].parent;
            if strong_node != usize::MAX {
                self.check_children(strong_node);
            }
        }

        self.add_to_strong_bucket(strong_root);

        if !self.config.is_lowest_label() {
            self.highest_strong_label = (self.highest_strong_label + 1).min(self.num_nodes);
        }
    }

    #[inline]
    fn weak_label(&self) -> usize {
        if self.config.is_lowest_label() {
            self.lowest_strong_label - 1
        } else {
            self.highest_strong_label - 1
        }
    }

    // returns (arc, weak endpoint) and takes the arc out of the out-of-tree set
    fn find_weak_node(&mut self, strong_node: usize) -> Option<(usize, usize)> {
        let weak_label = self.weak_label();

        let mut i = self.nodes[strong_node].next_arc;
        while i < self.nodes[strong_node].out_of_tree.len() {
            self.stats.num_arc_scans += 1;

            let arc = &self.arcs[self.nodes[strong_node].out_of_tree[i]];
            let weak_node = if self.nodes[arc.to].label == weak_label {
                Some(arc.to)
            } else if self.nodes[arc.from].label == weak_label {
                Some(arc.from)
            } else {
                None
            };

            if let Some(weak_node) = weak_node {
                self.nodes[strong_node].next_arc = i;
                let out = self.nodes[strong_node].out_of_tree.swap_remove(i);
                return Some((out, weak_node));
            }
            i += 1;
        }

        self.nodes[strong_node].next_arc = self.nodes[strong_node].out_of_tree.len();
        None
    }

    // skip children with another label; relabel once none is left
    fn check_children(&mut self, u: usize) {
        while self.nodes[u].next_scan != usize::MAX {
            let child = self.nodes[u].next_scan;
            if self.nodes[child].label == self.nodes[u].label {
                return;
            }
            self.nodes[u].next_scan = self.nodes[child].next_sibling;
        }

        self.label_count[self.nodes[u].label] -= 1;
        self.nodes[u].label += 1;
        self.label_count[self.nodes[u].label] += 1;
        self.stats.num_relabels += 1;

        self.nodes[u].next_arc = 0;
    }

    // hang `child` below `parent` through `new_arc`, reversing the path
    // from `child` up to its old root
    fn merge(&mut self, parent: usize, child: usize, new_arc: usize) {
        self.stats.num_mergers += 1;
        trace!("merging tree of {child} below {parent}");

        let (mut current, mut new_parent, mut new_arc) = (child, parent, new_arc);
        while !self.nodes[current].is_root() {
            let old_arc = self.nodes[current].arc_to_parent;
            self.nodes[current].arc_to_parent = new_arc;
            let old_parent = self.nodes[current].parent;
            self.break_relationship(old_parent, current);
            self.add_relationship(new_parent, current);

            new_parent = current;
            current = old_parent;
            new_arc = old_arc;
            self.arcs[new_arc].direction = self.arcs[new_arc].direction.flipped();
        }

        self.nodes[current].arc_to_parent = new_arc;
        self.add_relationship(new_parent, current);
    }

    // move the root's excess towards the root of the absorbing tree
    fn push_excess(&mut self, strong_root: usize) {
        let mut current = strong_root;
        let mut prev_excess = Flow::one();

        while self.nodes[current].excess > Flow::zero() && !self.nodes[current].is_root() {
            let parent = self.nodes[current].parent;
            prev_excess = self.nodes[parent].excess;

            let arc_to_parent = self.nodes[current].arc_to_parent;
            match self.arcs[arc_to_parent].direction {
                Direction::Forward => self.push_upward(arc_to_parent, current, parent),
                Direction::Backward => self.push_downward(arc_to_parent, current, parent),
            }
            current = parent;
        }

        if self.nodes[current].excess > Flow::zero() && prev_excess <= Flow::zero() {
            if self.config.is_lowest_label() {
                self.lowest_strong_label = self.nodes[current].label;
            }
            self.add_to_strong_bucket(current);
        }
    }

    fn push_upward(&mut self, arc_id: usize, child: usize, parent: usize) {
        self.stats.num_pushes += 1;

        let residual_capacity = self.arcs[arc_id].capacity - self.arcs[arc_id].flow;
        let excess = self.nodes[child].excess;
        if residual_capacity >= excess {
            self.nodes[parent].excess += excess;
            self.arcs[arc_id].flow += excess;
            self.nodes[child].excess = Flow::zero();
            return;
        }

        let arc = &mut self.arcs[arc_id];
        arc.direction = Direction::Backward;
        arc.flow = arc.capacity;
        self.nodes[parent].excess += residual_capacity;
        self.nodes[child].excess -= residual_capacity;
        self.split(arc_id, child, parent);
    }

    fn push_downward(&mut self, arc_id: usize, child: usize, parent: usize) {
        self.stats.num_pushes += 1;

        let flow = self.arcs[arc_id].flow;
        let excess = self.nodes[child].excess;
        if flow >= excess {
            self.nodes[parent].excess += excess;
            self.arcs[arc_id].flow -= excess;
            self.nodes[child].excess = Flow::zero();
            return;
        }

        let arc = &mut self.arcs[arc_id];
        arc.direction = Direction::Forward;
        arc.flow = Flow::zero();
        self.nodes[parent].excess += flow;
        self.nodes[child].excess -= flow;
        self.split(arc_id, child, parent);
    }

    // the saturated arc leaves the tree; the child keeps its excess as a new strong root
    fn split(&mut self, arc_id: usize, child: usize, parent: usize) {
        self.nodes[parent].out_of_tree.push(arc_id);
        self.break_relationship(parent, child);
        self.nodes[child].arc_to_parent = usize::MAX;

        if self.config.is_lowest_label() {
            self.lowest_strong_label = self.nodes[child].label;
        }
        self.add_to_strong_bucket(child);
    }

    // everything in the tree ends up on the source side of the cut
    pub(crate) fn lift_all(&mut self, root: usize) {
        let mut current = root;
        self.nodes[current].next_scan = self.nodes[current].first_child;
        self.label_count[self.nodes[current].label] -= 1;
        self.nodes[current].label = self.num_nodes;

        while current != usize::MAX {
            while self.nodes[current].next_scan != usize::MAX {
                let child = self.nodes[current].next_scan;
                self.nodes[current].next_scan = self.nodes[child].next_sibling;
                current = child;
                self.nodes[current].next_scan = self.nodes[current].first_child;

                self.label_count[self.nodes[current].label] -= 1;
                self.nodes[current].label = self.num_nodes;
            }
            current = self.nodes[current].parent;
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::maximum_flow::graph::Graph;
    use crate::maximum_flow::pseudo_flow::config::{Config, RootSelection};
    use crate::maximum_flow::pseudo_flow::network::{Direction, PseudoFlowNetwork};

    #[test]
    fn merge_reverses_path_to_old_root() {
        // chain 1 - 2 - 3 forms one tree rooted at 3, node 4 is the weak node
        let mut graph = Graph::default();
        graph.add_nodes(6);
        graph.add_directed_edge(1, 2, 5);
        graph.add_directed_edge(2, 3, 5);
        graph.add_directed_edge(1, 4, 5);

        let mut network = PseudoFlowNetwork::build(&graph, 0, 5, Config::default());
        network.nodes[1].out_of_tree.clear();
        network.nodes[2].out_of_tree.clear();
        network.add_relationship(2, 1);
        network.nodes[1].arc_to_parent = 0;
        network.add_relationship(3, 2);
        network.nodes[2].arc_to_parent = 1;

        network.merge(4, 1, 2);

        assert_eq!(network.nodes[1].parent, 4);
        assert_eq!(network.nodes[2].parent, 1);
        assert_eq!(network.nodes[3].parent, 2);
        assert_eq!(network.nodes[1].arc_to_parent, 2);
        assert_eq!(network.nodes[2].arc_to_parent, 0);
        assert_eq!(network.nodes[3].arc_to_parent, 1);
        assert_eq!(network.arcs[0].direction, Direction::Backward);
        assert_eq!(network.arcs[1].direction, Direction::Backward);
        assert_eq!(network.arcs[2].direction, Direction::Forward);
        assert_eq!(network.nodes[4].first_child, 1);
        assert_eq!(network.nodes[3].first_child, usize::MAX);
        assert_eq!(network.stats.num_mergers, 1);
    }

    #[test]
    fn saturated_push_splits_tree() {
        // 1 carries 10 units but 1 -> 2 only takes 4
        let mut graph = Graph::default();
        graph.add_nodes(4);
        graph.add_directed_edge(0, 1, 10);
        graph.add_directed_edge(1, 2, 4);
        graph.add_directed_edge(2, 3, 6);

        let config = Config::default().with_root_selection(RootSelection::LowestLabel);
        let mut network = PseudoFlowNetwork::build(&graph, 0, 3, config);
        network.simple_initialization();

        let root = network.next_strong_root().unwrap();
        assert_eq!(root, 1);
        network.process_root(root);

        assert_eq!(network.arcs[1].flow, 4);
        assert_eq!(network.arcs[1].direction, Direction::Backward);
        assert!(network.nodes[1].is_root());
        assert_eq!(network.nodes[1].excess, 6);
        assert_eq!(network.nodes[2].excess, -2);
        assert_eq!(network.nodes[2].out_of_tree, vec![1]);
        assert_eq!(network.strong_roots[1].front(), Some(&1));
        assert_eq!(network.lowest_strong_label, 1);
        assert_eq!(network.stats.num_pushes, 1);
    }

    #[test]
    fn relabels_tree_without_weak_neighbor() {
        // lifo picks node 2 first, and 2 has no out-of-tree arcs at all
        let mut graph = Graph::default();
        graph.add_nodes(5);
        graph.add_directed_edge(0, 1, 3);
        graph.add_directed_edge(0, 2, 3);
        graph.add_directed_edge(1, 2, 3);
        graph.add_directed_edge(3, 4, 1);

        let config = Config::default().with_root_selection(RootSelection::LowestLabel);
        let mut network = PseudoFlowNetwork::build(&graph, 0, 4, config);
        network.simple_initialization();
        assert_eq!(network.label_count[0], 1);

        let root = network.next_strong_root().unwrap();
        network.process_root(root);

        assert_eq!(network.nodes[root].label, 2);
        assert_eq!(network.label_count[1], 1);
        assert_eq!(network.label_count[2], 1);
        assert_eq!(network.strong_roots[2].front(), Some(&root));
        assert_eq!(network.stats.num_relabels, 1);
    }
}
