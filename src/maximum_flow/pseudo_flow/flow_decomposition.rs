use crate::maximum_flow::pseudo_flow::network::PseudoFlowNetwork;
use log::{debug, error};
use num_traits::NumAssign;
use std::ops::Neg;

impl<Flow> PseudoFlowNetwork<Flow>
where
    Flow: NumAssign + Neg<Output = Flow> + Ord + Copy,
{
    // turn the maximum preflow into a flow:
    // deficits give back sink capacity, excesses travel back to the source
    pub(crate) fn recover_flow(&mut self) {
        self.settle_sink_deficits();
        self.prepare_decomposition();
        self.decompose_excess();
    }

    fn settle_sink_deficits(&mut self) {
        let sink = self.sink;
        for i in 0..self.nodes[sink].out_of_tree.len() {
            let arc_id = self.nodes[sink].out_of_tree[i];
            let from = self.arcs[arc_id].from;
            let excess = self.nodes[from].excess;
            if excess >= Flow::zero() {
                continue;
            }

            let flow = self.arcs[arc_id].flow;
            if excess + flow < Flow::zero() {
                self.nodes[from].excess += flow;
                self.arcs[arc_id].flow = Flow::zero();
            } else {
                self.arcs[arc_id].flow = excess + flow;
                self.nodes[from].excess = Flow::zero();
            }
        }
    }

    // afterwards the out-of-tree set of every non-terminal node holds exactly
    // its incoming arcs with positive flow, largest flow first
    fn prepare_decomposition(&mut self) {
        let (source, sink) = (self.source, self.sink);

        for i in 0..self.nodes[source].out_of_tree.len() {
            let arc_id = self.nodes[source].out_of_tree[i];
            let to = self.arcs[arc_id].to;
            self.nodes[to].out_of_tree.push(arc_id);
        }

        self.nodes[source].excess = Flow::zero();
        self.nodes[sink].excess = Flow::zero();

        for u in 0..self.num_nodes {
            if self.is_terminal(u) || self.nodes[u].is_root() {
                continue;
            }
            let arc_id = self.nodes[u].arc_to_parent;
            if self.arcs[arc_id].flow != Flow::zero() {
                let to = self.arcs[arc_id].to;
                self.nodes[to].out_of_tree.push(arc_id);
            }
        }

        for u in 0..self.num_nodes {
            if self.is_terminal(u) {
                continue;
            }
            let arcs = &self.arcs;
            let node = &mut self.nodes[u];
            node.next_arc = 0;
            node.out_of_tree.retain(|&arc_id| arcs[arc_id].to == u && arcs[arc_id].flow > Flow::zero());
            quick_sort(&mut node.out_of_tree, &|arc_id: usize| arcs[arc_id].flow);
        }
    }

    pub(crate) fn decompose_excess(&mut self) {
        let mut iteration = 1;
        let mut num_decompositions = 0_usize;

        for u in 0..self.num_nodes {
            while self.nodes[u].excess > Flow::zero() {
                iteration += 1;
                if !self.decompose(u, &mut iteration) {
                    error!("excess of node {u} cannot be traced back to the source");
                    break;
                }
                num_decompositions += 1;
            }
        }
        debug!("flow decomposition finished after {num_decompositions} paths and cycles");
    }

    #[inline]
    fn incoming_arc(&self, u: usize) -> Option<usize> {
        let node = &self.nodes[u];
        node.out_of_tree.get(node.next_arc).copied().filter(|&arc_id| self.arcs[arc_id].to == u && self.arcs[arc_id].flow > Flow::zero())
    }

    #[inline]
    fn current_arc(&self, u: usize) -> usize {
        self.nodes[u].out_of_tree[self.nodes[u].next_arc]
    }

    // follow the largest incoming flow backwards from `excess_node`.
    // reaching the source returns excess along that path; revisiting a
    // node cancels the flow cycle found instead
    fn decompose(&mut self, excess_node: usize, iteration: &mut usize) -> bool {
        let source = self.source;
        let mut current = excess_node;
        let mut bottleneck = self.nodes[excess_node].excess;

        while current != source && self.nodes[current].visited < *iteration {
            self.nodes[current].visited = *iteration;
            let Some(arc_id) = self.incoming_arc(current) else {
                return false;
            };
            bottleneck = bottleneck.min(self.arcs[arc_id].flow);
            current = self.arcs[arc_id].from;
        }

        if current == source {
            self.nodes[excess_node].excess -= bottleneck;

            let mut current = excess_node;
            while current != source {
                let arc_id = self.current_arc(current);
                self.cancel_flow(current, arc_id, bottleneck);
                current = self.arcs[arc_id].from;
            }
            return true;
        }

        *iteration += 1;

        let mut bottleneck = self.arcs[self.current_arc(current)].flow;
        while self.nodes[current].visited < *iteration {
            self.nodes[current].visited = *iteration;
            let arc_id = self.current_arc(current);
            bottleneck = bottleneck.min(self.arcs[arc_id].flow);
            current = self.arcs[arc_id].from;
        }

        *iteration += 1;

        while self.nodes[current].visited < *iteration {
            self.nodes[current].visited = *iteration;
            let arc_id = self.current_arc(current);
            self.cancel_flow(current, arc_id, bottleneck);
            current = self.arcs[arc_id].from;
        }
        true
    }

    // `arc_id` is the current arc of `u`
    fn cancel_flow(&mut self, u: usize, arc_id: usize, delta: Flow) {
        self.arcs[arc_id].flow -= delta;
        if self.arcs[arc_id].flow != Flow::zero() {
            self.minisort(u);
        } else {
            self.nodes[u].next_arc += 1;
        }
    }

    // sink the current arc of `u` to its place after its flow decreased
    fn minisort(&mut self, u: usize) {
        let arcs = &self.arcs;
        let node = &mut self.nodes[u];

        let moving = node.out_of_tree[node.next_arc];
        let flow = arcs[moving].flow;
        let mut i = node.next_arc + 1;
        while i < node.out_of_tree.len() && flow < arcs[node.out_of_tree[i]].flow {
            node.out_of_tree[i - 1] = node.out_of_tree[i];
            i += 1;
        }
        node.out_of_tree[i - 1] = moving;
    }
}

// descending order of flow, median-of-three pivot
fn quick_sort<Flow, F>(list: &mut [usize], flow: &F)
where
    Flow: Ord + Copy,
    F: Fn(usize) -> Flow,
{
    if list.len() <= 6 {
        bubble_sort(list, flow);
        return;
    }

    let (first, mid, last) = (0, (list.len() - 1) / 2, list.len() - 1);
    let (x1, x2, x3) = (flow(list[first]), flow(list[mid]), flow(list[last]));

    let mut pivot = mid;
    if x1 <= x2 {
        if x2 > x3 {
            pivot = if x1 <= x3 { last } else { first };
        }
    } else if x2 <= x3 {
        pivot = if x1 <= x3 { first } else { last };
    }

    list.swap(first, pivot);
    let pivot_flow = flow(list[first]);

    let (mut left, mut right) = (first + 1, last);
    while left < right {
        if flow(list[left]) < pivot_flow {
            list.swap(left, right);
            right -= 1;
        } else {
            left += 1;
        }
    }
    if flow(list[left]) < pivot_flow {
        left -= 1;
    }
    list.swap(first, left);

    let (head, tail) = list.split_at_mut(left);
    quick_sort(head, flow);
    quick_sort(&mut tail[1..], flow);
}

fn bubble_sort<Flow, F>(list: &mut [usize], flow: &F)
where
    Flow: Ord + Copy,
    F: Fn(usize) -> Flow,
{
    for i in (1..list.len()).rev() {
        let mut swapped = false;
        for j in 0..i {
            if flow(list[j]) < flow(list[j + 1]) {
                list.swap(j, j + 1);
                swapped = true;
            }
        }
        if !swapped {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::quick_sort;
    use crate::maximum_flow::graph::Graph;
    use crate::maximum_flow::pseudo_flow::config::{Config, RootSelection};
    use crate::maximum_flow::pseudo_flow::network::PseudoFlowNetwork;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;
    use rstest::rstest;

    #[rstest]
    #[case(vec![])]
    #[case(vec![3])]
    #[case(vec![1, 5, 2, 5, 0])]
    #[case(vec![9, 8, 7, 6, 5, 4, 3, 2, 1, 0])]
    #[case(vec![0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11])]
    #[case(vec![4, 4, 4, 4, 4, 4, 4, 4, 4])]
    #[case(vec![5, 9, 1, 0, 7, 7, 3, 2, 8, 1, 6])]
    fn quick_sort_orders_by_descending_flow(#[case] flows: Vec<i64>) {
        let mut list: Vec<usize> = (0..flows.len()).collect();
        quick_sort(&mut list, &|i: usize| flows[i]);

        let mut expected = flows.clone();
        expected.sort_by(|a, b| b.cmp(a));
        assert_eq!(list.iter().map(|&i| flows[i]).collect::<Vec<_>>(), expected);
    }

    #[test]
    fn quick_sort_random_lists() {
        let mut rng = Pcg64::seed_from_u64(7);
        for len in 0..80 {
            let flows: Vec<i64> = (0..len).map(|_| rng.random_range(0..20)).collect();
            let mut list: Vec<usize> = (0..len).collect();
            quick_sort(&mut list, &|i: usize| flows[i]);

            assert!(list.windows(2).all(|w| flows[w[0]] >= flows[w[1]]));
            let mut seen = list.clone();
            seen.sort();
            assert_eq!(seen, (0..len).collect::<Vec<_>>());
        }
    }

    #[test]
    fn cancels_flow_cycle_before_returning_excess() {
        // 1 -> 2 -> 3 -> 1 carries a circulation on top of the excess at 1 and 2
        let mut graph = Graph::default();
        graph.add_nodes(5);
        graph.add_directed_edge(0, 1, 5);
        graph.add_directed_edge(1, 2, 5);
        graph.add_directed_edge(2, 3, 5);
        graph.add_directed_edge(3, 1, 5);

        let mut network = PseudoFlowNetwork::build(&graph, 0, 4, Config::default());
        for u in 1..=3 {
            network.nodes[u].out_of_tree.clear();
        }
        for (arc_id, flow) in [(0, 2), (1, 5), (2, 4), (3, 4)] {
            network.arcs[arc_id].flow = flow;
        }
        network.nodes[2].out_of_tree.push(1);
        network.nodes[3].out_of_tree.push(2);
        network.nodes[1].out_of_tree.push(3);
        network.nodes[1].excess = 1;
        network.nodes[2].excess = 1;

        network.recover_flow();

        assert!(network.arcs.iter().all(|arc| arc.flow == 0));
        assert!(network.nodes.iter().all(|node| node.excess == 0));
    }

    #[rstest]
    fn decomposition_is_idempotent(#[values(RootSelection::LowestLabel, RootSelection::HighestLabel)] root_selection: RootSelection) {
        let mut graph = Graph::default();
        graph.add_nodes(6);
        for (from, to, upper) in [(0, 1, 9), (0, 2, 7), (1, 2, 4), (1, 3, 2), (2, 4, 3), (3, 1, 5), (4, 3, 6), (3, 5, 1), (4, 5, 2)] {
            graph.add_directed_edge(from, to, upper);
        }

        let mut network = PseudoFlowNetwork::build(&graph, 0, 5, Config::default().with_root_selection(root_selection));
        network.simple_initialization();
        network.flow_phase_one();
        network.recover_flow();
        let flows: Vec<i64> = network.arcs.iter().map(|arc| arc.flow).collect();

        network.recover_flow();
        assert_eq!(network.arcs.iter().map(|arc| arc.flow).collect::<Vec<_>>(), flows);
        assert!(network.nodes.iter().all(|node| node.excess == 0));
    }
}
