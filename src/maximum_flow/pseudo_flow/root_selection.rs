use crate::maximum_flow::pseudo_flow::config::RootSelection;
use crate::maximum_flow::pseudo_flow::network::PseudoFlowNetwork;
use log::trace;
use num_traits::NumAssign;
use std::ops::Neg;

impl<Flow> PseudoFlowNetwork<Flow>
where
    Flow: NumAssign + Neg<Output = Flow> + Ord + Copy,
{
    // None ends phase one
    pub(crate) fn next_strong_root(&mut self) -> Option<usize> {
        match self.config.root_selection {
            RootSelection::LowestLabel => self.get_lowest_strong_root(),
            RootSelection::HighestLabel => self.get_highest_strong_root(),
        }
    }

    fn get_lowest_strong_root(&mut self) -> Option<usize> {
        if self.lowest_strong_label == 0 {
            self.promote_label_zero_roots();
            self.lowest_strong_label = 1;
        }

        for i in self.lowest_strong_label..self.num_nodes {
            if self.strong_roots[i].is_empty() {
                continue;
            }
            self.lowest_strong_label = i;

            if self.label_count[i - 1] == 0 {
                self.stats.num_gaps += 1;
                trace!("gap below label {i}");
                return None;
            }
            return self.strong_roots[i].pop_front();
        }

        self.lowest_strong_label = self.num_nodes;
        None
    }

    fn get_highest_strong_root(&mut self) -> Option<usize> {
        for i in (1..=self.highest_strong_label).rev() {
            if self.strong_roots[i].is_empty() {
                continue;
            }
            self.highest_strong_label = i;

            if self.label_count[i - 1] > 0 {
                return self.strong_roots[i].pop_front();
            }

            // nothing below can be reached any more
            while let Some(strong_root) = self.strong_roots[i].pop_front() {
                self.stats.num_gaps += 1;
                trace!("gap below label {i}, lifting tree of {strong_root}");
                self.lift_all(strong_root);
            }
        }

        if self.strong_roots[0].is_empty() {
            return None;
        }

        self.promote_label_zero_roots();
        self.highest_strong_label = 1;
        self.strong_roots[1].pop_front()
    }

    // roots that gained excess at label 0 restart at label 1
    fn promote_label_zero_roots(&mut self) {
        while let Some(strong_root) = self.strong_roots[0].pop_front() {
            self.nodes[strong_root].label = 1;
            self.label_count[0] -= 1;
            self.label_count[1] += 1;
            self.stats.num_relabels += 1;

            self.add_to_strong_bucket(strong_root);
        }
    }
}
