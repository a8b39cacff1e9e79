use serde::{Deserialize, Serialize};

/// Operation counters collected during one solve.
#[derive(Default, PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    pub num_pushes: usize,
    pub num_mergers: usize,
    pub num_relabels: usize,
    pub num_gaps: usize,
    pub num_arc_scans: usize,
}

impl Statistics {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
