use serde::{Deserialize, Serialize};

/// Which strong root is processed next.
#[derive(Default, PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum RootSelection {
    /// Process the root with the lowest label first.
    LowestLabel,
    /// Process the root with the highest label first; gaps lift whole trees.
    #[default]
    HighestLabel,
}

/// Insertion order among roots sharing a label.
#[derive(Default, PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize)]
pub enum BucketOrder {
    Fifo,
    #[default]
    Lifo,
}

#[derive(Default, PartialEq, Eq, Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    pub root_selection: RootSelection,
    pub bucket_order: BucketOrder,
}

impl Config {
    pub fn with_root_selection(mut self, root_selection: RootSelection) -> Self {
        self.root_selection = root_selection;
        self
    }

    pub fn with_bucket_order(mut self, bucket_order: BucketOrder) -> Self {
        self.bucket_order = bucket_order;
        self
    }

    #[inline]
    pub fn is_lowest_label(&self) -> bool {
        self.root_selection == RootSelection::LowestLabel
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Missing keys fall back to the defaults.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}
