use super::Classes;
use serde::{Deserialize, Deserializer, Serialize};

/// Flow direction of a probability tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TreeDirection {
    /// Root on the left, depth grows rightwards.
    #[default]
    Horizontal,
    /// Root on top, depth grows downwards.
    Vertical,
}

/// One node of a probability tree. `probability` labels the branch leading into the node.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TreeNode {
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub probability: Option<f64>,
    #[serde(default, deserialize_with = "children_or_null")]
    pub children: Vec<TreeNode>,
}

fn children_or_null<'de, D>(deserializer: D) -> Result<Vec<TreeNode>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<TreeNode>>::deserialize(deserializer)?.unwrap_or_default())
}

impl TreeNode {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    pub fn with_probability(mut self, p: f64) -> Self {
        self.probability = Some(p);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = TreeNode>) -> Self {
        self.children = children.into_iter().collect();
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Number of nodes in this subtree, including `self`.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::count).sum::<usize>()
    }
}

fn default_node_spacing() -> f64 {
    50.0
}

fn default_level_spacing() -> f64 {
    100.0
}

fn default_leaf_spacing() -> f64 {
    20.0
}

fn default_branch_classes() -> Classes {
    Classes::new(["stroke-base-content"])
}

fn default_branch_stroke_width() -> f64 {
    2.0
}

/// `nature: "probability_tree"`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbabilityTreeSpec {
    pub data: TreeNode,
    #[serde(default)]
    pub direction: TreeDirection,
    /// Gap between sibling subtrees along the cross axis.
    #[serde(default = "default_node_spacing")]
    pub node_spacing: f64,
    /// Gap between a node's label room and its children along the depth axis.
    #[serde(default = "default_level_spacing")]
    pub level_spacing: f64,
    /// Room reserved after each node for its label; also the global margin.
    #[serde(default = "default_leaf_spacing")]
    pub leaf_spacing: f64,
    #[serde(default = "default_branch_classes")]
    pub branch_classes: Classes,
    #[serde(default = "default_branch_stroke_width")]
    pub stroke_width: f64,
}

impl ProbabilityTreeSpec {
    pub fn new(data: TreeNode) -> Self {
        Self {
            data,
            direction: TreeDirection::default(),
            node_spacing: default_node_spacing(),
            level_spacing: default_level_spacing(),
            leaf_spacing: default_leaf_spacing(),
            branch_classes: default_branch_classes(),
            stroke_width: default_branch_stroke_width(),
        }
    }
}
