use serde::{Deserialize, Serialize};
use std::fmt;

/// Instances of the training data routed to a node.
#[derive(Deserialize, Serialize, Clone, Debug, Default, PartialEq)]
pub struct InstanceTable {
    pub relation: String,
    pub attributes: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl InstanceTable {
    pub fn new(relation: &str, attributes: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        InstanceTable {
            relation: relation.to_string(),
            attributes,
            rows,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl fmt::Display for InstanceTable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "@relation {}", self.relation)?;
        writeln!(f)?;
        for a in &self.attributes {
            writeln!(f, "@attribute {}", a)?;
        }
        writeln!(f)?;
        write!(f, "@data")?;
        for row in &self.rows {
            write!(f, "\n{}", row.join(","))?;
        }
        Ok(())
    }
}

/// A labelled edge from an internal node to one of its children.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct Branch {
    pub edge_description: String,
    pub child: ClassificationNode,
}

impl Branch {
    pub fn new(edge_description: &str, child: ClassificationNode) -> Self {
        Branch {
            edge_description: edge_description.to_string(),
            child,
        }
    }
}

/// A node of a trained classification tree.
///
/// `weighted_count` is the weighted number of training instances that reached
/// the node when the tree was built.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub enum ClassificationNode {
    Leaf {
        class_label: String,
        weighted_count: f64,
        #[serde(default)]
        training_data: Option<InstanceTable>,
    },
    Internal {
        split_description: String,
        weighted_count: f64,
        branches: Vec<Branch>,
        #[serde(default)]
        training_data: Option<InstanceTable>,
    },
}

impl ClassificationNode {
    pub fn leaf(class_label: &str, weighted_count: f64) -> Self {
        ClassificationNode::Leaf {
            class_label: class_label.to_string(),
            weighted_count,
            training_data: None,
        }
    }

    pub fn internal(split_description: &str, weighted_count: f64, branches: Vec<Branch>) -> Self {
        ClassificationNode::Internal {
            split_description: split_description.to_string(),
            weighted_count,
            branches,
            training_data: None,
        }
    }

    /// Attach the instances routed to this node.
    pub fn with_training_data(mut self, table: InstanceTable) -> Self {
        match &mut self {
            ClassificationNode::Leaf { training_data, .. } | ClassificationNode::Internal { training_data, .. } => {
                *training_data = Some(table)
            }
        }
        self
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, ClassificationNode::Leaf { .. })
    }

    /// Class label of a leaf, split description of an internal node.
    pub fn label(&self) -> &str {
        match self {
            ClassificationNode::Leaf { class_label, .. } => class_label,
            ClassificationNode::Internal { split_description, .. } => split_description,
        }
    }

    pub fn weighted_count(&self) -> f64 {
        match self {
            ClassificationNode::Leaf { weighted_count, .. } | ClassificationNode::Internal { weighted_count, .. } => {
                *weighted_count
            }
        }
    }

    /// A node is reached by the training data iff its count is strictly positive.
    pub fn has_instances(&self) -> bool {
        self.weighted_count() > 0.0
    }

    pub fn branches(&self) -> &[Branch] {
        match self {
            ClassificationNode::Leaf { .. } => &[],
            ClassificationNode::Internal { branches, .. } => branches,
        }
    }

    /// The instance table, only if it holds at least one row.
    pub fn training_data(&self) -> Option<&InstanceTable> {
        match self {
            ClassificationNode::Leaf { training_data, .. } | ClassificationNode::Internal { training_data, .. } => {
                training_data.as_ref().filter(|t| !t.is_empty())
            }
        }
    }
}

impl fmt::Display for ClassificationNode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ClassificationNode::Leaf {
                class_label,
                weighted_count,
                ..
            } => write!(f, "leaf={},count={}", class_label, weighted_count),
            ClassificationNode::Internal {
                split_description,
                weighted_count,
                branches,
                ..
            } => write!(
                f,
                "[{}] branches={},count={}",
                split_description,
                branches.len(),
                weighted_count
            ),
        }
    }
}
