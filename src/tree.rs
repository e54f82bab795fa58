use crate::config::JsonIO;
use crate::errors::ExportError;
use crate::node::{Branch, ClassificationNode};
use serde::{Deserialize, Serialize};
use std::fmt::{self, Display};

/// A trained classification tree, as handed over by the tree builder.
#[derive(Deserialize, Serialize, Clone, Debug, PartialEq)]
pub struct ClassificationTree {
    pub root: ClassificationNode,
}

impl ClassificationTree {
    pub fn new(root: ClassificationNode) -> Self {
        ClassificationTree { root }
    }

    pub fn num_nodes(&self) -> usize {
        self.preorder().count()
    }

    pub fn num_leaves(&self) -> usize {
        self.preorder().filter(|(_, n)| n.is_leaf()).count()
    }

    /// Number of nodes on the longest root-to-leaf path.
    pub fn depth(&self) -> usize {
        self.preorder().map(|(d, _)| d + 1).max().unwrap_or(0)
    }

    /// Pre-order traversal yielding `(depth, node)` pairs.
    pub fn preorder(&self) -> PreOrder<'_> {
        PreOrder {
            stack: vec![(0, &self.root)],
        }
    }

    /// Check the structural invariants the exporters rely on.
    ///
    /// Returns the reason of the first violation found, in pre-order.
    pub fn check_structure(&self) -> Result<(), String> {
        for (depth, node) in self.preorder() {
            let count = node.weighted_count();
            if !count.is_finite() || count < 0.0 {
                return Err(format!(
                    "node '{}' at depth {} has invalid weighted count {}",
                    node.label(),
                    depth,
                    count
                ));
            }
            if !node.is_leaf() && node.branches().is_empty() {
                return Err(format!(
                    "internal node '{}' at depth {} has no branches",
                    node.label(),
                    depth
                ));
            }
        }
        Ok(())
    }
}

pub struct PreOrder<'a> {
    stack: Vec<(usize, &'a ClassificationNode)>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = (usize, &'a ClassificationNode);

    fn next(&mut self) -> Option<Self::Item> {
        let (depth, node) = self.stack.pop()?;
        // Reverse so the first branch is visited first.
        for Branch { child, .. } in node.branches().iter().rev() {
            self.stack.push((depth + 1, child));
        }
        Some((depth, node))
    }
}

impl JsonIO for ClassificationTree {
    fn from_json(json_str: &str) -> Result<Self, ExportError> {
        let tree = serde_json::from_str::<Self>(json_str).map_err(|e| ExportError::UnableToRead(e.to_string()))?;
        tree.check_structure().map_err(ExportError::UnableToRead)?;
        Ok(tree)
    }
}

impl Display for ClassificationTree {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut print_buffer: Vec<(usize, Option<&str>, &ClassificationNode)> = vec![(0, None, &self.root)];
        let mut r = String::new();
        while let Some((depth, edge, node)) = print_buffer.pop() {
            let indent = "      ".repeat(depth);
            match edge {
                Some(e) => r += format!("{}{} -> {}\n", indent, e.trim(), node).as_str(),
                None => r += format!("{}{}\n", indent, node).as_str(),
            }
            for b in node.branches().iter().rev() {
                print_buffer.push((depth + 1, Some(b.edge_description.as_str()), &b.child));
            }
        }
        write!(f, "{}", r)
    }
}
