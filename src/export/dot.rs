use crate::constants::DOT_GRAPH_NAME;
use crate::errors::ExportError;
use crate::export::ExportFormat;
use crate::sanitize::{escape_dot, restore_placeholder};
use crate::walker::{TreeEncoder, Visit};

/// Graphviz DOT renderer.
///
/// Each drawn node becomes `N<id> [...]`, preceded by the `N<parent>->N<id>`
/// edge leading to it.
pub struct DotEncoder {
    text: String,
    restore_placeholder: bool,
}

impl DotEncoder {
    pub fn new(restore_placeholder: bool) -> Self {
        DotEncoder {
            text: format!("digraph {} {{\n", DOT_GRAPH_NAME),
            restore_placeholder,
        }
    }

    /// Close the graph and hand out the text.
    pub fn finish(mut self) -> String {
        self.text.push_str("}\n");
        self.text
    }

    fn edge_label(&self, edge: &str) -> String {
        let label = escape_dot(edge.trim());
        if self.restore_placeholder {
            restore_placeholder(&label).into_owned()
        } else {
            label
        }
    }
}

impl TreeEncoder for DotEncoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::Dot
    }

    fn emit(&mut self, visit: &Visit<'_>) -> Result<(), ExportError> {
        if let (Some(parent_id), Some(edge)) = (visit.parent_id, visit.edge_label) {
            let label = self.edge_label(edge);
            self.text += format!("N{}->N{} [label=\"{}\"]\n", parent_id, visit.id, label).as_str();
        }

        let node = visit.node;
        self.text += format!("N{} [label=\"{}\" ", visit.id, escape_dot(node.label())).as_str();
        if node.is_leaf() {
            self.text.push_str("shape=box style=filled ");
        }
        if let Some(data) = node.training_data() {
            self.text += format!(", data=\"{}\"", escape_dot(&data.to_string())).as_str();
        }
        self.text.push_str("]\n");
        Ok(())
    }
}
