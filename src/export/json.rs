use crate::constants::EDGE_VALUE_PREFIX;
use crate::errors::ExportError;
use crate::export::ExportFormat;
use crate::sanitize::{escape_json, restore_placeholder};
use crate::walker::{TreeEncoder, Visit};

/// JSON renderer producing the nested `label`/`edgeLabel`/`children` tree read
/// by the chatbot builder.
pub struct JsonEncoder {
    text: String,
    restore_placeholder: bool,
    // One entry per open `children` array: true until its first element is written.
    first_child: Vec<bool>,
}

impl JsonEncoder {
    pub fn new(restore_placeholder: bool) -> Self {
        JsonEncoder {
            text: String::new(),
            restore_placeholder,
            first_child: Vec::new(),
        }
    }

    pub fn finish(mut self) -> String {
        self.text.push('\n');
        self.text
    }

    fn edge_label(&self, edge: &str) -> String {
        let mut label = escape_json(edge.trim());
        if self.restore_placeholder {
            label = restore_placeholder(&label).into_owned();
        }
        match label.strip_prefix(EDGE_VALUE_PREFIX) {
            Some(value) => value.to_string(),
            None => label,
        }
    }
}

impl TreeEncoder for JsonEncoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::Json
    }

    fn emit(&mut self, visit: &Visit<'_>) -> Result<(), ExportError> {
        if let Some(edge) = visit.edge_label {
            let opening = match self.first_child.last_mut() {
                Some(first) if !*first => ",{",
                Some(first) => {
                    *first = false;
                    "{"
                }
                None => "{",
            };
            self.text.push_str(opening);
            let label = self.edge_label(edge);
            self.text += format!("\"edgeLabel\":\"{}\",", label).as_str();
        } else {
            self.text.push('{');
        }

        self.text += format!("\"label\":\"{}\"", escape_json(visit.node.label())).as_str();
        if visit.node.is_leaf() {
            self.text.push('}');
        } else {
            self.text.push_str(",\"children\":[");
            self.first_child.push(true);
        }
        Ok(())
    }

    fn close(&mut self, _id: usize) -> Result<(), ExportError> {
        self.first_child.pop();
        self.text.push_str("]}");
        Ok(())
    }
}
