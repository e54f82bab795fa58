use crate::errors::ExportError;
use crate::export::xml::{Document, Element};
use crate::export::ExportFormat;
use crate::sanitize::restore_placeholder;
use crate::walker::{TreeEncoder, Visit};

const NAMESPACES: [(&str, &str); 9] = [
    ("xmlns", "http://graphml.graphdrawing.org/xmlns"),
    ("xmlns:java", "http://www.yworks.com/xml/yfiles-common/1.0/java"),
    ("xmlns:sys", "http://www.yworks.com/xml/yfiles-common/markup/primitives/2.0"),
    ("xmlns:bpmn", "http://www.yworks.com/xml/yfiles-for-html/bpmn/2.0"),
    ("xmlns:x", "http://www.yworks.com/xml/yfiles-common/markup/2.0"),
    ("xmlns:xsi", "http://www.w3.org/2001/XMLSchema-instance"),
    ("xmlns:y", "http://www.yworks.com/xml/graphml"),
    ("xmlns:yed", "http://www.yworks.com/xml/yed/3"),
    (
        "xsi:schemaLocation",
        "http://graphml.graphdrawing.org/xmlns http://www.yworks.com/xml/schema/graphml/1.1/ygraphml.xsd",
    ),
];

/// Key of the yEd node graphics.
pub const NODE_LABEL_KEY: &str = "d6";
/// Key of the yEd edge graphics.
pub const EDGE_LABEL_KEY: &str = "d10";
/// Key of the plain GraphML description, valid on every element.
pub const DESC_KEY: &str = "desc";

/// GraphML renderer targeting yEd.
///
/// Every label is written twice: once as a yEd label and once as a plain
/// `desc` data element, so that editors without the yEd extensions still show it.
pub struct GraphMLEncoder {
    root: Element,
    graph: Element,
    restore_placeholder: bool,
}

impl GraphMLEncoder {
    pub fn new(restore_placeholder: bool) -> Self {
        let mut root = Element::new("graphml");
        for (k, v) in NAMESPACES {
            root.set_attribute(k, v);
        }
        root.append(
            Element::new("key")
                .with_attribute("id", "d7")
                .with_attribute("for", "graphml")
                .with_attribute("yfiles.type", "resources"),
        );
        root.append(
            Element::new("key")
                .with_attribute("id", DESC_KEY)
                .with_attribute("for", "all")
                .with_attribute("attr.name", "description"),
        );
        root.append(
            Element::new("key")
                .with_attribute("id", NODE_LABEL_KEY)
                .with_attribute("for", "node")
                .with_attribute("yfiles.type", "nodegraphics"),
        );
        root.append(
            Element::new("key")
                .with_attribute("id", EDGE_LABEL_KEY)
                .with_attribute("for", "edge")
                .with_attribute("yfiles.type", "edgegraphics"),
        );
        GraphMLEncoder {
            root,
            graph: Element::new("graph").with_attribute("edgedefault", "directed"),
            restore_placeholder,
        }
    }

    /// Attach the graph to the document and serialize it.
    pub fn finish(self) -> String {
        self.document().to_xml_string()
    }

    pub fn document(self) -> Document {
        Document::new(self.root.with_child(self.graph))
    }
}

fn description(text: &str) -> Element {
    Element::new("data").with_attribute("key", DESC_KEY).with_text(text)
}

impl TreeEncoder for GraphMLEncoder {
    fn format(&self) -> ExportFormat {
        ExportFormat::GraphML
    }

    fn emit(&mut self, visit: &Visit<'_>) -> Result<(), ExportError> {
        let label = visit.node.label();
        let id = visit.id.to_string();
        self.graph.append(
            Element::new("node")
                .with_attribute("id", &id)
                .with_child(
                    Element::new("data")
                        .with_attribute("key", NODE_LABEL_KEY)
                        .with_child(Element::new("y:ShapeNode").with_child(Element::new("y:NodeLabel").with_text(label))),
                )
                .with_child(description(label)),
        );

        if let (Some(parent_id), Some(edge)) = (visit.parent_id, visit.edge_label) {
            let mut text = edge.trim().to_string();
            if self.restore_placeholder {
                text = restore_placeholder(&text).into_owned();
            }
            self.graph.append(
                Element::new("edge")
                    .with_attribute("id", &format!("e{}", id))
                    .with_attribute("source", &parent_id.to_string())
                    .with_attribute("target", &id)
                    .with_child(
                        Element::new("data").with_attribute("key", EDGE_LABEL_KEY).with_child(
                            Element::new("y:PolyLineEdge").with_child(Element::new("y:EdgeLabel").with_text(&text)),
                        ),
                    )
                    .with_child(description(&text)),
            );
        }
        Ok(())
    }
}
