/// Id of the root node in every export.
pub const ROOT_ID: usize = 0;
/// First id handed out to a non-root node.
pub const FIRST_CHILD_ID: usize = 1;
/// Edge description used upstream to mark an originally empty value.
pub const PLACEHOLDER_LABEL: &str = "= _";
/// What `PLACEHOLDER_LABEL` is rewritten to when restoring placeholders.
pub const RESTORED_LABEL: &str = " = ";
/// Prefix stripped from JSON edge labels.
pub const EDGE_VALUE_PREFIX: &str = "= ";
/// Name of the graph in DOT output.
pub const DOT_GRAPH_NAME: &str = "J48Tree";
/// Indentation step of the GraphML serializer.
pub const XML_INDENT: usize = 2;
