//! Pruning & compression walk
//!
//! A single pre-order traversal shared by every export format. For each node
//! below the root it decides whether the node is drawn, elided (single-child
//! corridor left behind by pruning) or dropped (never reached by a training
//! instance), hands out node ids, and drives a [`TreeEncoder`].
use crate::constants::{FIRST_CHILD_ID, ROOT_ID};
use crate::errors::ExportError;
use crate::export::ExportFormat;
use crate::node::{Branch, ClassificationNode};
use log::debug;

/// What happens to a node reached during the walk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WalkDecision {
    /// Draw the node with the next id.
    Emit,
    /// Skip the node and attach its only surviving child to the current parent.
    ElideAndDescend,
    /// Skip the node and its whole subtree.
    Drop,
}

/// Decide the fate of a non-root node.
pub fn decide(node: &ClassificationNode, pruning: bool) -> WalkDecision {
    if !pruning {
        return WalkDecision::Emit;
    }
    if !node.has_instances() {
        return WalkDecision::Drop;
    }
    match node {
        ClassificationNode::Leaf { .. } => WalkDecision::Emit,
        ClassificationNode::Internal { branches, .. } => {
            let survivors = branches.iter().filter(|b| b.child.has_instances()).count();
            if survivors == 1 {
                WalkDecision::ElideAndDescend
            } else {
                WalkDecision::Emit
            }
        }
    }
}

/// A node the walk decided to draw.
#[derive(Debug, Clone, Copy)]
pub struct Visit<'a> {
    pub id: usize,
    /// Id of the nearest drawn ancestor, `None` for the root.
    pub parent_id: Option<usize>,
    /// Raw description of the last hop leading to this node, `None` for the root.
    pub edge_label: Option<&'a str>,
    pub node: &'a ClassificationNode,
}

/// Format specific renderer fed by [`walk`] in pre-order.
pub trait TreeEncoder {
    fn format(&self) -> ExportFormat;

    /// Draw a node, and the edge from its parent when it has one.
    fn emit(&mut self, visit: &Visit<'_>) -> Result<(), ExportError>;

    /// Called after all children of a drawn internal node have been walked.
    fn close(&mut self, _id: usize) -> Result<(), ExportError> {
        Ok(())
    }
}

/// Counts collected during one walk.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ExportSummary {
    pub nodes: usize,
    pub edges: usize,
    pub elided: usize,
    pub dropped: usize,
}

/// Walk the tree below `root`, feeding every drawn node to `encoder`.
///
/// The root is always drawn with id 0; ids of the other drawn nodes follow in
/// pre-order starting at 1. With `pruning` disabled every node is drawn.
pub fn walk<E: TreeEncoder>(
    root: &ClassificationNode,
    pruning: bool,
    encoder: &mut E,
) -> Result<ExportSummary, ExportError> {
    let mut walker = Walker {
        encoder,
        pruning,
        next_id: FIRST_CHILD_ID,
        last_emitted: ROOT_ID,
        summary: ExportSummary::default(),
    };
    walker.check_branches(root)?;
    walker.encoder.emit(&Visit {
        id: ROOT_ID,
        parent_id: None,
        edge_label: None,
        node: root,
    })?;
    walker.summary.nodes += 1;
    if !root.is_leaf() {
        walker.walk_children(root, ROOT_ID)?;
        walker.encoder.close(ROOT_ID)?;
    }
    Ok(walker.summary)
}

struct Walker<'e, E: TreeEncoder> {
    encoder: &'e mut E,
    pruning: bool,
    // Per-call id counter, never shared between exports.
    next_id: usize,
    last_emitted: usize,
    summary: ExportSummary,
}

impl<'e, E: TreeEncoder> Walker<'e, E> {
    fn walk_children(&mut self, node: &ClassificationNode, parent_id: usize) -> Result<(), ExportError> {
        for branch in node.branches() {
            self.visit(branch, parent_id)?;
        }
        Ok(())
    }

    fn visit(&mut self, branch: &Branch, parent_id: usize) -> Result<(), ExportError> {
        let child = &branch.child;

        match decide(child, self.pruning) {
            WalkDecision::Drop => {
                let size = subtree_size(child);
                debug!("dropping '{}' under N{} ({} nodes)", child.label(), parent_id, size);
                self.summary.dropped += size;
            }
            WalkDecision::ElideAndDescend => {
                debug!("eliding '{}' under N{}", child.label(), parent_id);
                self.summary.elided += 1;
                for b in child.branches() {
                    if b.child.has_instances() {
                        self.visit(b, parent_id)?;
                    } else {
                        self.summary.dropped += subtree_size(&b.child);
                    }
                }
            }
            WalkDecision::Emit => {
                let id = self.next_id;
                self.next_id += 1;
                self.encoder.emit(&Visit {
                    id,
                    parent_id: Some(parent_id),
                    edge_label: Some(branch.edge_description.as_str()),
                    node: child,
                })?;
                self.last_emitted = id;
                self.summary.nodes += 1;
                self.summary.edges += 1;
                if !child.is_leaf() {
                    self.walk_children(child, id)?;
                    self.encoder.close(id)?;
                }
            }
        }
        Ok(())
    }

    /// Reject internal nodes without branches anywhere in the tree, pruned or not.
    fn check_branches(&self, node: &ClassificationNode) -> Result<(), ExportError> {
        if !node.is_leaf() && node.branches().is_empty() {
            return Err(ExportError::MalformedTreeInput {
                format: self.encoder.format(),
                node: self.last_emitted,
                reason: format!("internal node '{}' has no branches", node.label()),
            });
        }
        for b in node.branches() {
            self.check_branches(&b.child)?;
        }
        Ok(())
    }
}

fn subtree_size(node: &ClassificationNode) -> usize {
    1 + node.branches().iter().map(|b| subtree_size(&b.child)).sum::<usize>()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// (id, parent, edge label, node label)
    type Record = (usize, Option<usize>, Option<String>, String);

    #[derive(Default)]
    pub(crate) struct Recorder {
        pub visits: Vec<Record>,
        pub closed: Vec<usize>,
    }

    impl TreeEncoder for Recorder {
        fn format(&self) -> ExportFormat {
            ExportFormat::Dot
        }

        fn emit(&mut self, visit: &Visit<'_>) -> Result<(), ExportError> {
            self.visits.push((
                visit.id,
                visit.parent_id,
                visit.edge_label.map(|s| s.to_string()),
                visit.node.label().to_string(),
            ));
            Ok(())
        }

        fn close(&mut self, id: usize) -> Result<(), ExportError> {
            self.closed.push(id);
            Ok(())
        }
    }

    pub(crate) fn leaf(label: &str, count: f64) -> ClassificationNode {
        ClassificationNode::leaf(label, count)
    }

    pub(crate) fn split(label: &str, count: f64, branches: Vec<(&str, ClassificationNode)>) -> ClassificationNode {
        ClassificationNode::internal(
            label,
            count,
            branches.into_iter().map(|(e, c)| Branch::new(e, c)).collect(),
        )
    }

    /// Root -> X -> Y -> {L1, L2}, with zero-count siblings along the corridor.
    pub(crate) fn corridor() -> ClassificationNode {
        split(
            "R",
            10.0,
            vec![
                (
                    "r = x",
                    split(
                        "X",
                        10.0,
                        vec![
                            (
                                "x = y",
                                split("Y", 10.0, vec![("y = 1", leaf("L1", 6.0)), ("y = 2", leaf("L2", 4.0))]),
                            ),
                            ("x = w", leaf("W", 0.0)),
                        ],
                    ),
                ),
                ("r = z", leaf("Z", 0.0)),
            ],
        )
    }

    fn run(root: &ClassificationNode, pruning: bool) -> (Recorder, ExportSummary) {
        let mut recorder = Recorder::default();
        let summary = walk(root, pruning, &mut recorder).unwrap();
        (recorder, summary)
    }

    #[test]
    fn test_decide() {
        assert_eq!(decide(&leaf("a", 0.0), false), WalkDecision::Emit);
        assert_eq!(decide(&leaf("a", 0.0), true), WalkDecision::Drop);
        assert_eq!(decide(&leaf("a", 0.5), true), WalkDecision::Emit);
        let one = split("s", 2.0, vec![("a", leaf("a", 2.0)), ("b", leaf("b", 0.0))]);
        assert_eq!(decide(&one, true), WalkDecision::ElideAndDescend);
        assert_eq!(decide(&one, false), WalkDecision::Emit);
        let two = split("s", 2.0, vec![("a", leaf("a", 1.0)), ("b", leaf("b", 1.0))]);
        assert_eq!(decide(&two, true), WalkDecision::Emit);
        let none = split("s", 2.0, vec![("a", leaf("a", 0.0)), ("b", leaf("b", 0.0))]);
        assert_eq!(decide(&none, true), WalkDecision::Emit);
    }

    #[test]
    fn test_ids_without_pruning() {
        let root = corridor();
        let (recorder, summary) = run(&root, false);
        let ids: Vec<usize> = recorder.visits.iter().map(|v| v.0).collect();
        assert_eq!(ids, (0..7).collect::<Vec<usize>>());
        let labels: Vec<&str> = recorder.visits.iter().map(|v| v.3.as_str()).collect();
        assert_eq!(labels, vec!["R", "X", "Y", "L1", "L2", "W", "Z"]);
        assert_eq!(summary.nodes, 7);
        assert_eq!(summary.edges, 6);
        assert_eq!(summary.elided, 0);
        assert_eq!(summary.dropped, 0);
        assert_eq!(recorder.closed, vec![2, 1, 0]);
    }

    #[test]
    fn test_pruning_drops_unreached_leaf() {
        let root = split("A", 5.0, vec![("A=yes", leaf("play", 5.0)), ("A=no", leaf("no", 0.0))]);
        let (recorder, summary) = run(&root, true);
        assert_eq!(
            recorder.visits,
            vec![
                (0, None, None, "A".to_string()),
                (1, Some(0), Some("A=yes".to_string()), "play".to_string()),
            ]
        );
        assert_eq!(summary.edges, 1);
        assert_eq!(summary.dropped, 1);
    }

    #[test]
    fn test_compression_of_corridor() {
        let root = corridor();
        let (recorder, summary) = run(&root, true);
        assert_eq!(
            recorder.visits,
            vec![
                (0, None, None, "R".to_string()),
                (1, Some(0), Some("x = y".to_string()), "Y".to_string()),
                (2, Some(1), Some("y = 1".to_string()), "L1".to_string()),
                (3, Some(1), Some("y = 2".to_string()), "L2".to_string()),
            ]
        );
        assert_eq!(summary.elided, 1);
        assert_eq!(summary.dropped, 2);
        assert_eq!(summary.edges, summary.nodes - 1);
        assert!(recorder.visits.iter().all(|v| v.2.as_deref() != Some("r = x")));
    }

    #[test]
    fn test_compression_chains() {
        // Three corridor nodes in a row ending on a leaf.
        let root = split(
            "R",
            3.0,
            vec![
                (
                    "a",
                    split(
                        "C1",
                        3.0,
                        vec![(
                            "b",
                            split("C2", 3.0, vec![("c", split("C3", 3.0, vec![("d", leaf("L", 3.0))]))]),
                        )],
                    ),
                ),
                ("e", leaf("M", 1.0)),
            ],
        );
        let (recorder, summary) = run(&root, true);
        let drawn: Vec<(usize, Option<usize>, Option<String>, String)> = recorder.visits;
        assert_eq!(drawn.len(), 3);
        assert_eq!(drawn[1], (1, Some(0), Some("d".to_string()), "L".to_string()));
        assert_eq!(drawn[2], (2, Some(0), Some("e".to_string()), "M".to_string()));
        assert_eq!(summary.elided, 3);
    }

    #[test]
    fn test_root_is_never_pruned() {
        let root = split("R", 0.0, vec![("a", leaf("A", 0.0)), ("b", leaf("B", 0.0))]);
        let (recorder, summary) = run(&root, true);
        assert_eq!(recorder.visits.len(), 1);
        assert_eq!(recorder.closed, vec![0]);
        assert_eq!(summary.nodes, 1);
        assert_eq!(summary.edges, 0);
        assert_eq!(summary.dropped, 2);

        // A root with a single survivor is drawn, not elided.
        let root = split("R", 1.0, vec![("a", leaf("A", 1.0)), ("b", leaf("B", 0.0))]);
        let (recorder, _) = run(&root, true);
        assert_eq!(recorder.visits.len(), 2);
        assert_eq!(recorder.visits[0].0, 0);
    }

    #[test]
    fn test_single_leaf_tree() {
        let (recorder, summary) = run(&leaf("yes", 0.0), true);
        assert_eq!(recorder.visits, vec![(0, None, None, "yes".to_string())]);
        assert!(recorder.closed.is_empty());
        assert_eq!(summary.edges, 0);
    }

    #[test]
    fn test_present_iff_count_positive() {
        let root = split(
            "R",
            9.0,
            vec![
                ("a", split("S", 5.0, vec![("a1", leaf("A1", 2.0)), ("a2", leaf("A2", 3.0))])),
                ("b", split("T", 0.0, vec![("b1", leaf("B1", 0.0)), ("b2", leaf("B2", 0.0))])),
                ("c", leaf("C", 4.0)),
                ("d", leaf("D", 0.0)),
            ],
        );
        let (recorder, _) = run(&root, true);
        let labels: Vec<&str> = recorder.visits.iter().map(|v| v.3.as_str()).collect();
        assert_eq!(labels, vec!["R", "S", "A1", "A2", "C"]);
    }

    #[test]
    fn test_malformed_internal_node() {
        let root = split("R", 1.0, vec![("a", split("Broken", 1.0, vec![]))]);
        let mut recorder = Recorder::default();
        let err = walk(&root, false, &mut recorder).unwrap_err();
        match err {
            ExportError::MalformedTreeInput { format, node, reason } => {
                assert_eq!(format, ExportFormat::Dot);
                assert_eq!(node, 0);
                assert!(reason.contains("Broken"));
            }
            e => panic!("unexpected error {}", e),
        }
    }

    #[test]
    fn test_malformed_node_fails_regardless_of_pruning() {
        // Zero-count broken sibling under an elided node.
        let elided_sibling = split(
            "R",
            1.0,
            vec![
                (
                    "a",
                    split("S", 1.0, vec![("s1", leaf("A", 1.0)), ("s2", split("Broken", 0.0, vec![]))]),
                ),
                ("b", leaf("B", 1.0)),
            ],
        );
        // Broken node deep inside a dropped subtree.
        let dropped_subtree = split(
            "R",
            1.0,
            vec![
                ("a", leaf("A", 1.0)),
                ("b", split("T", 0.0, vec![("t", split("Broken", 0.0, vec![]))])),
            ],
        );
        for root in [elided_sibling, dropped_subtree] {
            for pruning in [false, true] {
                let mut recorder = Recorder::default();
                let err = walk(&root, pruning, &mut recorder).unwrap_err();
                assert!(matches!(err, ExportError::MalformedTreeInput { node: 0, .. }));
                assert!(recorder.visits.is_empty());
            }
        }
    }
}
