//! Tree mutation engine
//!
//! Every operation takes the forest by value and hands back the forest that is
//! authoritative from then on. Lookups are depth-first over the owned tree; ids
//! are unique, so at most one node matches. An unknown id leaves the forest as
//! it was.

use tracing::{debug, instrument};

use crate::domain::id::IdGenerator;
use crate::domain::node::{Category, CostNode, NodeFields, NodeId};

/// Ordered root-level nodes. A document holds exactly one root.
pub type Forest = Vec<CostNode>;

/// Replace the editable fields of node `id`, keeping its children.
#[instrument(level = "debug", skip(forest, fields))]
pub fn update(mut forest: Forest, id: &NodeId, fields: &NodeFields) -> Forest {
    match find_mut(&mut forest, id) {
        Some(node) => {
            node.category = fields.category;
            node.description = fields.description.clone();
            node.amount = fields.amount;
            node.total = fields.total;
        }
        None => debug!("update: no node with id {}", id),
    }
    forest
}

/// Append a fresh leaf to the children of `parent_id`.
///
/// Returns the new forest and the id of the inserted node, `None` if the
/// parent does not exist.
#[instrument(level = "debug", skip(forest, ids))]
pub fn add_child(
    mut forest: Forest,
    parent_id: &NodeId,
    ids: &mut dyn IdGenerator,
    category: Category,
) -> (Forest, Option<NodeId>) {
    if !contains(&forest, parent_id) {
        debug!("add_child: no parent with id {}", parent_id);
        return (forest, None);
    }

    let mut id = ids.generate_id();
    while contains(&forest, &id) {
        debug!("add_child: id {} already taken, generating another", id);
        id = ids.generate_id();
    }

    if let Some(parent) = find_mut(&mut forest, parent_id) {
        parent.children.push(CostNode::leaf(id.clone(), category));
    }
    (forest, Some(id))
}

/// Remove node `id` together with its subtree.
///
/// Unconditional: callers must never pass the document root.
#[instrument(level = "debug", skip(forest))]
pub fn delete(mut forest: Forest, id: &NodeId) -> Forest {
    if !remove(&mut forest, id) {
        debug!("delete: no node with id {}", id);
    }
    forest
}

pub fn find<'a>(nodes: &'a [CostNode], id: &NodeId) -> Option<&'a CostNode> {
    for node in nodes {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = find(&node.children, id) {
            return Some(found);
        }
    }
    None
}

pub fn find_mut<'a>(nodes: &'a mut [CostNode], id: &NodeId) -> Option<&'a mut CostNode> {
    for node in nodes.iter_mut() {
        if &node.id == id {
            return Some(node);
        }
        if let Some(found) = find_mut(&mut node.children, id) {
            return Some(found);
        }
    }
    None
}

pub fn contains(nodes: &[CostNode], id: &NodeId) -> bool {
    find(nodes, id).is_some()
}

/// Distance from the forest's top level; roots are at depth 0.
pub fn depth_of(nodes: &[CostNode], id: &NodeId) -> Option<usize> {
    fn walk(nodes: &[CostNode], id: &NodeId, depth: usize) -> Option<usize> {
        for node in nodes {
            if &node.id == id {
                return Some(depth);
            }
            if let Some(found) = walk(&node.children, id, depth + 1) {
                return Some(found);
            }
        }
        None
    }
    walk(nodes, id, 0)
}

/// All ids in depth-first display order.
pub fn ids(nodes: &[CostNode]) -> Vec<NodeId> {
    let mut out = Vec::new();
    fn walk(nodes: &[CostNode], out: &mut Vec<NodeId>) {
        for node in nodes {
            out.push(node.id.clone());
            walk(&node.children, out);
        }
    }
    walk(nodes, &mut out);
    out
}

fn remove(nodes: &mut Vec<CostNode>, id: &NodeId) -> bool {
    if let Some(pos) = nodes.iter().position(|n| &n.id == id) {
        nodes.remove(pos);
        return true;
    }
    nodes.iter_mut().any(|n| remove(&mut n.children, id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::id::SequentialIds;

    fn node(id: &str, amount: f64, children: Vec<CostNode>) -> CostNode {
        CostNode {
            amount,
            children,
            ..CostNode::leaf(NodeId::from(id), Category::General)
        }
    }

    fn sample() -> Forest {
        vec![node(
            "root",
            0.0,
            vec![
                node("a", 0.0, vec![node("a1", 10.0, vec![]), node("a2", 20.0, vec![])]),
                node("b", 5.0, vec![]),
            ],
        )]
    }

    #[test]
    fn given_deep_id_when_updating_then_only_that_node_changes() {
        let before = sample();
        let mut fields = find(&before, &"a2".into()).unwrap().fields();
        fields.description = "rework".to_string();
        fields.amount = 22.5;

        let after = update(before.clone(), &"a2".into(), &fields);

        let a2 = find(&after, &"a2".into()).unwrap();
        assert_eq!(a2.description, "rework");
        assert_eq!(a2.amount, 22.5);
        assert_eq!(find(&after, &"a1".into()), find(&before, &"a1".into()));
        assert_eq!(find(&after, &"b".into()), find(&before, &"b".into()));
    }

    #[test]
    fn given_unknown_id_when_mutating_then_forest_unchanged() {
        let before = sample();
        let fields = before[0].fields();

        assert_eq!(update(before.clone(), &"zzz".into(), &fields), before);
        assert_eq!(delete(before.clone(), &"zzz".into()), before);

        let mut ids = SequentialIds::new();
        let (after, new_id) = add_child(before.clone(), &"zzz".into(), &mut ids, Category::General);
        assert_eq!(after, before);
        assert!(new_id.is_none());
    }

    #[test]
    fn given_clashing_generator_when_adding_then_skips_taken_ids() {
        let forest = vec![node("root", 0.0, vec![node("1", 0.0, vec![]), node("2", 0.0, vec![])])];
        let mut ids = SequentialIds::new();

        let (forest, new_id) = add_child(forest, &"root".into(), &mut ids, Category::General);

        assert_eq!(new_id, Some(NodeId::from("3")));
        assert_eq!(forest[0].children.len(), 3);
    }

    #[test]
    fn given_nested_node_when_asking_depth_then_counts_from_root() {
        let forest = sample();
        assert_eq!(depth_of(&forest, &"root".into()), Some(0));
        assert_eq!(depth_of(&forest, &"a".into()), Some(1));
        assert_eq!(depth_of(&forest, &"a1".into()), Some(2));
        assert_eq!(depth_of(&forest, &"nope".into()), None);
    }

    #[test]
    fn given_forest_when_listing_ids_then_depth_first_order() {
        let listed: Vec<String> = ids(&sample()).iter().map(|i| i.to_string()).collect();
        assert_eq!(listed, vec!["root", "a", "a1", "a2", "b"]);
    }
}
