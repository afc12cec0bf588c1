//! Cost document: the single root node plus the income figure
//!
//! All user edits enter through here. Each mutation hands the forest to the
//! mutation engine and then runs exactly one roll-up pass, so the tree is fully
//! aggregated whenever a call returns.

use std::fmt;
use std::mem;

use tracing::{debug, instrument, warn};

use crate::application::analysis::{cost_tree_request, AnalysisRequest};
use crate::application::input::parse_amount;
use crate::config::Settings;
use crate::domain::mutation;
use crate::domain::{
    recompute_forest, Category, CostNode, FinancialSummary, Forest, IdGenerator, NodeFields,
    NodeId, QualityBreakdown,
};

/// What an edit did to the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditOutcome {
    Applied,
    Added(NodeId),
    NotFound(NodeId),
    /// Deleting the root was refused.
    RootProtected,
    /// A branch amount is computed from its children and cannot be typed in.
    ReadOnlyAmount(NodeId),
}

impl EditOutcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, EditOutcome::Applied | EditOutcome::Added(_))
    }
}

impl fmt::Display for EditOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EditOutcome::Applied => write!(f, "updated"),
            EditOutcome::Added(id) => write!(f, "added node {}", id),
            EditOutcome::NotFound(id) => write!(f, "no node with id {}", id),
            EditOutcome::RootProtected => write!(f, "the root node cannot be deleted"),
            EditOutcome::ReadOnlyAmount(id) => write!(
                f,
                "node {} has children; its amount is the sum of its sub-costs",
                id
            ),
        }
    }
}

pub struct CostDocument {
    forest: Forest,
    income: f64,
    default_category: Category,
    ids: Box<dyn IdGenerator>,
}

impl fmt::Debug for CostDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CostDocument")
            .field("forest", &self.forest)
            .field("income", &self.income)
            .field("default_category", &self.default_category)
            .finish_non_exhaustive()
    }
}

impl CostDocument {
    pub fn new(root_description: impl Into<String>, ids: Box<dyn IdGenerator>) -> Self {
        Self {
            forest: vec![CostNode::root(root_description)],
            income: 0.0,
            default_category: Category::default(),
            ids,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.root_description.clone(), settings.id_style.generator())
            .with_default_category(settings.default_category)
    }

    /// Category given to nodes created by `add_child`.
    pub fn with_default_category(mut self, category: Category) -> Self {
        self.default_category = category;
        self
    }

    pub fn root(&self) -> &CostNode {
        &self.forest[0]
    }

    pub fn forest(&self) -> &[CostNode] {
        &self.forest
    }

    pub fn node(&self, id: &NodeId) -> Option<&CostNode> {
        mutation::find(&self.forest, id)
    }

    pub fn depth_of(&self, id: &NodeId) -> Option<usize> {
        mutation::depth_of(&self.forest, id)
    }

    pub fn income(&self) -> f64 {
        self.income
    }

    /// Replace the editable fields of `id`; children are kept.
    #[instrument(level = "debug", skip(self, fields))]
    pub fn update(&mut self, id: &NodeId, fields: NodeFields) -> EditOutcome {
        if !mutation::contains(&self.forest, id) {
            return EditOutcome::NotFound(id.clone());
        }
        let forest = mem::take(&mut self.forest);
        self.forest = mutation::update(forest, id, &fields);
        self.recompute();
        EditOutcome::Applied
    }

    #[instrument(level = "debug", skip(self))]
    pub fn add_child(&mut self, parent_id: &NodeId) -> EditOutcome {
        let forest = mem::take(&mut self.forest);
        let (forest, added) =
            mutation::add_child(forest, parent_id, self.ids.as_mut(), self.default_category);
        self.forest = forest;
        match added {
            Some(id) => {
                self.recompute();
                EditOutcome::Added(id)
            }
            None => EditOutcome::NotFound(parent_id.clone()),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, id: &NodeId) -> EditOutcome {
        if self.root().id == *id {
            warn!("refusing to delete root node {}", id);
            return EditOutcome::RootProtected;
        }
        if !mutation::contains(&self.forest, id) {
            return EditOutcome::NotFound(id.clone());
        }
        let forest = mem::take(&mut self.forest);
        self.forest = mutation::delete(forest, id);
        self.recompute();
        EditOutcome::Applied
    }

    pub fn set_category(&mut self, id: &NodeId, category: Category) -> EditOutcome {
        self.edit(id, |fields| fields.category = category)
    }

    pub fn set_description(&mut self, id: &NodeId, description: &str) -> EditOutcome {
        self.edit(id, |fields| fields.description = description.to_string())
    }

    /// Set a leaf amount from raw user input; unreadable input becomes 0.
    pub fn set_amount(&mut self, id: &NodeId, raw: &str) -> EditOutcome {
        match self.node(id) {
            None => EditOutcome::NotFound(id.clone()),
            Some(node) if !node.is_leaf() => EditOutcome::ReadOnlyAmount(id.clone()),
            Some(_) => {
                let amount = parse_amount(raw);
                self.edit(id, |fields| fields.amount = amount)
            }
        }
    }

    /// Set income from raw user input; unreadable input becomes 0.
    pub fn set_income(&mut self, raw: &str) -> f64 {
        self.income = parse_amount(raw);
        debug!("income set to {}", self.income);
        self.income
    }

    /// Root's own amount while it is a leaf, its rolled-up total otherwise.
    pub fn total_cost(&self) -> f64 {
        let root = self.root();
        if root.is_leaf() {
            root.amount
        } else {
            root.total
        }
    }

    pub fn summary(&self) -> FinancialSummary {
        FinancialSummary::derive(self.income, self.total_cost())
    }

    pub fn breakdown(&self) -> QualityBreakdown {
        QualityBreakdown::of(self.root())
    }

    pub fn analysis_request(&self) -> AnalysisRequest {
        cost_tree_request(self.root(), self.income)
    }

    fn edit(&mut self, id: &NodeId, change: impl FnOnce(&mut NodeFields)) -> EditOutcome {
        let Some(node) = self.node(id) else {
            return EditOutcome::NotFound(id.clone());
        };
        let mut fields = node.fields();
        change(&mut fields);
        self.update(id, fields)
    }

    fn recompute(&mut self) {
        let written = recompute_forest(&mut self.forest);
        debug!("recompute: {} totals written", written);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SequentialIds;

    fn document() -> CostDocument {
        CostDocument::new("Total cost", Box::new(SequentialIds::new()))
    }

    fn added(outcome: EditOutcome) -> NodeId {
        match outcome {
            EditOutcome::Added(id) => id,
            other => panic!("expected Added, got {:?}", other),
        }
    }

    #[test]
    fn given_new_document_when_created_then_single_zero_root() {
        let doc = document();
        assert_eq!(doc.forest().len(), 1);
        assert!(doc.root().id.is_root());
        assert_eq!(doc.total_cost(), 0.0);
        assert_eq!(doc.income(), 0.0);
    }

    #[test]
    fn given_root_when_deleting_then_refused() {
        let mut doc = document();
        let root = NodeId::root();
        assert_eq!(doc.delete(&root), EditOutcome::RootProtected);
        assert_eq!(doc.forest().len(), 1);
    }

    #[test]
    fn given_branch_when_setting_amount_then_read_only() {
        let mut doc = document();
        let a = added(doc.add_child(&NodeId::root()));
        let _b = added(doc.add_child(&a));

        assert_eq!(doc.set_amount(&a, "10"), EditOutcome::ReadOnlyAmount(a.clone()));
        assert_eq!(doc.node(&a).unwrap().amount, 0.0);
    }

    #[test]
    fn given_garbage_amount_when_setting_then_becomes_zero() {
        let mut doc = document();
        let a = added(doc.add_child(&NodeId::root()));
        doc.set_amount(&a, "12");
        assert_eq!(doc.total_cost(), 12.0);

        assert_eq!(doc.set_amount(&a, "twelve"), EditOutcome::Applied);
        assert_eq!(doc.total_cost(), 0.0);
    }

    #[test]
    fn given_lone_root_when_setting_amount_then_total_cost_is_root_amount() {
        let mut doc = document();
        doc.set_amount(&NodeId::root(), "80");
        assert_eq!(doc.total_cost(), 80.0);

        // once the root has children its own amount no longer counts
        doc.add_child(&NodeId::root());
        assert_eq!(doc.total_cost(), 0.0);
    }

    #[test]
    fn given_default_category_when_adding_then_child_uses_it() {
        let mut doc = document().with_default_category(Category::Appraisal);
        let id = added(doc.add_child(&NodeId::root()));
        assert_eq!(doc.node(&id).unwrap().category, Category::Appraisal);
    }

    #[test]
    fn given_unknown_ids_when_editing_then_not_found_and_nothing_changes() {
        let mut doc = document();
        let ghost = NodeId::from("ghost");
        let before = doc.forest().to_vec();

        assert_eq!(doc.add_child(&ghost), EditOutcome::NotFound(ghost.clone()));
        assert_eq!(doc.delete(&ghost), EditOutcome::NotFound(ghost.clone()));
        assert_eq!(doc.set_description(&ghost, "x"), EditOutcome::NotFound(ghost.clone()));
        assert_eq!(doc.set_amount(&ghost, "1"), EditOutcome::NotFound(ghost.clone()));
        assert_eq!(doc.forest(), before.as_slice());
    }

    #[test]
    fn given_income_input_when_setting_then_summary_follows() {
        let mut doc = document();
        let a = added(doc.add_child(&NodeId::root()));
        doc.set_amount(&a, "40");

        assert_eq!(doc.set_income("100"), 100.0);
        let summary = doc.summary();
        assert_eq!(summary.profit, 60.0);
        assert_eq!(summary.margin, Some(60.0));

        assert_eq!(doc.set_income(""), 0.0);
        assert_eq!(doc.summary().margin, None);
    }
}
