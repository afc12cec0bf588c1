//! Cost tree entities: nodes, identifiers and cost categories

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::error::DomainError;

/// Identifier of the document root. Fixed for the lifetime of a document.
pub const ROOT_ID: &str = "root";

/// Opaque node identifier, immutable after creation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn root() -> Self {
        Self(ROOT_ID.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0 == ROOT_ID
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Cost-of-quality classification of a cost line.
///
/// Purely descriptive: roll-up math ignores it, the quality cost breakdown
/// groups leaves by it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    /// Unclassified cost line
    #[default]
    General,
    /// Investment that keeps defects from happening
    #[serde(alias = "prevencion")]
    Prevention,
    /// Inspection and evaluation
    #[serde(alias = "evaluacion")]
    Appraisal,
    /// Defects caught before reaching the customer
    #[serde(alias = "falla_interna")]
    InternalFailure,
    /// Defects that reached the customer
    #[serde(alias = "falla_externa")]
    ExternalFailure,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::General,
        Category::Prevention,
        Category::Appraisal,
        Category::InternalFailure,
        Category::ExternalFailure,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::General => "general",
            Category::Prevention => "prevention",
            Category::Appraisal => "appraisal",
            Category::InternalFailure => "internal-failure",
            Category::ExternalFailure => "external-failure",
        }
    }

    /// Human readable label used in breakdown output.
    pub fn label(&self) -> &'static str {
        match self {
            Category::General => "General (unclassified)",
            Category::Prevention => "Prevention (investment)",
            Category::Appraisal => "Appraisal (inspection)",
            Category::InternalFailure => "Internal failure (waste)",
            Category::ExternalFailure => "External failure (customer damage)",
        }
    }

    /// Failure costs make up the cost of poor quality.
    pub fn is_poor_quality(&self) -> bool {
        matches!(self, Category::InternalFailure | Category::ExternalFailure)
    }

    /// Prevention and appraisal make up the cost of good quality.
    pub fn is_good_quality(&self) -> bool {
        matches!(self, Category::Prevention | Category::Appraisal)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "general" => Ok(Category::General),
            "prevention" | "prevencion" => Ok(Category::Prevention),
            "appraisal" | "evaluacion" => Ok(Category::Appraisal),
            "internal-failure" | "internal" | "falla-interna" => Ok(Category::InternalFailure),
            "external-failure" | "external" | "falla-externa" => Ok(Category::ExternalFailure),
            _ => Err(DomainError::UnknownCategory(s.to_string())),
        }
    }
}

/// One line of the cost breakdown.
///
/// A node without children is a leaf and carries its own `amount`. A node with
/// children is a branch whose `total` is the roll-up of its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostNode {
    pub id: NodeId,
    pub category: Category,
    pub description: String,
    pub amount: f64,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub children: Vec<CostNode>,
}

impl CostNode {
    /// Fresh leaf: empty description, zero amount, no children.
    pub fn leaf(id: NodeId, category: Category) -> Self {
        Self {
            id,
            category,
            description: String::new(),
            amount: 0.0,
            total: 0.0,
            children: Vec::new(),
        }
    }

    /// Document root with the fixed root identifier.
    pub fn root(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::leaf(NodeId::root(), Category::General)
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn fields(&self) -> NodeFields {
        NodeFields::from(self)
    }

    /// Number of nodes in this subtree, including self.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(CostNode::size).sum::<usize>()
    }

    /// Levels in this subtree; a leaf has depth 1.
    pub fn depth(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(CostNode::depth)
            .max()
            .unwrap_or(0)
    }

    /// Leaves of this subtree in display order.
    pub fn leaves(&self) -> Vec<&CostNode> {
        let mut leaves = Vec::new();
        self.collect_leaves(&mut leaves);
        leaves
    }

    fn collect_leaves<'a>(&'a self, leaves: &mut Vec<&'a CostNode>) {
        if self.children.is_empty() {
            leaves.push(self);
        } else {
            for child in &self.children {
                child.collect_leaves(leaves);
            }
        }
    }
}

/// Editable fields of a node.
///
/// Carries no identifier and no children: an edit can neither rename a node
/// nor replace its subtree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeFields {
    pub category: Category,
    pub description: String,
    pub amount: f64,
    pub total: f64,
}

impl From<&CostNode> for NodeFields {
    fn from(node: &CostNode) -> Self {
        Self {
            category: node.category,
            description: node.description.clone(),
            amount: node.amount,
            total: node.total,
        }
    }
}
