//! Wire shapes of the remote analysis and recommendation services
//!
//! The services themselves live elsewhere; this module only describes their
//! JSON payloads and builds the `cost_tree` analysis request from a tree.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

use crate::domain::{Category, CostNode};

/// Tool name the analysis service registers the cost tree under.
pub const COST_TREE_TOOL: &str = "cost_tree";

/// Body of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub tool_name: String,
    pub data: Vec<Value>,
    #[serde(default)]
    pub parameters: Map<String, Value>,
}

/// Response of `POST /analyze`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub tool_name: String,
    pub summary: String,
    #[serde(default)]
    pub chart_data: Vec<Value>,
    #[serde(default)]
    pub details: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Body of `POST /recommend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub phase: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recommendation {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Response of `POST /recommend`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResponse {
    #[serde(default)]
    pub recommendations: Vec<Recommendation>,
}

/// One cost line as the analysis service expects it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostItem {
    pub description: String,
    pub amount: f64,
    pub category: Category,
}

impl From<&CostNode> for CostItem {
    fn from(node: &CostNode) -> Self {
        Self {
            description: node.description.clone(),
            amount: node.amount,
            category: node.category,
        }
    }
}

/// Build the `cost_tree` request: one record per leaf below `root`, plus the
/// revenue when it is positive.
pub fn cost_tree_request(root: &CostNode, income: f64) -> AnalysisRequest {
    let data = if root.is_leaf() {
        Vec::new()
    } else {
        root.leaves()
            .into_iter()
            .map(CostItem::from)
            .map(|item| {
                json!({
                    "description": item.description,
                    "amount": item.amount,
                    "category": item.category,
                })
            })
            .collect()
    };

    let mut parameters = Map::new();
    if income > 0.0 {
        parameters.insert("total_revenue".to_string(), json!(income));
    }

    AnalysisRequest {
        tool_name: COST_TREE_TOOL.to_string(),
        data,
        parameters,
    }
}
