//! Cost-of-quality breakdown over the leaves of a cost tree

use std::collections::BTreeMap;

use serde::Serialize;

use crate::domain::node::{Category, CostNode};

/// Leaf amounts grouped by category.
///
/// Cost of poor quality (COPQ) is internal plus external failure, cost of good
/// quality (CoGQ) is prevention plus appraisal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityBreakdown {
    pub by_category: BTreeMap<Category, f64>,
    pub total: f64,
    pub copq: f64,
    pub cogq: f64,
}

impl QualityBreakdown {
    /// Group the leaves of `root`. A root without children counts as its own leaf.
    pub fn of(root: &CostNode) -> Self {
        let mut by_category: BTreeMap<Category, f64> = BTreeMap::new();
        for leaf in root.leaves() {
            *by_category.entry(leaf.category).or_insert(0.0) += leaf.amount;
        }

        let sum_where = |pred: fn(&Category) -> bool| -> f64 {
            by_category
                .iter()
                .filter(|(c, _)| pred(c))
                .map(|(_, v)| *v)
                .sum()
        };
        let copq = sum_where(Category::is_poor_quality);
        let cogq = sum_where(Category::is_good_quality);
        let total = by_category.values().sum();

        Self {
            by_category,
            total,
            copq,
            cogq,
        }
    }

    pub fn amount(&self, category: Category) -> f64 {
        self.by_category.get(&category).copied().unwrap_or(0.0)
    }

    /// COPQ as percentage of all quality cost; `None` when there is no cost.
    pub fn copq_share(&self) -> Option<f64> {
        (self.total > 0.0).then(|| self.copq / self.total * 100.0)
    }

    /// Total quality cost as percentage of revenue; `None` unless revenue is positive.
    pub fn revenue_impact(&self, revenue: f64) -> Option<f64> {
        (revenue > 0.0).then(|| self.total / revenue * 100.0)
    }
}
