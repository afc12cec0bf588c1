//! Recursive tree rendering and per-node view state

use std::collections::HashMap;
use std::fmt;

use colored::Colorize;
use termtree::Tree;

use crate::domain::{
    effective_value, format_money, Category, CostNode, FinancialSummary, NodeId,
    QualityBreakdown,
};

/// Expand/collapse flags keyed by node id.
///
/// Pure view state: it never enters the cost tree and starts over with every
/// new session. Nodes without an entry are expanded.
#[derive(Debug, Default, Clone)]
pub struct ViewState {
    expanded: HashMap<NodeId, bool>,
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_expanded(&self, id: &NodeId) -> bool {
        self.expanded.get(id).copied().unwrap_or(true)
    }

    pub fn set_expanded(&mut self, id: &NodeId, expanded: bool) {
        self.expanded.insert(id.clone(), expanded);
    }

    /// Flip the flag of `id` and return the new state.
    pub fn toggle(&mut self, id: &NodeId) -> bool {
        let expanded = !self.is_expanded(id);
        self.set_expanded(id, expanded);
        expanded
    }

    /// Drop flags of nodes that no longer exist.
    pub fn prune(&mut self, forest: &[CostNode]) {
        let live: std::collections::HashSet<NodeId> =
            crate::domain::mutation::ids(forest).into_iter().collect();
        self.expanded.retain(|id, _| live.contains(id));
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }
}

/// Which actions a node offers at a given depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Controls {
    pub add_child: bool,
    /// Never offered on the root.
    pub delete: bool,
    /// Only branches have something to show or hide.
    pub toggle: bool,
    /// Branch amounts are computed, not typed.
    pub edit_amount: bool,
}

impl Controls {
    pub fn for_node(node: &CostNode, depth: usize) -> Self {
        let is_leaf = node.is_leaf();
        Self {
            add_child: true,
            delete: depth > 0,
            toggle: !is_leaf,
            edit_amount: is_leaf,
        }
    }
}

impl fmt::Display for Controls {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut marks = Vec::with_capacity(3);
        if self.add_child {
            marks.push("+");
        }
        if self.delete {
            marks.push("x");
        }
        if self.toggle {
            marks.push("±");
        }
        write!(f, "[{}]", marks.join(" "))
    }
}

/// One visible line of the tree.
#[derive(Debug, Clone)]
pub struct NodeRow {
    pub id: NodeId,
    pub depth: usize,
    pub category: Category,
    pub description: String,
    /// Leaf amount, or the rolled-up value of a branch
    pub value: f64,
    pub is_leaf: bool,
    pub expanded: bool,
    /// Descendants hidden because this node is collapsed
    pub hidden: usize,
    pub controls: Controls,
    currency: String,
}

impl NodeRow {
    pub fn new(node: &CostNode, depth: usize, expanded: bool, currency: &str) -> Self {
        let hidden = if expanded || node.is_leaf() {
            0
        } else {
            node.size() - 1
        };
        Self {
            id: node.id.clone(),
            depth,
            category: node.category,
            description: node.description.clone(),
            value: effective_value(node),
            is_leaf: node.is_leaf(),
            expanded,
            hidden,
            controls: Controls::for_node(node, depth),
            currency: currency.to_string(),
        }
    }
}

impl fmt::Display for NodeRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marker = match (self.is_leaf, self.expanded) {
            (true, _) => "•",
            (false, true) => "▾",
            (false, false) => "▸",
        };
        let description = if self.description.is_empty() {
            "(no description)".dimmed().to_string()
        } else if self.depth == 0 {
            self.description.bold().to_string()
        } else {
            self.description.clone()
        };
        let money = format_money(&self.currency, self.value);
        let value = if self.is_leaf {
            money
        } else {
            format!("{} Σ", money).bold().to_string()
        };

        write!(
            f,
            "{} {} {} {}  {}  {}",
            marker,
            format!("[{}]", self.id).dimmed(),
            self.category.as_str().cyan(),
            description,
            value,
            self.controls.to_string().dimmed()
        )?;
        if self.hidden > 0 {
            write!(f, "  {}", format!("… {} hidden", self.hidden).yellow())?;
        }
        Ok(())
    }
}

/// Render `root` and every expanded descendant.
pub fn render(root: &CostNode, view: &ViewState, currency: &str) -> Tree<NodeRow> {
    render_node(root, 0, view, currency)
}

fn render_node(node: &CostNode, depth: usize, view: &ViewState, currency: &str) -> Tree<NodeRow> {
    let expanded = view.is_expanded(&node.id);
    let tree = Tree::new(NodeRow::new(node, depth, expanded, currency));
    if expanded && !node.is_leaf() {
        tree.with_leaves(
            node.children
                .iter()
                .map(|child| render_node(child, depth + 1, view, currency)),
        )
    } else {
        tree
    }
}

/// Income, cost, profit and, when income is positive, margin.
pub fn render_summary(summary: &FinancialSummary, currency: &str) -> String {
    let profit = format_money(currency, summary.profit);
    let profit = if summary.is_profitable() {
        profit.green()
    } else {
        profit.red()
    };

    let mut text = format!(
        "{:<12} {}\n{:<12} {}\n{:<12} {}",
        "Income:",
        format_money(currency, summary.income),
        "Total cost:",
        format_money(currency, summary.total_cost).red(),
        "Profit:",
        profit
    );
    if summary.margin.is_some() {
        text.push_str(&format!("\n{:<12} {}", "Margin:", summary.margin_display()));
    }
    text
}

/// Per-category totals with COPQ and CoGQ.
pub fn render_breakdown(breakdown: &QualityBreakdown, income: f64, currency: &str) -> String {
    let mut lines = Vec::new();
    for category in Category::ALL {
        lines.push(format!(
            "{:<36} {}",
            category.label(),
            format_money(currency, breakdown.amount(category))
        ));
    }
    lines.push(format!("{:<36} {}", "Total quality cost", format_money(currency, breakdown.total)));

    let share = breakdown
        .copq_share()
        .map(|s| format!(" ({:.1}% of total)", s))
        .unwrap_or_default();
    lines.push(format!(
        "{:<36} {}{}",
        "Cost of poor quality (COPQ)",
        format_money(currency, breakdown.copq).red(),
        share
    ));
    lines.push(format!(
        "{:<36} {}",
        "Cost of good quality (CoGQ)",
        format_money(currency, breakdown.cogq).green()
    ));
    if let Some(impact) = breakdown.revenue_impact(income) {
        lines.push(format!("Quality costs are {:.2}% of income", impact));
    }
    lines.join("\n")
}
