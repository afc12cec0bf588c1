//! costtree: hierarchical cost-of-quality trees with roll-up totals
//!
//! Layers, from the inside out:
//! - `domain`: cost nodes, the mutation engine, roll-up and financial summary
//! - `application`: the cost document that owns the tree and the income
//! - `presentation`: terminal rendering and the line-driven editor
//! - `cli`: argument parsing and command dispatch

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod presentation;
pub mod util;
