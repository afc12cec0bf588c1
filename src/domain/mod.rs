//! Domain layer: cost tree entities, mutation engine and roll-up
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod breakdown;
pub mod error;
pub mod id;
pub mod mutation;
pub mod node;
pub mod rollup;
pub mod summary;

pub use breakdown::QualityBreakdown;
pub use error::DomainError;
pub use id::{IdGenerator, IdStyle, RandomIds, SequentialIds};
pub use mutation::Forest;
pub use node::{Category, CostNode, NodeFields, NodeId, ROOT_ID};
pub use rollup::{effective_value, recompute, recompute_forest};
pub use summary::{format_money, FinancialSummary};
