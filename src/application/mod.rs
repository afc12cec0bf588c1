//! Application layer: the cost document and its collaborators
//!
//! This layer owns the editable state and turns raw user input into domain edits.

pub mod analysis;
pub mod document;
pub mod error;
pub mod error_ext;
pub mod input;

pub use analysis::{cost_tree_request, AnalysisRequest, AnalysisResult, COST_TREE_TOOL};
pub use document::{CostDocument, EditOutcome};
pub use error::{ApplicationError, ApplicationResult};
pub use error_ext::IoResultExt;
pub use input::parse_amount;
