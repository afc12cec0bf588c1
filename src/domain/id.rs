//! Node identity generation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::node::NodeId;

/// Source of identifiers for newly created nodes.
///
/// Implementations only advance their own state. Uniqueness against the live
/// tree is enforced by the mutation engine, which asks again on a clash.
pub trait IdGenerator {
    fn generate_id(&mut self) -> NodeId;
}

/// Counter-based ids: `1`, `2`, `3`, ...
#[derive(Debug, Default, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for SequentialIds {
    fn generate_id(&mut self) -> NodeId {
        self.next += 1;
        NodeId::new(self.next.to_string())
    }
}

/// Short random tokens cut from a v4 UUID.
#[derive(Debug, Default, Clone)]
pub struct RandomIds;

pub const RANDOM_ID_LEN: usize = 9;

impl IdGenerator for RandomIds {
    fn generate_id(&mut self) -> NodeId {
        let token = Uuid::new_v4().simple().to_string();
        NodeId::new(&token[..RANDOM_ID_LEN])
    }
}

/// Which generator a document uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStyle {
    #[default]
    Sequential,
    Random,
}

impl IdStyle {
    pub fn generator(&self) -> Box<dyn IdGenerator> {
        match self {
            IdStyle::Sequential => Box::new(SequentialIds::new()),
            IdStyle::Random => Box::new(RandomIds),
        }
    }
}

impl fmt::Display for IdStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdStyle::Sequential => f.write_str("sequential"),
            IdStyle::Random => f.write_str("random"),
        }
    }
}

impl FromStr for IdStyle {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sequential" => Ok(IdStyle::Sequential),
            "random" => Ok(IdStyle::Random),
            _ => Err(DomainError::UnknownIdStyle(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    #[test]
    fn given_sequential_ids_when_generating_then_counts_up() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.generate_id().as_str(), "1");
        assert_eq!(ids.generate_id().as_str(), "2");
    }

    #[test]
    fn given_random_ids_when_generating_many_then_all_distinct_and_short() {
        let mut ids = RandomIds;
        let generated: HashSet<NodeId> = (0..500).map(|_| ids.generate_id()).collect();
        assert_eq!(generated.len(), 500);
        assert!(generated.iter().all(|id| id.as_str().len() == RANDOM_ID_LEN));
        assert!(generated.iter().all(|id| !id.is_root()));
    }

    #[test]
    fn given_id_style_name_when_parsing_then_roundtrips_display() {
        for style in [IdStyle::Sequential, IdStyle::Random] {
            assert_eq!(style.to_string().parse::<IdStyle>().unwrap(), style);
        }
        assert!("uuid".parse::<IdStyle>().is_err());
    }
}
