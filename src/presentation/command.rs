//! Line commands of the interactive editor
//!
//! One line is one user event. Amount and income arguments are kept raw; they
//! are parsed when the edit is committed.

use std::str::FromStr;

use thiserror::Error;

use crate::domain::{Category, DomainError, NodeId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandError {
    #[error("unknown command '{0}' (type 'help' for a list)")]
    Unknown(String),

    #[error("{command}: missing {argument}")]
    MissingArgument {
        command: &'static str,
        argument: &'static str,
    },

    #[error(transparent)]
    Domain(#[from] DomainError),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Show,
    Add { parent: NodeId },
    Category { id: NodeId, category: Category },
    Describe { id: NodeId, text: String },
    Amount { id: NodeId, raw: String },
    Delete { id: NodeId },
    Toggle { id: NodeId },
    Expand { id: NodeId },
    Collapse { id: NodeId },
    Income { raw: String },
    Summary,
    Breakdown,
    Export,
    Categories,
    Help,
    Quit,
    /// Blank line or `#` comment
    Nothing,
}

impl Command {
    /// Whether the command changes the cost tree or the income.
    pub fn is_edit(&self) -> bool {
        matches!(
            self,
            Command::Add { .. }
                | Command::Category { .. }
                | Command::Describe { .. }
                | Command::Amount { .. }
                | Command::Delete { .. }
                | Command::Income { .. }
        )
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Command::Nothing);
        }
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let command = match word.to_lowercase().as_str() {
            "show" | "ls" | "tree" => Command::Show,
            "add" | "a" => Command::Add {
                parent: node_arg("add", rest)?,
            },
            "category" | "cat" => {
                let (id, value) = split_id("category", rest)?;
                if value.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "category",
                        argument: "category",
                    });
                }
                Command::Category {
                    id,
                    category: value.parse()?,
                }
            }
            "describe" | "desc" => {
                let (id, text) = split_id("describe", rest)?;
                Command::Describe {
                    id,
                    text: text.to_string(),
                }
            }
            "amount" | "amt" | "set" => {
                let (id, raw) = split_id("amount", rest)?;
                Command::Amount {
                    id,
                    raw: raw.to_string(),
                }
            }
            "delete" | "del" | "rm" => Command::Delete {
                id: node_arg("delete", rest)?,
            },
            "toggle" => Command::Toggle {
                id: node_arg("toggle", rest)?,
            },
            "expand" => Command::Expand {
                id: node_arg("expand", rest)?,
            },
            "collapse" => Command::Collapse {
                id: node_arg("collapse", rest)?,
            },
            "income" | "revenue" => Command::Income {
                raw: rest.to_string(),
            },
            "summary" | "sum" => Command::Summary,
            "breakdown" | "copq" => Command::Breakdown,
            "export" | "json" => Command::Export,
            "categories" => Command::Categories,
            "help" | "h" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };
        Ok(command)
    }
}

fn node_arg(command: &'static str, rest: &str) -> Result<NodeId, CommandError> {
    split_id(command, rest).map(|(id, _)| id)
}

/// First token is the node id, the remainder is the value.
fn split_id<'a>(command: &'static str, rest: &'a str) -> Result<(NodeId, &'a str), CommandError> {
    if rest.is_empty() {
        return Err(CommandError::MissingArgument {
            command,
            argument: "node id",
        });
    }
    let (id, value) = match rest.split_once(char::is_whitespace) {
        Some((id, value)) => (id, value.trim()),
        None => (rest, ""),
    };
    Ok((NodeId::from(id), value))
}

pub const HELP: &str = "\
Commands (<id> is the bracketed node id):
  show                        redraw the tree and financial summary
  add <parent>                add a cost line below <parent>
  category <id> <category>    set the category of a node
  describe <id> [text]        set the description (empty clears it)
  amount <id> [value]         set a leaf amount (unreadable input counts as 0)
  delete <id>                 remove a node and everything below it
  toggle|expand|collapse <id> show or hide the sub-costs of a branch
  income [value]              set the income used for profit and margin
  summary                     income, total cost, profit and margin
  breakdown                   totals per cost-of-quality category
  export                      print the cost_tree analysis request as JSON
  categories                  list the categories
  help                        this text
  quit                        leave the editor";
