//! Line-driven editing session over a cost document

use std::io::{self, BufRead, Write};

use colored::Colorize;
use itertools::Itertools;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::{debug, instrument};

use crate::application::{
    ApplicationError, ApplicationResult, CostDocument, EditOutcome, IoResultExt,
};
use crate::config::Settings;
use crate::domain::{format_money, Category, NodeId};
use crate::presentation::command::{Command, HELP};
use crate::presentation::view::{render, render_breakdown, render_summary, Controls, ViewState};

/// Whether the session keeps reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Source of interactive input lines.
pub trait LineReader {
    fn readline(&mut self, prompt: &str) -> Result<String, ReadlineError>;
    fn add_history_entry(&mut self, line: &str) -> Result<(), ReadlineError>;
}

impl LineReader for DefaultEditor {
    fn readline(&mut self, prompt: &str) -> Result<String, ReadlineError> {
        rustyline::Editor::readline(self, prompt)
    }

    fn add_history_entry(&mut self, line: &str) -> Result<(), ReadlineError> {
        rustyline::Editor::add_history_entry(self, line).map(|_| ())
    }
}

fn readline_err(e: ReadlineError) -> ApplicationError {
    ApplicationError::OperationFailed {
        context: "read input line".to_string(),
        source: Box::new(e),
    }
}

/// Dispatches user commands to the document and renders the result.
///
/// The session owns the view state; the document owns the cost tree. Every
/// edit is a single call into the document, which recomputes totals before it
/// returns, so rendering always sees a consistent tree.
#[derive(Debug)]
pub struct Session {
    document: CostDocument,
    view: ViewState,
    settings: Settings,
}

impl Session {
    pub fn new(document: CostDocument, settings: Settings) -> Self {
        Self {
            document,
            view: ViewState::new(),
            settings,
        }
    }

    pub fn document(&self) -> &CostDocument {
        &self.document
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn into_document(self) -> CostDocument {
        self.document
    }

    /// Read commands from `input` until it ends or `quit`.
    ///
    /// Scripts and tests go through here; no prompt is printed.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> io::Result<()> {
        for line in input.lines() {
            if self.handle_line(&line?, out)? == Flow::Quit {
                break;
            }
        }
        Ok(())
    }

    /// Interactive loop: draws the tree, then reads edited lines with history.
    ///
    /// Ctrl-C and Ctrl-D leave the session like `quit`.
    pub fn run_interactive<L: LineReader, W: Write>(
        &mut self,
        reader: &mut L,
        out: &mut W,
    ) -> ApplicationResult<()> {
        self.write_view(out).with_context("write output")?;
        writeln!(out, "{}", "type 'help' for commands".dimmed()).with_context("write output")?;

        let prompt = format!("{} ", self.settings.prompt);
        loop {
            out.flush().with_context("write output")?;
            match reader.readline(&prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        reader.add_history_entry(&line).map_err(readline_err)?;
                    }
                    if self.handle_line(&line, out).with_context("write output")? == Flow::Quit {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
                    debug!("input closed, leaving session");
                    break;
                }
                Err(e) => return Err(readline_err(e)),
            }
        }
        Ok(())
    }

    /// Parse one line and execute it; parse errors are reported, not returned.
    pub fn handle_line<W: Write>(&mut self, line: &str, out: &mut W) -> io::Result<Flow> {
        match line.parse::<Command>() {
            Ok(command) => self.execute(command, out),
            Err(e) => {
                debug!("rejected input {:?}: {}", line, e);
                writeln!(out, "{}: {}", "error".red().bold(), e)?;
                Ok(Flow::Continue)
            }
        }
    }

    #[instrument(level = "debug", skip(self, out))]
    pub fn execute<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<Flow> {
        match command {
            Command::Nothing => {}
            Command::Show => self.write_view(out)?,
            Command::Add { parent } => {
                let outcome = self.document.add_child(&parent);
                if outcome.is_applied() {
                    self.view.set_expanded(&parent, true);
                }
                self.report(outcome, out)?;
            }
            Command::Category { id, category } => {
                let outcome = self.document.set_category(&id, category);
                self.report(outcome, out)?;
            }
            Command::Describe { id, text } => {
                let outcome = self.document.set_description(&id, &text);
                self.report(outcome, out)?;
            }
            Command::Amount { id, raw } => {
                let outcome = match self.controls(&id) {
                    Some(controls) if !controls.edit_amount => EditOutcome::ReadOnlyAmount(id),
                    _ => self.document.set_amount(&id, &raw),
                };
                self.report(outcome, out)?;
            }
            Command::Delete { id } => {
                let outcome = match self.controls(&id) {
                    Some(controls) if !controls.delete => EditOutcome::RootProtected,
                    _ => self.document.delete(&id),
                };
                if outcome.is_applied() {
                    self.view.prune(self.document.forest());
                }
                self.report(outcome, out)?;
            }
            Command::Toggle { id } => self.change_view(&id, None, out)?,
            Command::Expand { id } => self.change_view(&id, Some(true), out)?,
            Command::Collapse { id } => self.change_view(&id, Some(false), out)?,
            Command::Income { raw } => {
                let income = self.document.set_income(&raw);
                self.success(
                    &format!("income set to {}", format_money(&self.settings.currency, income)),
                    out,
                )?;
                if self.settings.render_after_edit {
                    self.write_view(out)?;
                }
            }
            Command::Summary => self.write_summary(out)?,
            Command::Breakdown => {
                let text = render_breakdown(
                    &self.document.breakdown(),
                    self.document.income(),
                    &self.settings.currency,
                );
                writeln!(out, "{}", text)?;
            }
            Command::Export => self.write_export(out)?,
            Command::Categories => {
                for category in Category::ALL {
                    writeln!(out, "{:<18} {}", category.as_str(), category.label())?;
                }
            }
            Command::Help => {
                writeln!(out, "{}", HELP)?;
                writeln!(
                    out,
                    "Categories: {}",
                    Category::ALL.iter().join(", ")
                )?;
            }
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Tree followed by the financial summary.
    pub fn write_view<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let tree = render(self.document.root(), &self.view, &self.settings.currency);
        write!(out, "{}", tree)?;
        writeln!(out)?;
        self.write_summary(out)
    }

    pub fn write_summary<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(
            out,
            "{}",
            render_summary(&self.document.summary(), &self.settings.currency)
        )
    }

    pub fn write_export<W: Write>(&self, out: &mut W) -> io::Result<()> {
        match serde_json::to_string_pretty(&self.document.analysis_request()) {
            Ok(json) => writeln!(out, "{}", json),
            Err(e) => writeln!(out, "{}: cannot serialize request: {}", "error".red().bold(), e),
        }
    }

    fn controls(&self, id: &NodeId) -> Option<Controls> {
        let node = self.document.node(id)?;
        let depth = self.document.depth_of(id)?;
        Some(Controls::for_node(node, depth))
    }

    /// `None` flips the flag, `Some` sets it.
    fn change_view<W: Write>(
        &mut self,
        id: &NodeId,
        expanded: Option<bool>,
        out: &mut W,
    ) -> io::Result<()> {
        match self.controls(id) {
            None => self.warning(&EditOutcome::NotFound(id.clone()), out),
            Some(controls) if !controls.toggle => {
                self.warning(&format!("node {} has no sub-costs to show or hide", id), out)
            }
            Some(_) => {
                match expanded {
                    Some(flag) => self.view.set_expanded(id, flag),
                    None => {
                        self.view.toggle(id);
                    }
                }
                let tree = render(self.document.root(), &self.view, &self.settings.currency);
                write!(out, "{}", tree)
            }
        }
    }

    fn report<W: Write>(&self, outcome: EditOutcome, out: &mut W) -> io::Result<()> {
        if !outcome.is_applied() {
            return self.warning(&outcome, out);
        }
        self.success(&outcome, out)?;
        if self.settings.render_after_edit {
            self.write_view(out)?;
        }
        Ok(())
    }

    fn success<W: Write>(&self, msg: &(impl std::fmt::Display + ?Sized), out: &mut W) -> io::Result<()> {
        writeln!(out, "{} {}", "✓".green(), msg)
    }

    fn warning<W: Write>(&self, msg: &(impl std::fmt::Display + ?Sized), out: &mut W) -> io::Result<()> {
        writeln!(out, "{}: {}", "Warning".yellow(), msg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SequentialIds;

    fn session(render_after_edit: bool) -> Session {
        colored::control::set_override(false);
        let settings = Settings {
            render_after_edit,
            ..Settings::default()
        };
        let document = CostDocument::new("Total cost", Box::new(SequentialIds::new()));
        Session::new(document, settings)
    }

    fn feed(session: &mut Session, script: &str) -> String {
        let mut out = Vec::new();
        session.run(script.as_bytes(), &mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn given_root_when_delete_requested_then_refused_and_tree_kept() {
        let mut s = session(false);
        let out = feed(&mut s, "add root\ndelete root\n");

        assert!(out.contains("the root node cannot be deleted"));
        assert_eq!(s.document().root().children.len(), 1);
    }

    #[test]
    fn given_branch_when_amount_typed_then_read_only() {
        let mut s = session(false);
        let out = feed(&mut s, "add root\nadd 1\namount 2 30\namount 1 99\n");

        assert!(out.contains("its amount is the sum of its sub-costs"));
        assert_eq!(s.document().total_cost(), 30.0);
    }

    #[test]
    fn given_leaf_when_toggled_then_warned_and_view_unchanged() {
        let mut s = session(false);
        let out = feed(&mut s, "add root\ntoggle 1\n");

        assert!(out.contains("node 1 has no sub-costs to show or hide"));
        // only the root entry written by `add`
        assert_eq!(s.view().len(), 1);
    }

    #[test]
    fn given_bad_lines_when_running_then_errors_inline_and_session_continues() {
        let mut s = session(false);
        let out = feed(&mut s, "bogus\namount\nadd root\namount 1 12abc\n");

        assert!(out.contains("error: unknown command 'bogus'"));
        assert!(out.contains("error: amount: missing node id"));
        assert_eq!(s.document().total_cost(), 12.0);
    }

    #[test]
    fn given_quit_when_running_then_later_lines_ignored() {
        let mut s = session(false);
        feed(&mut s, "add root\nquit\nadd root\n");
        assert_eq!(s.document().root().children.len(), 1);
    }

    #[test]
    fn given_render_after_edit_when_editing_then_tree_and_summary_printed() {
        let mut s = session(true);
        let out = feed(&mut s, "add root\ndescribe 1 Rework\n");

        assert!(out.contains("✓ added node 1"));
        assert!(out.contains("Rework"));
        assert!(out.contains("Total cost:"));
    }

    #[test]
    fn given_collapsed_branch_when_deleted_then_view_entry_pruned() {
        let mut s = session(false);
        feed(&mut s, "add root\nadd 1\ncollapse 1\n");
        assert!(!s.view().is_expanded(&NodeId::from("1")));

        feed(&mut s, "delete 1\n");

        assert!(s.document().root().is_leaf());
        assert_eq!(s.view().len(), 1);
        assert!(s.view().is_expanded(&NodeId::from("1")));
    }

    /// Replays canned readline results and records history.
    struct Replay {
        lines: std::collections::VecDeque<Result<String, ReadlineError>>,
        prompts: Vec<String>,
        history: Vec<String>,
    }

    impl Replay {
        fn new(lines: Vec<Result<String, ReadlineError>>) -> Self {
            Self {
                lines: lines.into(),
                prompts: Vec::new(),
                history: Vec::new(),
            }
        }
    }

    impl LineReader for Replay {
        fn readline(&mut self, prompt: &str) -> Result<String, ReadlineError> {
            self.prompts.push(prompt.to_string());
            self.lines.pop_front().unwrap_or(Err(ReadlineError::Eof))
        }

        fn add_history_entry(&mut self, line: &str) -> Result<(), ReadlineError> {
            self.history.push(line.to_string());
            Ok(())
        }
    }

    #[test]
    fn given_interactive_session_when_interrupted_then_leaves_and_keeps_history() {
        let mut s = session(false);
        let mut reader = Replay::new(vec![
            Ok("add root".to_string()),
            Ok("".to_string()),
            Ok("amount 1 40".to_string()),
            Err(ReadlineError::Interrupted),
            Ok("add root".to_string()),
        ]);
        let mut out = Vec::new();

        s.run_interactive(&mut reader, &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Total cost"));
        assert!(out.contains("type 'help' for commands"));
        assert_eq!(reader.prompts.len(), 4);
        assert_eq!(reader.prompts[0], "costtree> ");
        assert_eq!(reader.history, vec!["add root", "amount 1 40"]);
        assert_eq!(s.document().root().children.len(), 1);
        assert_eq!(s.document().total_cost(), 40.0);
    }

    #[test]
    fn given_interactive_session_when_input_ends_then_leaves_cleanly() {
        let mut s = session(false);
        let mut reader = Replay::new(vec![Ok("add root".to_string())]);
        let mut out = Vec::new();

        s.run_interactive(&mut reader, &mut out).unwrap();

        assert_eq!(reader.prompts.len(), 2);
        assert_eq!(s.document().root().children.len(), 1);
    }

    #[test]
    fn given_interactive_quit_when_running_then_later_lines_not_read() {
        let mut s = session(false);
        let mut reader = Replay::new(vec![Ok("quit".to_string()), Ok("add root".to_string())]);
        let mut out = Vec::new();

        s.run_interactive(&mut reader, &mut out).unwrap();

        assert_eq!(reader.lines.len(), 1);
        assert!(s.document().root().is_leaf());
    }
}
