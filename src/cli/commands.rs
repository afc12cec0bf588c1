//! Command dispatch: one handler per subcommand

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::Path;

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use rustyline::DefaultEditor;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, CostDocument, IoResultExt};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{expand_path, global_config_path, Settings};
use crate::domain::Category;
use crate::presentation::Session;

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let config = cli.config.as_deref();
    match &cli.command {
        None => cmd_session(Settings::load(config)?, None),
        Some(Commands::Session { income }) => cmd_session(Settings::load(config)?, income.as_deref()),
        Some(Commands::Run {
            script,
            income,
            quiet,
        }) => cmd_run(Settings::load(config)?, script, income.as_deref(), *quiet),
        Some(Commands::Categories) => cmd_categories(),
        Some(Commands::Config { command }) => cmd_config(command, config),
        Some(Commands::Completion { shell }) => cmd_completion(*shell),
    }
}

fn new_document(settings: &Settings, income: Option<&str>) -> CostDocument {
    let mut document = CostDocument::from_settings(settings);
    if let Some(raw) = income {
        document.set_income(raw);
    }
    document
}

#[instrument(level = "debug", skip(settings))]
fn cmd_session(settings: Settings, income: Option<&str>) -> CliResult<()> {
    let mut session = Session::new(new_document(&settings, income), settings);
    let mut editor = DefaultEditor::new().map_err(|e| ApplicationError::OperationFailed {
        context: "open line editor".to_string(),
        source: Box::new(e),
    })?;
    let mut stdout = io::stdout();
    session.run_interactive(&mut editor, &mut stdout)?;
    writeln!(stdout).with_context("write stdout")?;
    Ok(())
}

#[instrument(level = "debug", skip(settings))]
fn cmd_run(mut settings: Settings, script: &Path, income: Option<&str>, quiet: bool) -> CliResult<()> {
    // a script renders once at the end, not after each line
    settings.render_after_edit = false;
    let mut session = Session::new(new_document(&settings, income), settings);
    let mut stdout = io::stdout();

    let input: Box<dyn BufRead> = if script == Path::new("-") {
        Box::new(BufReader::new(io::stdin()))
    } else {
        let path = expand_path(script);
        debug!("running script {}", path.display());
        let file = File::open(&path).map_err(|e| CliError::io(&path, e))?;
        Box::new(BufReader::new(file))
    };

    session
        .run(input, &mut stdout)
        .with_path_context("run script", script)?;
    if !quiet {
        session.write_view(&mut stdout).with_context("write stdout")?;
    }
    Ok(())
}

fn cmd_categories() -> CliResult<()> {
    output::header("Cost-of-quality categories");
    for category in Category::ALL {
        let kind = if category.is_poor_quality() {
            "poor quality"
        } else if category.is_good_quality() {
            "good quality"
        } else {
            "unclassified"
        };
        output::detail(&format!("{:<18} {} [{}]", category.as_str(), category.label(), kind));
    }
    Ok(())
}

fn cmd_config(command: &ConfigCommands, config: Option<&Path>) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            let settings = Settings::load(config)?;
            output::info(&settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("cannot determine config directory".to_string())
            })?;
            if path.exists() && !force {
                return Err(CliError::Usage(format!(
                    "config already exists: {} (use --force to overwrite)",
                    path.display()
                )));
            }
            if let Some(dir) = path.parent() {
                fs::create_dir_all(dir).with_path_context("create config dir", dir)?;
            }
            fs::write(&path, Settings::template()).with_path_context("write config", &path)?;
            output::success(&format!("created {}", path.display()));
            Ok(())
        }
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => {
                    let state = if path.exists() { "" } else { " (not found)" };
                    output::action("global", &format!("{}{}", path.display(), state));
                }
                None => output::action("global", &"unavailable"),
            }
            if let Some(path) = config {
                let path = expand_path(path);
                let state = if path.exists() { "" } else { " (not found)" };
                output::action("explicit", &format!("{}{}", path.display(), state));
            }
            Ok(())
        }
    }
}

fn cmd_completion(shell: Shell) -> CliResult<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
