//! Command dispatch

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::services::TreeRequest;
use crate::application::{
    format_probability, ApplicationError, ApplicationResult, InputCollector, OutputFormat,
    TreeDiagram,
};
use crate::cli::args::{Cli, Commands, ConfigCommands, OutputArgs};
use crate::cli::error::{CliError, CliResult};
use crate::cli::output;
use crate::config::{global_config_path, Settings};
use crate::domain::{Outcome, OutcomeSet};
use crate::infrastructure::di::ServiceContainer;
use crate::infrastructure::traits::FileSystem;
use crate::infrastructure::{InfraError, InfraResult};
use crate::util::path::expand_path;

/// Execute the parsed command line.
pub fn execute_command(cli: &Cli) -> CliResult<()> {
    // completions need no settings
    if let Some(Commands::Completion { shell }) = &cli.command {
        let mut cmd = Cli::command();
        let name = cmd.get_name().to_string();
        generate(*shell, &mut cmd, name, &mut io::stdout());
        return Ok(());
    }

    let config_path = cli.config.as_deref().map(expand_path).transpose()?;
    let settings = Settings::load(config_path.as_deref())?;
    let container = ServiceContainer::new(settings);

    match &cli.command {
        None => cmd_interactive(&container, &OutputArgs::default()),
        Some(Commands::Interactive { output }) => cmd_interactive(&container, output),
        Some(Commands::Build {
            event,
            outcomes,
            trials,
            output,
        }) => cmd_build(&container, event, outcomes, *trials, output),
        Some(Commands::Config { command }) => cmd_config(&container, command),
        Some(Commands::Completion { .. }) => Ok(()),
    }
}

#[instrument(level = "debug", skip(container))]
fn cmd_interactive(container: &ServiceContainer, args: &OutputArgs) -> CliResult<()> {
    let collector = InputCollector::new(
        container.prompter.as_ref(),
        container.settings.probability_tolerance,
    );
    let request = collector.collect()?;
    container.prompter.notify("Generating tree...");
    draw(container, &request, args)
}

#[instrument(level = "debug", skip(container, outcomes))]
fn cmd_build(
    container: &ServiceContainer,
    event: &str,
    outcomes: &[Outcome],
    trials: u32,
    args: &OutputArgs,
) -> CliResult<()> {
    let outcomes = outcome_set_from_args(outcomes, container.settings.probability_tolerance)?;

    let request = TreeRequest {
        event: event.to_string(),
        outcomes,
        trials,
    };
    draw(container, &request, args)
}

/// Outcomes given on the command line: unique names, summing to 1 within `tolerance`.
///
/// There is nobody to re-ask, so a bad sum is `InvalidInput`.
pub fn outcome_set_from_args(
    outcomes: &[Outcome],
    tolerance: f64,
) -> ApplicationResult<OutcomeSet> {
    let set = OutcomeSet::try_from(outcomes.to_vec())?;
    if !set.sums_to_one(tolerance) {
        return Err(ApplicationError::invalid_input(format!(
            "outcome probabilities must sum to 1, got {}",
            set.total_probability()
        )));
    }
    Ok(set)
}

fn draw(container: &ServiceContainer, request: &TreeRequest, args: &OutputArgs) -> CliResult<()> {
    let service = container.tree_service();
    let diagram = service.generate(request)?;

    let target = args.output.as_deref().map(expand_path).transpose()?;
    let format = resolve_format(
        args.format,
        target.as_deref(),
        container.settings.render.format,
    );
    debug!("format: {}, target: {:?}", format, target);

    match &target {
        Some(path) => {
            service.export(&diagram, format, path)?;
            output::success(&format!(
                "Wrote {} diagram ({} nodes) to {}",
                format,
                diagram.node_count(),
                path.display()
            ));
        }
        None => output::info(&service.render(&diagram, format)),
    }

    if args.summary {
        print_summary(&diagram, container.settings.probability_tolerance);
    }
    Ok(())
}

/// `--format` wins, then the output file extension, then the configured default.
pub fn resolve_format(
    explicit: Option<OutputFormat>,
    target: Option<&Path>,
    configured: OutputFormat,
) -> OutputFormat {
    explicit
        .or_else(|| target.and_then(OutputFormat::from_path))
        .unwrap_or(configured)
}

fn print_summary(diagram: &TreeDiagram, tolerance: f64) {
    output::header(&format!(
        "{}: {} nodes, {} edges",
        diagram.event,
        diagram.node_count(),
        diagram.edge_count()
    ));
    for band in diagram.band_summaries() {
        let ok = (band.total_probability - 1.0).abs() <= tolerance.max(1e-9);
        output::band(
            ok,
            &format!(
                "depth {:>3}: {:>7} nodes, total {}",
                band.depth,
                band.nodes,
                format_probability(band.total_probability)
            ),
        );
    }
}

fn cmd_config(container: &ServiceContainer, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => {
            output::info(&container.settings.to_toml()?);
            Ok(())
        }
        ConfigCommands::Path => {
            output::header("Config paths");
            match global_config_path() {
                Some(path) => {
                    let marker = if container.fs.exists(&path) {
                        "exists"
                    } else {
                        "not found"
                    };
                    output::detail(&format!("global: {} ({})", path.display(), marker));
                }
                None => output::detail("global: no home directory"),
            }
            output::detail("env:    PROBTREE_* (e.g. PROBTREE_LAYOUT__VERTICAL_SPACING=4)");
            Ok(())
        }
        ConfigCommands::Init { force } => {
            let path = global_config_path().ok_or_else(|| {
                CliError::Usage("cannot determine config directory".to_string())
            })?;
            init_config(container.fs.as_ref(), &path, *force)?;
            output::success(&format!("Created {}", path.display()));
            Ok(())
        }
    }
}

/// Write the config template to `path`; an existing file is kept unless `force`.
pub fn init_config(fs: &dyn FileSystem, path: &Path, force: bool) -> CliResult<()> {
    if fs.exists(path) && !force {
        return Err(CliError::Usage(format!(
            "config already exists: {} (use --force to overwrite)",
            path.display()
        )));
    }
    write_template(fs, path)?;
    Ok(())
}

fn write_template(fs: &dyn FileSystem, path: &Path) -> InfraResult<()> {
    fs.ensure_parent(path)
        .map_err(|e| InfraError::io(format!("create config directory for {}", path.display()), e))?;
    fs.write(path, &Settings::template())
        .map_err(|e| InfraError::io(format!("write config {}", path.display()), e))?;
    debug!("wrote config template to {}", path.display());
    Ok(())
}
