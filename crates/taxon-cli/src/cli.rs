//! CLI argument definitions using clap derive macros.

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand, ValueHint};

use taxon_common_config::{vars, ConfigLoader, Environment, TaxonConfig};
use taxon_common_log::LogLevel;
use taxon_tree::BuildInputs;

use crate::commands::{
    AnalyzeCommand, BatchCommand, BuildCommand, CleanupCommand, NormalizeCommand, PlanCommand,
    SingleCommand,
};
use crate::error::CliError;

/// Taxon - Creative Tech Taxonomy tooling
///
/// Build the consolidated taxonomy, find weak entries and enhance them.
#[derive(Debug, Parser)]
#[command(
    name = "taxon",
    author,
    version,
    about,
    long_about = None,
    propagate_version = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Increase verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all log output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(
        short,
        long,
        global = true,
        env = "TAXON_CONFIG",
        value_hint = ValueHint::FilePath
    )]
    pub config: Option<PathBuf>,

    /// Directory holding the category fragments, index and metadata shell
    #[arg(long, global = true, value_hint = ValueHint::DirPath)]
    pub data_dir: Option<PathBuf>,

    /// Consolidated taxonomy output file
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    pub output: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Merge the category fragments into the consolidated taxonomy
    Build(BuildCommand),

    /// Score every node and export the weak ones
    Analyze(AnalyzeCommand),

    /// Plan enhancement batches and write a batch work file
    Plan(PlanCommand),

    /// Enhance the nodes of one batch work file
    Single(SingleCommand),

    /// Plan and enhance several batches in one run
    Batch(BatchCommand),

    /// Collapse duplicate and backup copies of category files
    Cleanup(CleanupCommand),

    /// Upgrade a legacy taxonomy document to the current schema
    Normalize(NormalizeCommand),
}

impl Cli {
    /// Log level from `-v`/`-q`, or `None` to defer to the environment.
    pub fn log_level(&self) -> Option<LogLevel> {
        if self.quiet {
            return Some(LogLevel::Error);
        }
        match self.verbose {
            0 => None,
            1 => Some(LogLevel::Info),
            2 => Some(LogLevel::Debug),
            _ => Some(LogLevel::Trace),
        }
    }

    /// Load configuration from `--config` or `.taxon/config.yaml` in the
    /// current directory, then apply command-line and environment overrides.
    pub fn load_config(&self) -> Result<CommandContext, CliError> {
        let root = std::env::current_dir()?;
        let loader = ConfigLoader::new(&root);

        let mut config = match &self.config {
            Some(path) => loader.load_file(path)?,
            None => loader.load()?,
        };
        loader.validate(&config)?;

        if let Some(data_dir) = &self.data_dir {
            config.paths.data_dir = data_dir.clone();
        }
        if let Some(output) = &self.output {
            config.paths.output_file = output.clone();
        }
        if let Some(base_url) = Environment::get(vars::TAXON_API_BASE_URL) {
            config.service.base_url = base_url;
        }

        Ok(CommandContext { config, root })
    }

    /// Execute the selected command
    pub async fn execute(self, ctx: CommandContext) -> Result<(), CliError> {
        match self.command {
            Command::Build(cmd) => cmd.execute(&ctx),
            Command::Analyze(cmd) => cmd.execute(&ctx),
            Command::Plan(cmd) => cmd.execute(&ctx),
            Command::Single(cmd) => cmd.execute(&ctx).await,
            Command::Batch(cmd) => cmd.execute(&ctx).await,
            Command::Cleanup(cmd) => cmd.execute(&ctx),
            Command::Normalize(cmd) => cmd.execute(&ctx),
        }
    }
}

/// Context passed to all commands
#[derive(Debug)]
pub struct CommandContext {
    pub config: TaxonConfig,
    /// Directory relative paths resolve against.
    pub root: PathBuf,
}

impl CommandContext {
    pub fn new(config: TaxonConfig, root: impl Into<PathBuf>) -> Self {
        Self {
            config,
            root: root.into(),
        }
    }

    pub fn data_dir(&self) -> PathBuf {
        self.config.paths.data_path(&self.root)
    }

    pub fn output_path(&self) -> PathBuf {
        self.config.paths.output_path(&self.root)
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        self.root.join(path)
    }

    pub fn build_inputs(&self) -> BuildInputs {
        let paths = &self.config.paths;
        BuildInputs::in_data_dir(
            self.data_dir(),
            &paths.metadata_file,
            &paths.index_file,
            self.output_path(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbosity_maps_to_log_level() {
        let cli = Cli::parse_from(["taxon", "-vv", "build"]);
        assert_eq!(cli.log_level(), Some(LogLevel::Debug));

        let cli = Cli::parse_from(["taxon", "-q", "build"]);
        assert_eq!(cli.log_level(), Some(LogLevel::Error));

        let cli = Cli::parse_from(["taxon", "build"]);
        assert_eq!(cli.log_level(), None);
    }

    #[test]
    fn test_quiet_conflicts_with_verbose() {
        assert!(Cli::try_parse_from(["taxon", "-q", "-v", "build"]).is_err());
    }

    #[test]
    fn test_global_path_flags_after_subcommand() {
        let cli = Cli::parse_from(["taxon", "analyze", "--data-dir", "data", "--output", "out.json"]);
        assert_eq!(cli.data_dir, Some(PathBuf::from("data")));
        assert_eq!(cli.output, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn test_context_resolves_paths_against_root() {
        let ctx = CommandContext::new(TaxonConfig::default(), "/project");
        let inputs = ctx.build_inputs();
        assert_eq!(inputs.data_dir, PathBuf::from("/project/taxonomy-data"));
        assert_eq!(inputs.index_path, PathBuf::from("/project/taxonomy-data/_index.json"));
        assert_eq!(
            inputs.output_path,
            PathBuf::from("/project/public/Creative_Tech_Taxonomy_data.json")
        );
    }
}
