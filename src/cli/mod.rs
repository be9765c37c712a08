//! CLI interface for Mythos.

pub mod handlers;
pub mod output;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{CommandFactory, Parser, Subcommand};

use crate::api::DEFAULT_DEPTH;
use crate::init::AppContext;
use output::OutputMode;

/// Mythos - narrative arc construction over symbolic events
#[derive(Parser)]
#[command(name = "mythos", version, about, long_about = None)]
pub struct Cli {
    /// Override data directory (default: ~/.mythos)
    #[arg(long, env = "MYTHOS_DATA_PATH", global = true)]
    pub data_path: Option<PathBuf>,

    /// Output as JSON instead of human-readable format
    #[arg(long, global = true)]
    pub json: bool,

    /// Output as Markdown
    #[arg(long, global = true)]
    pub md: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Ingest a symbolic event
    Ingest {
        #[arg(long)]
        title: String,
        /// Comma-separated keywords
        #[arg(long, default_value = "")]
        keywords: String,
        /// Narrative fragment
        #[arg(long)]
        fragment: String,
    },

    /// Show one event
    Get {
        event_id: String,
    },

    /// List all events in insertion order
    List,

    /// Construct a narrative arc from a seed event
    Arc {
        /// Seed event ID
        seed: String,
        /// Maximum number of events in the arc (1-10)
        #[arg(long, default_value_t = DEFAULT_DEPTH)]
        depth: usize,
    },

    /// Arc history, newest first
    Arcs,

    /// Mythic resonance of a recorded arc
    Resonance {
        arc_id: String,
    },

    /// Ingest events from YAML (stdin or file)
    Batch {
        /// YAML file path (reads stdin if omitted)
        #[arg(long)]
        file: Option<String>,
    },

    /// World management
    #[command(subcommand)]
    World(WorldCommands),

    /// Run a JSON action envelope (stdin or file) and print the response
    Handle {
        /// JSON file path (reads stdin if omitted)
        #[arg(long)]
        file: Option<String>,
    },

    /// Print the JSON schema of action requests
    Schema,

    /// Generate shell completions
    Completions {
        /// Shell type (bash, zsh, fish, elvish, powershell)
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand)]
pub enum WorldCommands {
    /// Counts, data path and enrichment status
    Status,
    /// Add the three genesis events (evt_001..evt_003)
    Seed,
    /// Export events and arcs as JSON
    Export {
        /// Output file (stdout if omitted)
        #[arg(long)]
        output: Option<String>,
    },
    /// Import events and arcs from a JSON export
    Import {
        file: String,
        /// Show what would be imported without changing anything
        #[arg(long)]
        dry_run: bool,
    },
}

impl Commands {
    /// Whether the command can change the world and needs a save afterwards.
    pub fn mutates(&self) -> bool {
        matches!(
            self,
            Commands::Ingest { .. }
                | Commands::Arc { .. }
                | Commands::Batch { .. }
                | Commands::Handle { .. }
                | Commands::World(WorldCommands::Seed)
                | Commands::World(WorldCommands::Import { dry_run: false, .. })
        )
    }

    /// Whether the command needs the world loaded at all.
    pub fn needs_context(&self) -> bool {
        !matches!(self, Commands::Schema | Commands::Completions { .. })
    }
}

/// Commands that run without a data directory.
pub fn execute_standalone(command: &Commands) -> anyhow::Result<()> {
    match command {
        Commands::Schema => handlers::action::handle_schema(),
        Commands::Completions { shell } => {
            clap_complete::generate(*shell, &mut Cli::command(), "mythos", &mut std::io::stdout());
            Ok(())
        }
        _ => anyhow::bail!("command requires a data directory"),
    }
}

pub async fn execute(
    command: &Commands,
    ctx: &Arc<AppContext>,
    mode: OutputMode,
) -> anyhow::Result<()> {
    match command {
        Commands::Ingest {
            title,
            keywords,
            fragment,
        } => handlers::event::handle_ingest(ctx, title, keywords, fragment, mode).await?,
        Commands::Get { event_id } => handlers::event::handle_get(ctx, event_id, mode).await?,
        Commands::List => handlers::event::handle_list(ctx, mode).await?,

        Commands::Arc { seed, depth } => handlers::arc::handle_arc(ctx, seed, *depth, mode).await?,
        Commands::Arcs => handlers::arc::handle_arcs(ctx, mode).await?,
        Commands::Resonance { arc_id } => {
            handlers::arc::handle_resonance(ctx, arc_id, mode).await?
        }

        Commands::Batch { file } => handlers::batch::handle_batch(ctx, file.as_deref(), mode).await?,

        Commands::World(cmd) => match cmd {
            WorldCommands::Status => handlers::world::handle_status(ctx, mode).await?,
            WorldCommands::Seed => handlers::world::handle_seed(ctx, mode).await?,
            WorldCommands::Export { output } => {
                handlers::world::handle_export(ctx, output.as_deref(), mode).await?
            }
            WorldCommands::Import { file, dry_run } => {
                handlers::world::handle_import(ctx, file, *dry_run, mode).await?
            }
        },

        Commands::Handle { file } => handlers::action::handle_action(ctx, file.as_deref()).await?,

        Commands::Schema | Commands::Completions { .. } => execute_standalone(command)?,
    }

    if command.mutates() {
        ctx.persist().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_arc_with_depth() {
        let cli = Cli::try_parse_from(["mythos", "arc", "evt_001", "--depth", "5"]).unwrap();
        match cli.command {
            Commands::Arc { seed, depth } => {
                assert_eq!(seed, "evt_001");
                assert_eq!(depth, 5);
            }
            _ => panic!("expected arc command"),
        }
    }

    #[test]
    fn test_arc_depth_defaults_to_three() {
        let cli = Cli::try_parse_from(["mythos", "arc", "evt_001"]).unwrap();
        assert!(matches!(cli.command, Commands::Arc { depth: 3, .. }));
    }

    #[test]
    fn test_read_only_commands_do_not_persist() {
        for args in [
            vec!["mythos", "list"],
            vec!["mythos", "arcs"],
            vec!["mythos", "world", "export"],
            vec!["mythos", "schema"],
        ] {
            let cli = Cli::try_parse_from(args.clone()).unwrap();
            assert!(!cli.command.mutates(), "{:?} should be read-only", args);
        }
        let cli = Cli::try_parse_from(["mythos", "world", "seed"]).unwrap();
        assert!(cli.command.mutates());
    }
}
