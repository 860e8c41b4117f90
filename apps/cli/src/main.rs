//! relsync CLI - optimistic like/follow toggles and post edits from the
//! terminal.

mod commands;
mod output;
mod terminal;

use clap::{Parser, Subcommand, ValueEnum};
use optimistic_toggle_core::RelationKind;
use relsync_config_and_utils::{init_logging, Config, Paths};
use tracing::debug;

/// relsync - Toggle likes and follows against the store of record.
#[derive(Parser)]
#[command(name = "relsync")]
#[command(about = "Toggle likes and follows and edit posts against a relation store")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Store origin, e.g. https://network.example
    #[arg(long, env = "RELSYNC_ORIGIN", global = true)]
    origin: Option<String>,

    /// CSRF token sent with every request
    #[arg(long, env = "RELSYNC_CSRF_TOKEN", global = true, hide_env_values = true)]
    csrf_token: Option<String>,

    /// Undo the local change if the store rejects it
    #[arg(long, global = true)]
    rollback: bool,

    /// Extra attempts after a failed request
    #[arg(long, global = true)]
    retries: Option<u32>,

    /// Output format (text or json)
    #[arg(short, long, default_value = "text", global = true)]
    format: output::OutputFormat,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,
}

/// Which relation to operate on.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
enum KindArg {
    #[default]
    Like,
    Follow,
}

impl From<KindArg> for RelationKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Like => RelationKind::Like,
            KindArg::Follow => RelationKind::Follow,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Like a post or follow a profile
    Assert {
        /// Post or profile ID
        target: String,
        #[arg(short, long, value_enum, default_value_t)]
        kind: KindArg,
        /// Count as currently displayed
        #[arg(short, long, default_value = "0")]
        count: u64,
    },

    /// Unlike a post or unfollow a profile
    Retract {
        /// Post or profile ID
        target: String,
        #[arg(short, long, value_enum, default_value_t)]
        kind: KindArg,
        /// Count as currently displayed
        #[arg(short, long, default_value = "0")]
        count: u64,
    },

    /// Flip the relation from its displayed state
    Toggle {
        /// Post or profile ID
        target: String,
        #[arg(short, long, value_enum, default_value_t)]
        kind: KindArg,
        /// The relation is currently asserted
        #[arg(long)]
        asserted: bool,
        /// Count as currently displayed
        #[arg(short, long, default_value = "0")]
        count: u64,
    },

    /// Replace the content of one of your posts
    Edit {
        /// Post ID
        post_id: String,
        /// New content (at most 160 characters)
        #[arg(long)]
        content: String,
        /// Content as currently displayed
        #[arg(long, default_value = "")]
        original: String,
    },

    /// Inspect configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Print the config file path
    Path,
}

impl Cli {
    /// Fold command-line overrides into the loaded configuration.
    fn apply_to(&self, config: &mut Config) {
        if let Some(origin) = &self.origin {
            config.origin = origin.clone();
        }
        if let Some(token) = &self.csrf_token {
            config.csrf_token = Some(token.clone());
        }
        if self.rollback {
            config.rollback_on_failure = true;
        }
        if let Some(retries) = self.retries {
            config.max_retries = retries;
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let paths = Paths::new()?;
    let mut config = Config::load(&paths)?;
    cli.apply_to(&mut config);

    init_logging(&paths, &config.log_level, false)?;
    debug!(origin = %config.origin, "Configuration loaded");

    let format = cli.format;
    match cli.command {
        Commands::Assert {
            target,
            kind,
            count,
        } => commands::relation_assert(&config, &target, kind.into(), count, format).await,
        Commands::Retract {
            target,
            kind,
            count,
        } => commands::relation_retract(&config, &target, kind.into(), count, format).await,
        Commands::Toggle {
            target,
            kind,
            asserted,
            count,
        } => {
            commands::relation_toggle(&config, &target, kind.into(), asserted, count, format).await
        }
        Commands::Edit {
            post_id,
            content,
            original,
        } => commands::post_edit(&config, &post_id, &original, &content, format).await,
        Commands::Config { command } => match command {
            ConfigCommands::Show => commands::config_show(&config, format),
            ConfigCommands::Path => commands::config_path(&paths, format),
        },
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let format = cli.format;

    if let Err(e) = run(cli).await {
        output::print_error(&format!("{:#}", e), &format);
        std::process::exit(1);
    }
}
