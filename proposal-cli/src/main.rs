use std::path::PathBuf;

use anyhow::Context;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::debug;

use proposal_cli::app::{self, SaveRequest};
use proposal_cli::config::AppConfig;
use proposal_cli::{logging, render};
use proposal_core::{ProposalStatus, Recipient};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Quotes proposal drafts and keeps track of sent proposals.
///
/// Settings are read from `proposals.toml` in the working directory when it
/// exists; flags given here take precedence.
#[derive(Debug, Parser)]
#[command(name = "proposals", version)]
struct Cli {
    /// Config file to read instead of `proposals.toml`.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Database backend to use.
    #[arg(long, global = true)]
    backend: Option<String>,

    /// Database connection string.
    /// For SQLite this is a file path (e.g. `proposals.db`) or `:memory:`.
    #[arg(long, global = true)]
    db: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print totals and the payment schedule for a draft file.
    Quote { draft: PathBuf },

    #[command(flatten)]
    Stored(StoredCommand),
}

/// Commands that work on the proposal database.
#[derive(Debug, Subcommand)]
enum StoredCommand {
    /// Store a draft file as a new proposal.
    Save {
        draft: PathBuf,
        #[arg(long)]
        title: String,
        /// Recipient name.
        #[arg(long)]
        recipient: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        company: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },

    /// List stored proposals, newest first.
    List {
        /// Only proposals with this status (draft, sent, accepted, declined).
        #[arg(long, value_parser = parse_status)]
        status: Option<ProposalStatus>,
    },

    /// Show one proposal with its quote.
    Show { id: i64 },

    /// Mark a proposal as sent.
    Send { id: i64 },

    /// Record the client's acceptance.
    Accept {
        id: i64,
        /// Required when the proposal includes a contract.
        #[arg(long)]
        signature: Option<String>,
    },

    /// Mark a proposal as declined.
    Decline { id: i64 },

    /// Copy a proposal into a new draft.
    Duplicate { id: i64 },

    /// Delete a proposal.
    Delete { id: i64 },
}

fn parse_status(s: &str) -> Result<ProposalStatus, String> {
    ProposalStatus::parse(s).ok_or_else(|| format!("unknown status '{s}'"))
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?.with_overrides(cli.backend, cli.db);
    logging::init_logging(&config.logging.level, config.logging.file.as_deref())
        .context("Failed to initialize logging")?;

    let command = match cli.command {
        Command::Quote { draft } => {
            let draft = app::read_draft(&draft, &config.defaults)?;
            println!("{}", render::render_quote(&draft, &draft.quote()));
            return Ok(());
        }
        Command::Stored(command) => command,
    };

    let db_config = config.db_config();
    debug!("connecting to {} backend", db_config.backend);
    let registry = app::build_registry();
    let repo = registry
        .create(&db_config)
        .await
        .with_context(|| format!("Failed to open {} database", db_config.backend))?;
    let repo = &*repo;

    match command {
        StoredCommand::Save {
            draft,
            title,
            recipient,
            email,
            company,
            description,
        } => {
            let draft = app::read_draft(&draft, &config.defaults)?;
            let request = SaveRequest {
                title,
                description,
                recipient: Recipient {
                    name: recipient,
                    email,
                    company,
                },
            };
            let proposal = app::save_proposal(repo, draft, request).await?;
            println!("{}", render::render_proposal(&proposal));
        }
        StoredCommand::List { status } => {
            let proposals = app::list_proposals(repo, status).await?;
            println!("{}", render::render_list(&proposals));
        }
        StoredCommand::Show { id } => {
            let proposal = app::show_proposal(repo, id).await?;
            println!("{}", render::render_proposal(&proposal));
        }
        StoredCommand::Send { id } => {
            let proposal = app::send_proposal(repo, id, Utc::now()).await?;
            println!("{}", render::render_proposal(&proposal));
        }
        StoredCommand::Accept { id, signature } => {
            let proposal =
                app::accept_proposal(repo, id, signature.as_deref(), Utc::now()).await?;
            println!("{}", render::render_proposal(&proposal));
        }
        StoredCommand::Decline { id } => {
            let proposal = app::decline_proposal(repo, id).await?;
            println!("{}", render::render_proposal(&proposal));
        }
        StoredCommand::Duplicate { id } => {
            let proposal = app::duplicate_proposal(repo, id).await?;
            println!("{}", render::render_proposal(&proposal));
        }
        StoredCommand::Delete { id } => {
            app::delete_proposal(repo, id).await?;
            println!("Deleted proposal {id}.");
        }
    }

    Ok(())
}
