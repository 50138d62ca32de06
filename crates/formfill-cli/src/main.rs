mod cmd;
mod output;

use clap::{Parser, Subcommand};
use formfill_core::{ErrorKind, Store, StoreError};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "formfill",
    about = "Manage personal and family data used to autofill PDF forms",
    version,
    propagate_version = true
)]
struct Cli {
    /// Path to personal_data.json (default: $PDF_FORM_FILLER_DATA, then ~/.config/pdf-form-filler/)
    #[arg(long, global = true, value_name = "PATH")]
    data_file: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data file, empty or seeded from a template
    Init {
        /// Template document to seed members from
        #[arg(long, value_name = "PATH")]
        template: Option<PathBuf>,
    },

    /// Show stored data, optionally a single member
    Show {
        /// Member ID (e.g. child_1)
        #[arg(long)]
        member: Option<String>,
    },

    /// Set one field; nested fields use dot notation (health.allergies)
    Update {
        #[arg(long)]
        member: String,
        /// Dot-path of the field
        #[arg(long)]
        field: String,
        /// New value, stored as text
        #[arg(long, allow_hyphen_values = true)]
        value: String,
    },

    /// Set several fields at once from a JSON object of dot-path to value
    BatchUpdate {
        #[arg(long)]
        member: String,
        /// e.g. '{"first_name":"Jan","address.city":"Brno"}'
        #[arg(long, value_name = "JSON")]
        updates: String,
    },

    /// Add a family member with placeholder fields for the role
    AddMember {
        #[arg(long)]
        id: String,
        /// self, parent, child, or other
        #[arg(long)]
        role: String,
    },

    /// List fields of a member that are missing or empty
    FindGaps {
        #[arg(long)]
        member: String,
        /// Comma-separated dot-paths to check instead of the role's fields
        #[arg(long, value_name = "CSV")]
        fields: Option<String>,
    },

    /// Print the resolved data-file location and whether it exists
    Path,
}

fn exit_code(kind: Option<ErrorKind>) -> i32 {
    match kind {
        Some(ErrorKind::NotFound) => 3,
        Some(ErrorKind::AlreadyExists) => 4,
        Some(ErrorKind::InvalidPath) => 5,
        Some(ErrorKind::ParseError) => 6,
        Some(ErrorKind::IoError) => 7,
        None => 1,
    }
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let store = Store::resolve(cli.data_file.as_deref())?;
    tracing::debug!(path = %store.path().display(), "resolved data file");

    let json = cli.json;
    match cli.command {
        Commands::Init { template } => cmd::init::run(&store, template.as_deref(), json),
        Commands::Show { member } => cmd::show::run(&store, member.as_deref()),
        Commands::Update {
            member,
            field,
            value,
        } => cmd::update::run(&store, &member, &field, &value, json),
        Commands::BatchUpdate { member, updates } => {
            cmd::update::run_batch(&store, &member, &updates, json)
        }
        Commands::AddMember { id, role } => cmd::member::add(&store, &id, &role, json),
        Commands::FindGaps { member, fields } => {
            cmd::gaps::run(&store, &member, fields.as_deref(), json)
        }
        Commands::Path => cmd::path::run(&store, json),
    }
}

fn main() {
    let cli = Cli::parse();

    // Logs go to stderr so stdout stays parseable for the calling agent.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let json = cli.json;
    if let Err(e) = run(cli) {
        let kind = e.downcast_ref::<StoreError>().map(StoreError::kind);
        output::print_error(&e, kind, json);
        std::process::exit(exit_code(kind));
    }
}
