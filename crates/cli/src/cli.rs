//! Command-line interface definition using clap.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use roombook_domain::{ImportMode, OrphanPolicy};

/// Roombook - batch import of school events and room bookings into the SIS
#[derive(Parser, Debug)]
#[command(name = "roombook")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to a TOML or JSON config file
    #[arg(short, long, global = true, env = "ROOMBOOK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable verbose output (-v, -vv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Import every row of a CSV file and write a report with one status per row
    Import(ImportArgs),

    /// Manage school event types
    #[command(subcommand)]
    EventTypes(EventTypeCommand),

    /// Look up and block rooms
    #[command(subcommand)]
    Rooms(RoomCommand),

    /// Look up staff members
    #[command(subcommand)]
    Staff(StaffCommand),

    /// List and delete school events
    #[command(subcommand)]
    Events(EventCommand),
}

#[derive(Args, Debug, Clone)]
pub struct ImportArgs {
    /// Input CSV file
    #[arg(short, long)]
    pub input: PathBuf,

    /// Report CSV file (input columns plus status)
    #[arg(short, long)]
    pub output: PathBuf,

    /// What to create per row (events, unavailability)
    #[arg(long)]
    pub mode: Option<ImportMode>,

    /// What to do with an event whose participant could not be added (keep, delete)
    #[arg(long)]
    pub orphan_policy: Option<OrphanPolicy>,

    /// Repeat every room and staff lookup instead of caching per run
    #[arg(long)]
    pub no_cache: bool,

    /// Validate rows and resolve lookups without creating anything
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Subcommand, Debug)]
pub enum EventTypeCommand {
    /// List all event types
    List,

    /// Show one event type
    Get { code: String },

    /// Create an active event type
    Create { code: String, name: String },

    /// Change an event type's code and display name
    Update {
        code: String,
        new_code: String,
        name: String,

        /// Mark the event type inactive
        #[arg(long)]
        inactive: bool,
    },

    /// Enable an event type
    Enable { code: String },

    /// Disable an event type
    Disable { code: String },

    /// Delete an event type
    Delete { code: String },
}

#[derive(Subcommand, Debug)]
pub enum RoomCommand {
    /// Resolve a room by display name
    Lookup { name: String },

    /// Mark a room unavailable for a time window
    Block {
        name: String,

        #[arg(long)]
        start: String,

        #[arg(long)]
        end: String,

        #[arg(long)]
        reason: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum StaffCommand {
    /// Find the staff member owning an email address
    Lookup {
        email: String,

        /// Email address type (defaults to the configured type)
        #[arg(long)]
        address_type: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum EventCommand {
    /// List all school events
    List,

    /// Delete one school event by id
    Delete { id: String },

    /// Delete every school event of an event type
    Purge {
        #[arg(long)]
        event_type: String,
    },
}

impl Commands {
    /// Stable name for logs, e.g. `event-types::create`
    pub fn name(&self) -> &'static str {
        match self {
            Self::Import(_) => "import",
            Self::EventTypes(command) => match command {
                EventTypeCommand::List => "event-types::list",
                EventTypeCommand::Get { .. } => "event-types::get",
                EventTypeCommand::Create { .. } => "event-types::create",
                EventTypeCommand::Update { .. } => "event-types::update",
                EventTypeCommand::Enable { .. } => "event-types::enable",
                EventTypeCommand::Disable { .. } => "event-types::disable",
                EventTypeCommand::Delete { .. } => "event-types::delete",
            },
            Self::Rooms(RoomCommand::Lookup { .. }) => "rooms::lookup",
            Self::Rooms(RoomCommand::Block { .. }) => "rooms::block",
            Self::Staff(StaffCommand::Lookup { .. }) => "staff::lookup",
            Self::Events(command) => match command {
                EventCommand::List => "events::list",
                EventCommand::Delete { .. } => "events::delete",
                EventCommand::Purge { .. } => "events::purge",
            },
        }
    }
}
