use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "listsqre",
    bin_name = "listsqre",
    version,
    disable_help_subcommand = true
)]
#[command(about = "Cards of lists, kept in SQLite tables or plain delimited files", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Data directory (default: $LISTSQRE_DATA_DIR, then the OS data directory)
    #[arg(long, global = true, value_name = "DIR", help_heading = "Options")]
    pub data: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true, help_heading = "Options")]
    pub json: bool,

    /// Verbose logging on stderr (-v debug, -vv trace)
    #[arg(short, long, global = true, action = ArgAction::Count, help_heading = "Options")]
    pub verbose: u8,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create, list and remove cards
    Card {
        #[command(subcommand)]
        action: CardCommands,
    },

    /// Edit a card's fields in its SQLite table
    Field {
        #[command(subcommand)]
        action: FieldCommands,
    },

    /// Edit a card's fields in its flat file
    File {
        #[command(subcommand)]
        action: FileCommands,
    },

    /// Edit a card's items in the shared items table
    Item {
        #[command(subcommand)]
        action: ItemCommands,
    },

    /// Store and list reminders
    Reminder {
        #[command(subcommand)]
        action: ReminderCommands,
    },

    /// Show configuration
    Config {
        #[command(subcommand)]
        action: Option<ConfigCommands>,
    },
}

#[derive(Subcommand, Debug)]
pub enum CardCommands {
    /// Create a card
    Add {
        title: String,
        #[arg(default_value = "")]
        description: String,
    },

    /// List cards, pinned first
    #[command(alias = "ls")]
    List,

    /// Delete a card with its fields and its file
    Rm { card: i64 },

    /// Toggle a card's pin
    Pin { card: i64 },

    /// Mark a card as selected (or unselected with --clear)
    Select {
        card: i64,
        #[arg(long)]
        clear: bool,
    },

    /// Pin every selected card
    PinSelected,

    /// Delete every selected card
    PurgeSelected,
}

#[derive(Subcommand, Debug)]
pub enum FieldCommands {
    /// Add a field
    Add {
        card: i64,
        title: String,
        #[arg(default_value = "")]
        description: String,
    },

    /// List fields, pinned first
    #[command(alias = "ls")]
    List { card: i64 },

    /// Rewrite a field's title and description
    Update {
        card: i64,
        id: i64,
        title: String,
        #[arg(default_value = "")]
        description: String,
    },

    /// Delete a field
    Rm { card: i64, id: i64 },

    /// Toggle a field's pin
    Pin { card: i64, id: i64 },

    /// Toggle a field's selection
    Select { card: i64, id: i64 },

    /// Delete every selected field
    PurgeSelected { card: i64 },
}

#[derive(Subcommand, Debug)]
pub enum FileCommands {
    /// Create the card's file if needed and print its path
    Open { card: i64 },

    /// Append a field
    Add {
        card: i64,
        title: String,
        #[arg(default_value = "")]
        description: String,
        #[arg(long)]
        pin: bool,
    },

    /// List fields in file order
    #[command(alias = "ls")]
    List { card: i64 },

    /// Rewrite a field's title and description
    Update {
        card: i64,
        index: i64,
        title: String,
        #[arg(default_value = "")]
        description: String,
    },

    /// Delete fields by index; later fields are renumbered
    Rm {
        card: i64,
        #[arg(required = true)]
        indexes: Vec<i64>,
    },

    /// Toggle a field's pin
    Pin { card: i64, index: i64 },
}

#[derive(Subcommand, Debug)]
pub enum ItemCommands {
    /// Add an item
    Add {
        card: i64,
        description: String,
        #[arg(long)]
        pin: bool,
    },

    /// List items, pinned first
    #[command(alias = "ls")]
    List { card: i64 },

    /// Rewrite an item's description
    Update {
        card: i64,
        id: i64,
        description: String,
    },

    /// Delete items by id
    Rm {
        card: i64,
        #[arg(required = true)]
        ids: Vec<i64>,
    },

    /// Pin items by id (or unpin with --unpin)
    Pin {
        card: i64,
        #[arg(required = true)]
        ids: Vec<i64>,
        #[arg(long)]
        unpin: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ReminderCommands {
    /// Store a reminder, replacing any with the same unique id
    Add {
        unique_id: i64,
        description: String,
        /// When to notify: RFC 3339 timestamp or epoch milliseconds
        #[arg(long)]
        at: String,
    },

    /// List reminders, latest first
    #[command(alias = "ls")]
    List,

    /// Delete a reminder by id (or by unique id with --unique)
    Rm {
        id: i64,
        #[arg(long)]
        unique: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,

    /// Print a sample listsqre.toml
    Gen,
}

pub fn parse_cli() -> Cli {
    Cli::parse()
}
