//! # CLI Layer
//!
//! The **only** place in the workspace that:
//! - Knows about terminal I/O (stdout, stderr)
//! - Installs a `tracing` subscriber
//! - Formats output for human consumption
//!
//! ## Responsibilities
//!
//! 1. **Argument Parsing**: `setup.rs` turns shell arguments into typed commands
//! 2. **Context Setup**: [`initialize`] resolves the data directory and opens
//!    the stores
//! 3. **Dispatch**: one handler per command group, each returning the text to
//!    print
//! 4. **Error Handling**: absence the user asked about ("no such card") becomes
//!    an error here, so the process exits 1

use super::render;
use super::setup::{
    parse_cli, CardCommands, Cli, Commands, ConfigCommands, FieldCommands, FileCommands,
    ItemCommands, ReminderCommands,
};
use anyhow::{anyhow, bail, Context, Result};
use chrono::DateTime;
use listsqre::api::ListsqreApi;
use listsqre::config::ListsqreConfig;
use listsqre::error::StoreError;
use listsqre::init::{initialize, ListsqreContext};
use listsqre::model::{now_millis, CardId, FieldId};
use listsqre::store::fs_backend::FsBackend;
use serde_json::json;
use tracing::debug;
use tracing_subscriber::EnvFilter;

pub fn run() -> Result<()> {
    let cli = parse_cli();
    init_logging(cli.verbose);
    let output = execute(cli)?;
    print!("{}", output);
    Ok(())
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .try_init()
        .ok();
}

/// Runs one parsed command and returns what should be printed.
fn execute(cli: Cli) -> Result<String> {
    // Naked `listsqre` lists cards.
    let command = cli.command.unwrap_or(Commands::Card {
        action: CardCommands::List,
    });

    // Generating a template needs no data directory.
    if let Commands::Config {
        action: Some(ConfigCommands::Gen),
    } = command
    {
        return Ok(ListsqreConfig::template());
    }

    let ctx = initialize(cli.data)?;
    debug!(data_dir = %ctx.data_dir.display(), "dispatching command");
    let out = Output { json: cli.json };

    match command {
        Commands::Card { action } => handle_card(&ctx.api, &out, action),
        Commands::Field { action } => handle_field(&ctx.api, &out, action),
        Commands::File { action } => handle_file(&ctx.api, &out, action),
        Commands::Item { action } => handle_item(&ctx.api, &out, action),
        Commands::Reminder { action } => handle_reminder(&ctx.api, &out, action),
        Commands::Config { .. } => handle_config_show(&ctx, &out),
    }
}

struct Output {
    json: bool,
}

impl Output {
    /// JSON of `value` with `--json`, otherwise the text from `text`.
    fn emit<T, F>(&self, value: &T, text: F) -> Result<String>
    where
        T: serde::Serialize + ?Sized,
        F: FnOnce() -> String,
    {
        if self.json {
            render::to_json(value)
        } else {
            Ok(text())
        }
    }
}

type Api = ListsqreApi<FsBackend>;

fn card_id(raw: i64) -> Result<CardId> {
    Ok(CardId::new(raw)?)
}

fn handle_card(api: &Api, out: &Output, action: CardCommands) -> Result<String> {
    match action {
        CardCommands::Add { title, description } => {
            let card = api.create_card(&title, &description)?;
            out.emit(&card, || {
                render::message(&format!("Created card {}: {}", card.id, card.title))
            })
        }
        CardCommands::List => {
            let cards = api.list_cards()?;
            out.emit(&cards, || render::render_cards(&cards))
        }
        CardCommands::Rm { card } => {
            let id = card_id(card)?;
            if !api.delete_card(id)? {
                return Err(StoreError::CardNotFound(id).into());
            }
            out.emit(&json!({ "deleted": id }), || {
                render::message(&format!("Deleted card {}", id))
            })
        }
        CardCommands::Pin { card } => {
            let mut card = api.require_card(card_id(card)?)?;
            card.is_pinned = !card.is_pinned;
            api.update_card(&card)?;
            let verb = if card.is_pinned { "Pinned" } else { "Unpinned" };
            out.emit(&card, || {
                render::message(&format!("{} card {}", verb, card.id))
            })
        }
        CardCommands::Select { card, clear } => {
            let id = card_id(card)?;
            if !api.set_card_selected(id, !clear)? {
                return Err(StoreError::CardNotFound(id).into());
            }
            let verb = if clear { "Unselected" } else { "Selected" };
            out.emit(&json!({ "id": id, "selected": !clear }), || {
                render::message(&format!("{} card {}", verb, id))
            })
        }
        CardCommands::PinSelected => {
            let pinned = api.pin_selected_cards()?;
            out.emit(&json!({ "pinned": pinned }), || {
                render::message(&format!("Pinned {} card(s)", pinned))
            })
        }
        CardCommands::PurgeSelected => {
            let removed = api.delete_selected_cards()?;
            out.emit(&removed, || {
                render::message(&format!("Deleted {} card(s)", removed.len()))
            })
        }
    }
}

fn handle_field(api: &Api, out: &Output, action: FieldCommands) -> Result<String> {
    match action {
        FieldCommands::Add {
            card,
            title,
            description,
        } => {
            let card = api.require_card(card_id(card)?)?;
            let id = api.add_field(card.id, &title, &description)?;
            out.emit(&json!({ "card": card.id, "id": id }), || {
                render::message(&format!("Added field {} to card {}", id, card.id))
            })
        }
        FieldCommands::List { card } => {
            let card = api.require_card(card_id(card)?)?;
            let fields = api.list_fields(card.id)?;
            out.emit(&fields, || render::render_fields(&fields, true))
        }
        FieldCommands::Update {
            card,
            id,
            title,
            description,
        } => {
            let card = card_id(card)?;
            let updated = api.update_field(card, id, &title, &description)?;
            field_result(out, card, id, updated, "Updated")
        }
        FieldCommands::Rm { card, id } => {
            let card = card_id(card)?;
            let deleted = api.delete_field(card, id)?;
            field_result(out, card, id, deleted, "Deleted")
        }
        FieldCommands::Pin { card, id } => {
            let card = card_id(card)?;
            let toggled = api.toggle_field_pin(card, id)?;
            field_result(out, card, id, toggled, "Toggled pin on")
        }
        FieldCommands::Select { card, id } => {
            let card = card_id(card)?;
            let toggled = api.toggle_field_selection(card, id)?;
            field_result(out, card, id, toggled, "Toggled selection on")
        }
        FieldCommands::PurgeSelected { card } => {
            let card = card_id(card)?;
            let removed = api.delete_selected_fields(card)?;
            out.emit(&json!({ "card": card, "deleted": removed }), || {
                render::message(&format!("Deleted {} field(s) from card {}", removed, card))
            })
        }
    }
}

fn field_result(out: &Output, card: CardId, id: FieldId, found: bool, verb: &str) -> Result<String> {
    if !found {
        bail!("Field {} not found on card {}", id, card);
    }
    out.emit(&json!({ "card": card, "id": id }), || {
        render::message(&format!("{} field {} on card {}", verb, id, card))
    })
}

fn handle_file(api: &Api, out: &Output, action: FileCommands) -> Result<String> {
    let raw_card = match &action {
        FileCommands::Open { card }
        | FileCommands::Add { card, .. }
        | FileCommands::List { card }
        | FileCommands::Update { card, .. }
        | FileCommands::Rm { card, .. }
        | FileCommands::Pin { card, .. } => *card,
    };
    let card = api.require_card(card_id(raw_card)?)?;
    let mut session = api.open_file(&card)?;

    let text = match action {
        FileCommands::Open { .. } => {
            let path = api.file_path(&card)?;
            return out.emit(&json!({ "card": card.id, "path": path }), || {
                format!("{}\n", path.display())
            });
        }
        FileCommands::List { .. } => {
            let fields = session.registry().items();
            return out.emit(&fields, || render::render_fields(&fields, false));
        }
        FileCommands::Add {
            title,
            description,
            pin,
            ..
        } => {
            let id = session.registry_mut().add_item(title, description, pin);
            format!("Added field {} to {}", id, session.name())
        }
        FileCommands::Update {
            index,
            title,
            description,
            ..
        } => {
            let is_pinned = session
                .registry()
                .get(index)
                .map(|r| r.is_pinned)
                .ok_or_else(|| anyhow!("No field at index {} in {}", index, session.name()))?;
            session
                .registry_mut()
                .update_item(index, title, description, is_pinned);
            format!("Updated field {} in {}", index, session.name())
        }
        FileCommands::Rm { indexes, .. } => {
            for index in &indexes {
                if !session.registry_mut().push_to_selected(*index) {
                    bail!("No field at index {} in {}", index, session.name());
                }
            }
            let removed = session.registry_mut().delete_selected_nodes();
            format!("Deleted {} field(s) from {}", removed, session.name())
        }
        FileCommands::Pin { index, .. } => {
            let toggled = session.registry_mut().toggle_pin(index);
            let pinned = toggled
                .ok_or_else(|| anyhow!("No field at index {} in {}", index, session.name()))?;
            let verb = if pinned { "Pinned" } else { "Unpinned" };
            format!("{} field {} in {}", verb, index, session.name())
        }
    };

    if !api.save_file(&session)? {
        bail!("Card file {} was removed while editing", session.name());
    }
    let fields = session.registry().items();
    out.emit(&fields, || render::message(&text))
}

fn handle_item(api: &Api, out: &Output, action: ItemCommands) -> Result<String> {
    match action {
        ItemCommands::Add {
            card,
            description,
            pin,
        } => {
            let item = api.add_item(card_id(card)?, &description, pin)?;
            out.emit(&item, || {
                render::message(&format!("Added item {} to card {}", item.id, item.card_id))
            })
        }
        ItemCommands::List { card } => {
            let card = api.require_card(card_id(card)?)?;
            let items = api.list_items(card.id)?;
            out.emit(&items, || render::render_items(&items))
        }
        ItemCommands::Update {
            card,
            id,
            description,
        } => {
            let card = card_id(card)?;
            let mut item = api
                .list_items(card)?
                .into_iter()
                .find(|i| i.id == id)
                .ok_or_else(|| anyhow!("Item {} not found on card {}", id, card))?;
            item.description = description;
            api.update_item(&item)?;
            out.emit(&item, || {
                render::message(&format!("Updated item {} on card {}", id, card))
            })
        }
        ItemCommands::Rm { card, ids } => {
            let card = card_id(card)?;
            let removed = api.delete_items(card, &ids)?;
            out.emit(&json!({ "card": card, "deleted": removed }), || {
                render::message(&format!("Deleted {} item(s) from card {}", removed, card))
            })
        }
        ItemCommands::Pin { card, ids, unpin } => {
            let card = card_id(card)?;
            let changed = api.set_items_pinned(card, &ids, !unpin)?;
            let verb = if unpin { "Unpinned" } else { "Pinned" };
            out.emit(&json!({ "card": card, "changed": changed }), || {
                render::message(&format!("{} {} item(s) on card {}", verb, changed, card))
            })
        }
    }
}

fn handle_reminder(api: &Api, out: &Output, action: ReminderCommands) -> Result<String> {
    match action {
        ReminderCommands::Add {
            unique_id,
            description,
            at,
        } => {
            let notify_at = parse_when(&at)?;
            let reminder = api.add_reminder(unique_id, &description, notify_at)?;
            out.emit(&reminder, || {
                render::message(&format!("Stored reminder {}", reminder.unique_id))
            })
        }
        ReminderCommands::List => {
            let reminders = api.list_reminders()?;
            out.emit(&reminders, || {
                render::render_reminders(&reminders, now_millis())
            })
        }
        ReminderCommands::Rm { id, unique } => {
            let deleted = if unique {
                api.delete_reminder_by_unique_id(id)?
            } else {
                api.delete_reminder(id)?
            };
            if !deleted {
                bail!("Reminder {} not found", id);
            }
            out.emit(&json!({ "deleted": id }), || {
                render::message(&format!("Deleted reminder {}", id))
            })
        }
    }
}

fn handle_config_show(ctx: &ListsqreContext, out: &Output) -> Result<String> {
    let config = &ctx.config;
    let db_path = config.db_path(&ctx.data_dir);
    let files_path = config.files_path(&ctx.data_dir);
    let value = json!({
        "data_dir": ctx.data_dir,
        "db_path": db_path,
        "files_path": files_path,
        "field_delimiter": config.field_delimiter,
        "record_delimiter": config.record_delimiter,
    });
    out.emit(&value, || {
        format!(
            "data_dir         = {}\ndb_path          = {}\nfiles_path       = {}\nfield_delimiter  = {:?}\nrecord_delimiter = {:?}\n",
            ctx.data_dir.display(),
            db_path.display(),
            files_path.display(),
            config.field_delimiter,
            config.record_delimiter,
        )
    })
}

/// Epoch milliseconds, or an RFC 3339 timestamp.
fn parse_when(input: &str) -> Result<i64> {
    if let Ok(ms) = input.parse::<i64>() {
        return Ok(ms);
    }
    let parsed = DateTime::parse_from_rfc3339(input).with_context(|| {
        format!(
            "invalid time {:?}: expected RFC 3339 or epoch milliseconds",
            input
        )
    })?;
    Ok(parsed.timestamp_millis())
}
