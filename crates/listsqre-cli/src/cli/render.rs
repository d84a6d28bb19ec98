//! Text and JSON output.
//!
//! Every renderer returns a `String`; `commands.rs` decides where it goes.
//! Colors come from `console`, which turns them off when stdout is not a
//! terminal, so piped output is plain text.

use chrono::{DateTime, Utc};
use console::Style;
use listsqre::model::{Card, CardItem, FieldRecord, Reminder};
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

const TITLE_WIDTH_CAP: usize = 40;
const PIN_MARK: &str = "⚲";

struct Styles {
    index: Style,
    pinned: Style,
    selected: Style,
    muted: Style,
    time: Style,
    success: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            index: Style::new().cyan(),
            pinned: Style::new().yellow().bold(),
            selected: Style::new().magenta(),
            muted: Style::new().dim(),
            time: Style::new().dim().italic(),
            success: Style::new().green(),
        }
    }
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<String> {
    Ok(format!("{}\n", serde_json::to_string_pretty(value)?))
}

pub fn message(text: &str) -> String {
    format!("{}\n", Styles::new().success.apply_to(text))
}

pub fn render_cards(cards: &[Card]) -> String {
    if cards.is_empty() {
        return "No cards yet. Create one with `listsqre card add <title>`.\n".to_string();
    }
    let rows: Vec<Row<'_>> = cards
        .iter()
        .map(|c| Row {
            index: c.id.get(),
            title: &c.title,
            description: &c.description,
            is_pinned: c.is_pinned,
            is_selected: c.is_selected,
            created_at: Some(c.created_at),
        })
        .collect();
    render_rows(&rows)
}

/// Fields from either store. `show_time` is off for flat files, whose
/// timestamps are only as old as the last load.
pub fn render_fields(fields: &[FieldRecord], show_time: bool) -> String {
    if fields.is_empty() {
        return "No fields.\n".to_string();
    }
    let rows: Vec<Row<'_>> = fields
        .iter()
        .map(|f| Row {
            index: f.id,
            title: &f.title,
            description: &f.description,
            is_pinned: f.is_pinned,
            is_selected: f.is_selected,
            created_at: show_time.then_some(f.created_at),
        })
        .collect();
    render_rows(&rows)
}

/// Items have no title; the description takes its column.
pub fn render_items(items: &[CardItem]) -> String {
    if items.is_empty() {
        return "No items.\n".to_string();
    }
    let rows: Vec<Row<'_>> = items
        .iter()
        .map(|i| Row {
            index: i.id,
            title: &i.description,
            description: "",
            is_pinned: i.is_pinned,
            is_selected: i.is_selected,
            created_at: Some(i.created_at),
        })
        .collect();
    render_rows(&rows)
}

pub fn render_reminders(reminders: &[Reminder], now_ms: i64) -> String {
    if reminders.is_empty() {
        return "No reminders.\n".to_string();
    }
    let styles = Styles::new();
    let mut out = String::new();
    for r in reminders {
        let when = format_timestamp(r.notify_at);
        let state = if r.is_upcoming(now_ms) {
            styles.pinned.apply_to("upcoming")
        } else {
            styles.muted.apply_to("past")
        };
        out.push_str(&format!(
            "{} {} {}  {}  {}\n",
            styles.index.apply_to(format!("{:>4}.", r.id)),
            styles.muted.apply_to(format!("#{}", r.unique_id)),
            r.description,
            styles.time.apply_to(when),
            state,
        ));
    }
    out
}

struct Row<'a> {
    index: i64,
    title: &'a str,
    description: &'a str,
    is_pinned: bool,
    is_selected: bool,
    created_at: Option<i64>,
}

fn render_rows(rows: &[Row<'_>]) -> String {
    let styles = Styles::new();
    let title_width = rows
        .iter()
        .map(|r| r.title.width())
        .max()
        .unwrap_or(0)
        .min(TITLE_WIDTH_CAP);

    let mut out = String::new();
    for row in rows {
        let pin = if row.is_pinned {
            styles.pinned.apply_to(PIN_MARK).to_string()
        } else {
            " ".to_string()
        };
        let select = if row.is_selected {
            styles.selected.apply_to("*").to_string()
        } else {
            " ".to_string()
        };
        let padding = title_width.saturating_sub(row.title.width());

        let mut line = format!(
            "{}{} {} {}{}",
            pin,
            select,
            styles.index.apply_to(format!("{:>3}.", row.index)),
            row.title,
            " ".repeat(padding),
        );
        if !row.description.is_empty() {
            line.push_str(&format!("  {}", styles.muted.apply_to(row.description)));
        }
        if let Some(created_at) = row.created_at {
            line.push_str(&format!("  {}", styles.time.apply_to(format_time_ago(created_at))));
        }
        out.push_str(line.trim_end());
        out.push('\n');
    }
    out
}

fn format_time_ago(epoch_ms: i64) -> String {
    let Some(timestamp) = DateTime::<Utc>::from_timestamp_millis(epoch_ms) else {
        return String::new();
    };
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    formatter.convert(duration.to_std().unwrap_or_default())
}

fn format_timestamp(epoch_ms: i64) -> String {
    DateTime::<Utc>::from_timestamp_millis(epoch_ms)
        .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
        .unwrap_or_else(|| epoch_ms.to_string())
}
