pub mod auth;
pub mod dashboard;
pub mod posts;
pub mod profile;

use crate::app::{prompt::Prompt, render::render_posts};
use cyclesync_common::model::{Id, post::Post};
use std::io::{self, Write};

/// One list area of a page: either its rows or the inline error text that
/// replaced them. A failed pane never blocks the rest of the page.
pub enum Pane<T> {
    Loaded(Vec<T>),
    Failed(String),
}

pub fn write_posts_pane(out: &mut dyn io::Write, pane: &Pane<Post>) -> io::Result<()> {
    match pane {
        Pane::Loaded(list) => write!(out, "{}", render_posts(list)),
        Pane::Failed(message) => writeln!(out, "{message}"),
    }
}

/// Reads and parses an id; cancelling or entering junk both abort the flow.
pub fn prompt_id<Marker>(ui: &mut dyn Prompt, label: &str) -> io::Result<Option<Id<Marker>>> {
    let Some(entered) = ui.line(label, None)? else {
        return Ok(None);
    };

    Ok(entered.trim().parse().ok())
}
