//! Rendering helpers shared by the three pages.

use cyclesync_common::model::{post::Post, user::User};
use time::{OffsetDateTime, format_description::BorrowedFormatItem, macros::format_description};

const TIMESTAMP_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

pub fn format_timestamp(timestamp: OffsetDateTime) -> String {
    timestamp
        .format(TIMESTAMP_FORMAT)
        .unwrap_or_else(|_| timestamp.to_string())
}

/// Replaces control characters so server-provided text cannot corrupt the
/// terminal, the way the original pages escaped HTML before injecting it.
pub fn clean(text: &str) -> String {
    text.chars()
        .map(|ch| if ch.is_control() { ' ' } else { ch })
        .collect()
}

pub fn render_posts(posts: &[Post]) -> String {
    if posts.is_empty() {
        return "No posts found.\n".to_owned();
    }

    posts
        .iter()
        .map(|post| {
            format!(
                "{title} (Post ID: {id})\n    {content}\n    Created: {created}\n",
                title = clean(&post.title),
                id = post.id,
                content = clean(&post.content),
                created = format_timestamp(post.created_at),
            )
        })
        .collect()
}

pub fn render_users(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.\n".to_owned();
    }

    users
        .iter()
        .map(|user| {
            format!(
                "{username} <{email}> (User ID: {id})\n",
                username = clean(&user.username),
                email = clean(&user.email),
                id = user.id,
            )
        })
        .collect()
}

pub fn render_profile(user: &User) -> String {
    format!(
        "User ID: {id}\nUsername: {username}\nEmail: {email}\nMember since: {created}\n",
        id = user.id,
        username = clean(&user.username),
        email = clean(&user.email),
        created = format_timestamp(user.created_at),
    )
}
