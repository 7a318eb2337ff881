use crate::app::{
    Nav, Route,
    pages::{Pane, posts, prompt_id, write_posts_pane},
    prompt::Prompt,
    render::render_profile,
};
use cyclesync_client::client::{ApiClient, ApiError};
use cyclesync_common::model::{
    Id,
    post::Post,
    user::{Email, UpdateUser, User, UserMarker},
};
use std::io::{self, Write};
use tracing::error;

pub enum UpdateOutcome {
    Updated(User),
    Rejected(String),
}

pub async fn submit_profile(
    api: &ApiClient,
    subject: Id<UserMarker>,
    username: &str,
    email: &str,
) -> UpdateOutcome {
    if username.is_empty() || email.is_empty() {
        return UpdateOutcome::Rejected("Please fill out all fields".to_owned());
    }
    let Ok(email) = Email::new(email.to_owned()) else {
        return UpdateOutcome::Rejected("Please enter a valid email address".to_owned());
    };

    let update = UpdateUser {
        username: username.to_owned(),
        email,
    };

    // The subject id goes out verbatim; whether it belongs to the session
    // user is never checked on this side.
    match api.update_user(subject, &update).await {
        Ok(user) => UpdateOutcome::Updated(user),
        Err(ApiError::Rejected(rejection)) => UpdateOutcome::Rejected(
            rejection
                .message
                .unwrap_or_else(|| "Failed to update profile".to_owned()),
        ),
        Err(err) => {
            error!(error = %err, "Updating the profile failed");
            UpdateOutcome::Rejected("An error occurred. Please try again.".to_owned())
        }
    }
}

pub async fn page(
    api: &ApiClient,
    ui: &mut dyn Prompt,
    out: &mut dyn io::Write,
    id: Option<Id<UserMarker>>,
) -> io::Result<Nav> {
    let subject = id.unwrap_or(Id::CURRENT);

    let mut profile = match api.fetch_user(subject).await {
        Ok(user) => user,
        Err(ApiError::Rejected(_)) => return Ok(Nav::To(Route::Login)),
        Err(err) => {
            error!(error = %err, "Loading the profile failed");
            writeln!(out, "An error occurred while loading the profile")?;
            return broken_page_nav(ui);
        }
    };

    let mut user_posts = posts::load_pane(api, subject).await;

    loop {
        render_page(out, subject, &profile, &user_posts)?;
        writeln!(
            out,
            "Actions: [u]pdate profile, [x] delete account, [e]dit post, [d]elete post, [v]iew profile by id, [b]ack to dashboard, [q]uit"
        )?;

        let Some(choice) = ui.line("Action", None)? else {
            return Ok(Nav::Exit);
        };

        match choice.trim() {
            "u" => {
                let Some(username) = ui.line("Username", Some(&profile.username))? else {
                    continue;
                };
                let Some(email) = ui.line("Email", Some(&profile.email))? else {
                    continue;
                };

                match submit_profile(api, subject, &username, &email).await {
                    UpdateOutcome::Updated(user) => {
                        profile = user;
                        writeln!(out, "Profile updated successfully!")?;
                    }
                    UpdateOutcome::Rejected(message) => writeln!(out, "{message}")?,
                }
            }
            "x" => {
                if ui.confirm(
                    "Are you sure you want to delete this account? This action cannot be undone.",
                )? {
                    match api.delete_user(subject).await {
                        Ok(()) => return Ok(Nav::To(Route::Login)),
                        Err(ApiError::Rejected(rejection)) => writeln!(
                            out,
                            "Failed to delete account: {}",
                            rejection
                                .message
                                .unwrap_or_else(|| "Unknown error".to_owned())
                        )?,
                        Err(err) => {
                            error!(error = %err, "Deleting the account failed");
                            writeln!(out, "An error occurred while deleting the account")?;
                        }
                    }
                }
            }
            "e" => {
                let Some(post_id) = prompt_id(ui, "Post ID")? else {
                    continue;
                };
                match posts::edit_post(api, ui, post_id).await? {
                    // The re-fetch stays keyed by the subject, not by the
                    // owner the server reported.
                    posts::EditPost::Updated(_) => {
                        user_posts = posts::load_pane(api, subject).await;
                    }
                    posts::EditPost::Cancelled => {}
                    posts::EditPost::Failed(message) => writeln!(out, "{message}")?,
                }
            }
            "d" => {
                let Some(post_id) = prompt_id(ui, "Post ID")? else {
                    continue;
                };
                match posts::delete_post(api, ui, post_id).await? {
                    posts::DeletePost::Deleted => {
                        user_posts = posts::load_pane(api, subject).await;
                    }
                    posts::DeletePost::Cancelled => {}
                    posts::DeletePost::Failed(message) => writeln!(out, "{message}")?,
                }
            }
            "v" => {
                if let Some(target) = prompt_id(ui, "User ID")? {
                    return Ok(Nav::To(Route::Profile { id: Some(target) }));
                }
            }
            "b" => return Ok(Nav::To(Route::Dashboard)),
            "q" => return Ok(Nav::Exit),
            _ => {}
        }
    }
}

/// The profile could not be loaded at all; let the user retry or leave, the
/// way a broken page still has working navigation.
fn broken_page_nav(ui: &mut dyn Prompt) -> io::Result<Nav> {
    let Some(choice) = ui.line("Action ([r]etry, [b]ack to dashboard, [q]uit)", None)? else {
        return Ok(Nav::Exit);
    };

    Ok(match choice.trim() {
        "r" => Nav::Stay,
        "q" => Nav::Exit,
        _ => Nav::To(Route::Dashboard),
    })
}

fn render_page(
    out: &mut dyn io::Write,
    subject: Id<UserMarker>,
    profile: &User,
    user_posts: &Pane<Post>,
) -> io::Result<()> {
    writeln!(out)?;
    // The warning comes before everything else on the page.
    if !subject.is_current() && subject != profile.id {
        writeln!(out, "=== IDOR vulnerability detected ===")?;
        writeln!(
            out,
            "You are currently viewing another user's profile (ID: {}).",
            profile.id
        )?;
        writeln!(
            out,
            "This demonstrates an Insecure Direct Object Reference vulnerability."
        )?;
        writeln!(out)?;
    }

    writeln!(out, "=== Profile ===")?;
    write!(out, "{}", render_profile(profile))?;
    writeln!(out)?;
    writeln!(out, "--- Posts ---")?;
    write_posts_pane(out, user_posts)
}
