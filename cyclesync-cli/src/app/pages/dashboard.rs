use crate::app::{
    Nav, Route,
    pages::{Pane, auth, posts, prompt_id, write_posts_pane},
    prompt::Prompt,
    render::{clean, render_users},
};
use cyclesync_client::client::{ApiClient, ApiError};
use cyclesync_common::model::{
    Id,
    post::{Post, PostContent},
    user::{User, UserMarker},
};
use std::io::{self, Write};
use tracing::error;

pub enum SubmitPost {
    /// Created; carries the server-returned owner id for the list re-fetch.
    Created(Id<UserMarker>),
    Rejected(String),
}

pub async fn submit_post(api: &ApiClient, title: &str, content: &str) -> SubmitPost {
    if title.is_empty() || content.is_empty() {
        return SubmitPost::Rejected("Please fill out all fields".to_owned());
    }

    let draft = PostContent {
        title: title.to_owned(),
        content: content.to_owned(),
    };

    match api.create_post(&draft).await {
        Ok(post) => SubmitPost::Created(post.user_id),
        Err(ApiError::Rejected(rejection)) => SubmitPost::Rejected(
            rejection
                .message
                .unwrap_or_else(|| "Failed to create post".to_owned()),
        ),
        Err(err) => {
            error!(error = %err, "Creating post failed");
            SubmitPost::Rejected("An error occurred. Please try again.".to_owned())
        }
    }
}

pub async fn page(
    api: &ApiClient,
    ui: &mut dyn Prompt,
    out: &mut dyn io::Write,
) -> io::Result<Nav> {
    // Identity and directory load independently; a failed directory never
    // blocks the page, while a rejected identity means "not logged in".
    let identity = match api.fetch_user(Id::CURRENT).await {
        Ok(user) => Some(user),
        Err(ApiError::Rejected(_)) => return Ok(Nav::To(Route::Login)),
        Err(err) => {
            error!(error = %err, "Loading the current user failed");
            None
        }
    };

    let mut my_posts = match &identity {
        Some(user) => Some(posts::load_pane(api, user.id).await),
        None => None,
    };

    let users = match api.list_users().await {
        Ok(list) => Pane::Loaded(list),
        Err(ApiError::Rejected(rejection)) => Pane::Failed(format!(
            "Error loading users: {}",
            rejection.message.unwrap_or_default()
        )),
        Err(err) => {
            error!(error = %err, "Loading users failed");
            Pane::Failed("Error loading users. Please try again.".to_owned())
        }
    };

    loop {
        render_page(out, identity.as_ref(), my_posts.as_ref(), &users)?;
        writeln!(
            out,
            "Actions: [n]ew post, [e]dit post, [d]elete post, [v]isit profile, [m]y profile, [o] log out, [r]eload, [q]uit"
        )?;

        let Some(choice) = ui.line("Action", None)? else {
            return Ok(Nav::Exit);
        };

        match choice.trim() {
            "n" => {
                let Some(title) = ui.line("Title", None)? else {
                    continue;
                };
                let Some(content) = ui.line("Content", None)? else {
                    continue;
                };

                match submit_post(api, &title, &content).await {
                    SubmitPost::Created(owner) => {
                        my_posts = Some(posts::load_pane(api, owner).await);
                    }
                    SubmitPost::Rejected(message) => writeln!(out, "{message}")?,
                }
            }
            "e" => {
                let Some(id) = prompt_id(ui, "Post ID")? else {
                    continue;
                };
                match posts::edit_post(api, ui, id).await? {
                    posts::EditPost::Updated(owner) => {
                        my_posts = Some(posts::load_pane(api, owner).await);
                    }
                    posts::EditPost::Cancelled => {}
                    posts::EditPost::Failed(message) => writeln!(out, "{message}")?,
                }
            }
            "d" => {
                let Some(id) = prompt_id(ui, "Post ID")? else {
                    continue;
                };
                match posts::delete_post(api, ui, id).await? {
                    posts::DeletePost::Deleted => {
                        // Drop the block locally; the list is not re-fetched.
                        if let Some(Pane::Loaded(list)) = &mut my_posts {
                            list.retain(|post| post.id != id);
                        }
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
            "m" => return Ok(Nav::To(Route::Profile { id: None })),
            "o" => match auth::logout(api).await {
                Nav::Stay => {}
                nav => return Ok(nav),
            },
            "r" => return Ok(Nav::Stay),
            "q" => return Ok(Nav::Exit),
            _ => {}
        }
    }
}

fn render_page(
    out: &mut dyn io::Write,
    identity: Option<&User>,
    my_posts: Option<&Pane<Post>>,
    users: &Pane<User>,
) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "=== Dashboard ===")?;
    if let Some(user) = identity {
        writeln!(out, "Welcome, {}!", clean(&user.username))?;
    }

    if let Some(pane) = my_posts {
        writeln!(out)?;
        writeln!(out, "--- Your posts ---")?;
        write_posts_pane(out, pane)?;
    }

    writeln!(out)?;
    writeln!(out, "--- All users ---")?;
    match users {
        Pane::Loaded(list) => write!(out, "{}", render_users(list))?,
        Pane::Failed(message) => writeln!(out, "{message}")?,
    }

    Ok(())
}
