//! Post interaction flows shared by the dashboard and profile pages.

use crate::app::{pages::Pane, prompt::Prompt};
use cyclesync_client::client::{ApiClient, ApiError};
use cyclesync_common::model::{
    Id,
    post::{Post, PostContent, PostMarker},
    user::UserMarker,
};
use std::io;
use tracing::error;

pub async fn load_pane(api: &ApiClient, owner: Id<UserMarker>) -> Pane<Post> {
    match api.list_posts(owner).await {
        Ok(list) => Pane::Loaded(list),
        Err(ApiError::Rejected(rejection)) => Pane::Failed(format!(
            "Error loading posts: {}",
            rejection.message.unwrap_or_default()
        )),
        Err(err) => {
            error!(error = %err, "Loading posts failed");
            Pane::Failed("Error loading posts. Please try again.".to_owned())
        }
    }
}

/// Outcome of the fetch → prompt → update flow.
pub enum EditPost {
    /// Updated; carries the server-returned owner id so the caller can
    /// re-fetch the affected list.
    Updated(Id<UserMarker>),
    Cancelled,
    Failed(String),
}

pub async fn edit_post(
    api: &ApiClient,
    ui: &mut dyn Prompt,
    id: Id<PostMarker>,
) -> io::Result<EditPost> {
    let post = match api.fetch_post(id).await {
        Ok(post) => post,
        Err(ApiError::Rejected(rejection)) => {
            return Ok(EditPost::Failed(format!(
                "Failed to fetch post details: {}",
                rejection
                    .message
                    .unwrap_or_else(|| "Unknown error".to_owned())
            )));
        }
        Err(err) => {
            error!(error = %err, "Fetching post details failed");
            return Ok(EditPost::Failed(
                "An error occurred while fetching post details".to_owned(),
            ));
        }
    };

    // Cancelling either prompt aborts without a request.
    let Some(title) = ui.line("Edit title", Some(&post.title))? else {
        return Ok(EditPost::Cancelled);
    };
    let Some(content) = ui.line("Edit content", Some(&post.content))? else {
        return Ok(EditPost::Cancelled);
    };

    match api.update_post(id, &PostContent { title, content }).await {
        Ok(updated) => Ok(EditPost::Updated(updated.user_id)),
        Err(ApiError::Rejected(rejection)) => Ok(EditPost::Failed(format!(
            "Failed to update post: {}",
            rejection
                .message
                .unwrap_or_else(|| "Unknown error".to_owned())
        ))),
        Err(err) => {
            error!(error = %err, "Updating post failed");
            Ok(EditPost::Failed(
                "An error occurred while updating the post".to_owned(),
            ))
        }
    }
}

pub enum DeletePost {
    Deleted,
    Cancelled,
    Failed(String),
}

pub async fn delete_post(
    api: &ApiClient,
    ui: &mut dyn Prompt,
    id: Id<PostMarker>,
) -> io::Result<DeletePost> {
    if !ui.confirm("Are you sure you want to delete this post?")? {
        return Ok(DeletePost::Cancelled);
    }

    match api.delete_post(id).await {
        Ok(()) => Ok(DeletePost::Deleted),
        Err(ApiError::Rejected(rejection)) => Ok(DeletePost::Failed(format!(
            "Failed to delete post: {}",
            rejection
                .message
                .unwrap_or_else(|| "Unknown error".to_owned())
        ))),
        Err(err) => {
            error!(error = %err, "Deleting post failed");
            Ok(DeletePost::Failed(
                "An error occurred while deleting the post".to_owned(),
            ))
        }
    }
}
