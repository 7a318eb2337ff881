pub mod pages;
pub mod prompt;
pub mod render;

use crate::app::{
    pages::{auth, dashboard, profile},
    prompt::Prompt,
};
use cyclesync_client::client::ApiClient;
use cyclesync_common::model::{Id, user::UserMarker};
use std::io;

/// Client-side navigable routes: `/login`, the signup form, `/dashboard`,
/// and `/profile?id={id}`.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Route {
    Login,
    Signup,
    Dashboard,
    Profile { id: Option<Id<UserMarker>> },
}

/// What a page hands back to the shell once an interaction is done.
/// `Stay` re-enters the current route, which re-fetches everything — the
/// client never holds authoritative state across a navigation.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum Nav {
    Stay,
    To(Route),
    Exit,
}

pub async fn run(
    api: &ApiClient,
    ui: &mut dyn Prompt,
    out: &mut dyn io::Write,
) -> io::Result<()> {
    let mut route = Route::Login;

    loop {
        let nav = match route {
            Route::Login => auth::login_page(api, ui, out).await?,
            Route::Signup => auth::signup_page(api, ui, out).await?,
            Route::Dashboard => dashboard::page(api, ui, out).await?,
            Route::Profile { id } => profile::page(api, ui, out, id).await?,
        };

        match nav {
            Nav::Stay => {}
            Nav::To(next) => route = next,
            Nav::Exit => return Ok(()),
        }
    }
}
