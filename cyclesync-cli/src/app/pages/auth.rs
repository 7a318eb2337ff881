use crate::app::{Nav, Route, prompt::Prompt};
use cyclesync_client::client::{ApiClient, ApiError};
use cyclesync_common::model::user::{CreateUser, Credentials, Email};
use std::io::{self, Write};
use tracing::error;

/// Result of submitting one of the auth forms: a navigation target on
/// success, or the inline message to show. Local validation failures never
/// issue a request.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum Submission {
    Redirect(Route),
    Rejected(String),
}

pub async fn submit_login(api: &ApiClient, username: &str, password: &str) -> Submission {
    if username.is_empty() || password.is_empty() {
        return Submission::Rejected("Please enter both username and password".to_owned());
    }

    let credentials = Credentials {
        username: username.to_owned(),
        password: password.to_owned(),
    };

    match api.login(&credentials).await {
        Ok(_) => Submission::Redirect(Route::Dashboard),
        Err(ApiError::Rejected(rejection)) => Submission::Rejected(
            rejection.message.unwrap_or_else(|| "Login failed".to_owned()),
        ),
        Err(err) => {
            error!(error = %err, "Login request failed");
            Submission::Rejected("An error occurred. Please try again.".to_owned())
        }
    }
}

pub async fn submit_signup(
    api: &ApiClient,
    username: &str,
    email: &str,
    password: &str,
) -> Submission {
    if username.is_empty() || email.is_empty() || password.is_empty() {
        return Submission::Rejected("Please fill out all fields".to_owned());
    }
    let Ok(email) = Email::new(email.to_owned()) else {
        return Submission::Rejected("Please enter a valid email address".to_owned());
    };

    let account = CreateUser {
        username: username.to_owned(),
        email,
        password: password.to_owned(),
    };

    match api.signup(&account).await {
        Ok(_) => Submission::Redirect(Route::Dashboard),
        Err(ApiError::Rejected(rejection)) => Submission::Rejected(
            rejection.message.unwrap_or_else(|| "Signup failed".to_owned()),
        ),
        Err(err) => {
            error!(error = %err, "Signup request failed");
            Submission::Rejected("An error occurred. Please try again.".to_owned())
        }
    }
}

/// Ends the session. Failures only reach the log; the page stays put.
pub async fn logout(api: &ApiClient) -> Nav {
    match api.logout().await {
        Ok(()) => Nav::To(Route::Login),
        Err(ApiError::Rejected(rejection)) => {
            error!(
                message = rejection.message.as_deref().unwrap_or("unknown"),
                "Logout failed"
            );
            Nav::Stay
        }
        Err(err) => {
            error!(error = %err, "Logout request failed");
            Nav::Stay
        }
    }
}

pub async fn login_page(
    api: &ApiClient,
    ui: &mut dyn Prompt,
    out: &mut dyn io::Write,
) -> io::Result<Nav> {
    writeln!(out)?;
    writeln!(out, "=== Log in ===")?;
    writeln!(out, "Actions: [l]og in, [s]ign up instead, [q]uit")?;

    let Some(choice) = ui.line("Action", None)? else {
        return Ok(Nav::Exit);
    };

    match choice.trim() {
        "l" => {
            let Some(username) = ui.line("Username", None)? else {
                return Ok(Nav::Stay);
            };
            let Some(password) = ui.line("Password", None)? else {
                return Ok(Nav::Stay);
            };

            match submit_login(api, &username, &password).await {
                Submission::Redirect(route) => Ok(Nav::To(route)),
                Submission::Rejected(message) => {
                    writeln!(out, "{message}")?;
                    Ok(Nav::Stay)
                }
            }
        }
        "s" => Ok(Nav::To(Route::Signup)),
        "q" => Ok(Nav::Exit),
        _ => Ok(Nav::Stay),
    }
}

pub async fn signup_page(
    api: &ApiClient,
    ui: &mut dyn Prompt,
    out: &mut dyn io::Write,
) -> io::Result<Nav> {
    writeln!(out)?;
    writeln!(out, "=== Sign up ===")?;
    writeln!(out, "Actions: [s]ign up, [l]og in instead, [q]uit")?;

    let Some(choice) = ui.line("Action", None)? else {
        return Ok(Nav::Exit);
    };

    match choice.trim() {
        "s" => {
            let Some(username) = ui.line("Username", None)? else {
                return Ok(Nav::Stay);
            };
            let Some(email) = ui.line("Email", None)? else {
                return Ok(Nav::Stay);
            };
            let Some(password) = ui.line("Password", None)? else {
                return Ok(Nav::Stay);
            };

            match submit_signup(api, &username, &email, &password).await {
                Submission::Redirect(route) => Ok(Nav::To(route)),
                Submission::Rejected(message) => {
                    writeln!(out, "{message}")?;
                    Ok(Nav::Stay)
                }
            }
        }
        "l" => Ok(Nav::To(Route::Login)),
        "q" => Ok(Nav::Exit),
        _ => Ok(Nav::Stay),
    }
}
