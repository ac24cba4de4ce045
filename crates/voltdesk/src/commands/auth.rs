//! Session commands: login, logout, whoami.

use chrono::{DateTime, Utc};
use dialoguer::Input;
use secrecy::SecretString;
use serde::Serialize;
use tracing::warn;

use voltdesk_core::{Console, SessionUser};

use crate::cli::{GlobalOpts, LoginArgs};
use crate::error::CliError;
use crate::output;

/// Map a dialoguer / interactive I/O failure into CliError.
fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

#[derive(Serialize)]
struct WhoAmI<'a> {
    profile: &'a str,
    server: String,
    user: &'a SessionUser,
    established_at: DateTime<Utc>,
}

fn detail(w: &WhoAmI<'_>) -> String {
    let user = w.user;
    [
        format!("Profile:     {}", w.profile),
        format!("Server:      {}", w.server),
        format!("User:        {} ({})", user.username, user.id),
        format!(
            "Role:        {}",
            match (&user.role_name, user.role_id) {
                (Some(name), _) => name.clone(),
                (None, Some(id)) => format!("Role {id}"),
                (None, None) => "-".into(),
            }
        ),
        format!(
            "Since:       {}",
            w.established_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
    ]
    .join("\n")
}

pub async fn login(
    console: &Console,
    profile: &str,
    default_username: Option<&str>,
    args: LoginArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let username = match args.username.or_else(|| default_username.map(str::to_owned)) {
        Some(u) => u,
        None => Input::new()
            .with_prompt("Username")
            .interact_text()
            .map_err(prompt_err)?,
    };
    let password = match args.password {
        Some(p) => p,
        None => rpassword::prompt_password("Password: ").map_err(prompt_err)?,
    };
    let password = SecretString::from(password);

    let session = console
        .login(&username, &password)
        .await
        .map_err(|e| match CliError::from(e) {
            CliError::AuthFailed { message, .. } => CliError::AuthFailed {
                message,
                profile: profile.to_owned(),
            },
            other => other,
        })?;

    voltdesk_config::save_session(profile, &session)?;

    if !global.quiet {
        eprintln!("✓ Logged in as {} ({profile})", session.user.username);
    }
    Ok(())
}

pub fn logout(console: &Console, profile: &str, global: &GlobalOpts) -> Result<(), CliError> {
    console.logout();
    let existed = match voltdesk_config::clear_session(profile) {
        Ok(existed) => existed,
        Err(e) => {
            warn!(error = %e, "failed to remove persisted session");
            true
        }
    };
    if !global.quiet {
        if existed {
            eprintln!("✓ Logged out of '{profile}'");
        } else {
            eprintln!("Not logged in to '{profile}'");
        }
    }
    Ok(())
}

pub fn whoami(console: &Console, profile: &str, global: &GlobalOpts) -> Result<(), CliError> {
    let session = console
        .require_session()
        .map_err(|_| CliError::NotLoggedIn {
            profile: profile.to_owned(),
        })?;
    let view = WhoAmI {
        profile,
        server: console.api().base_url().to_string(),
        user: &session.user,
        established_at: session.established_at,
    };
    let out = output::render_single(&global.output, &view, detail, |w| w.user.username.clone());
    output::print_output(&out, global.quiet);
    Ok(())
}
