//! Command dispatch: bridges CLI args -> console operations -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod devices;
pub mod menus;
pub mod meters;
pub mod powers;
pub mod roles;
pub mod users;
pub mod util;

use voltdesk_core::Console;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// The profile a backend-bound command runs against.
pub struct Target<'a> {
    pub name: &'a str,
    pub username: Option<&'a str>,
}

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    console: &Console,
    target: &Target<'_>,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if needs_session(&cmd) {
        console.require_session().map_err(|_| CliError::NotLoggedIn {
            profile: target.name.to_owned(),
        })?;
    }

    match cmd {
        Command::Login(args) => {
            auth::login(console, target.name, target.username, args, global).await
        }
        Command::Logout => auth::logout(console, target.name, global),
        Command::Whoami => auth::whoami(console, target.name, global),
        Command::Devices(args) => devices::handle(console, args, global).await,
        Command::Meters(args) => meters::handle(console, args, global).await,
        Command::Powers(args) => powers::handle(console, args, global).await,
        Command::Roles(args) => roles::handle(console, args, global).await,
        Command::Users(args) => users::handle(console, args, global).await,
        Command::Menus(args) => menus::handle(console, args, global).await,
        // Config and Completions are handled before dispatch
        Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}

fn needs_session(cmd: &Command) -> bool {
    matches!(
        cmd,
        Command::Devices(_)
            | Command::Meters(_)
            | Command::Powers(_)
            | Command::Roles(_)
            | Command::Users(_)
            | Command::Menus(_)
    )
}
