//! User command handlers.

use std::path::PathBuf;
use std::sync::Arc;

use tabled::Tabled;
use voltdesk_core::view::role_label;
use voltdesk_core::{Console, EntityId, Role, User, UserDraft};

use crate::cli::{GlobalOpts, UsersArgs, UsersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct UserRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Username")]
    username: String,
    #[tabled(rename = "Display Name")]
    display_name: String,
    #[tabled(rename = "Email")]
    email: String,
    #[tabled(rename = "Role")]
    role: String,
    #[tabled(rename = "Enabled")]
    enabled: &'static str,
}

impl UserRow {
    fn new(u: &User, roles: &[Arc<Role>]) -> Self {
        Self {
            id: u.id.to_string(),
            username: u.username.clone(),
            display_name: u.display_name.clone().unwrap_or_default(),
            email: u.email.clone().unwrap_or_default(),
            role: role_label(roles, u.role_id),
            enabled: if u.enabled { "yes" } else { "no" },
        }
    }
}

fn detail(u: &User) -> String {
    let mut lines = vec![
        format!("ID:          {}", u.id),
        format!("Username:    {}", u.username),
        format!("Name:        {}", util::opt(u.display_name.as_deref())),
        format!("Email:       {}", util::opt(u.email.as_deref())),
        format!(
            "Role ID:     {}",
            u.role_id.map_or_else(|| "-".into(), |id| id.to_string())
        ),
        format!("Enabled:     {}", u.enabled),
    ];
    lines.extend(util::audit_lines(&u.audit));
    lines.join("\n")
}

fn prompt_password() -> Result<String, CliError> {
    let password = rpassword::prompt_password("Password: ")?;
    if password.is_empty() {
        return Err(CliError::Validation {
            field: "password".into(),
            reason: "password cannot be empty".into(),
        });
    }
    Ok(password)
}

struct UserFields {
    username: Option<String>,
    display_name: Option<String>,
    email: Option<String>,
    role: Option<i64>,
    enabled: Option<bool>,
    with_password: bool,
}

fn draft(from_file: Option<PathBuf>, fields: UserFields) -> Result<UserDraft, CliError> {
    if let Some(path) = from_file {
        return util::read_json_file(&path);
    }
    let password = if fields.with_password {
        Some(prompt_password()?)
    } else {
        None
    };
    Ok(UserDraft {
        username: fields.username.unwrap_or_default(),
        display_name: fields.display_name,
        email: fields.email,
        role_id: fields.role.map(EntityId::new),
        enabled: fields.enabled,
        password,
    })
}

pub async fn handle(
    console: &Console,
    args: UsersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let users = console.users();

    match args.command {
        UsersCommand::List(list) => {
            let (snap, roles) = tokio::try_join!(
                util::load_filtered(users, &list, global),
                util::load_all(console.roles(), global),
            )?;
            let out = output::render_list(
                &global.output,
                snap.as_slice(),
                |u| UserRow::new(u, &roles),
                |u| u.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Get { id } => {
            let user = util::get(users, id).await?;
            let out = output::render_single(&global.output, &user, detail, |u| u.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Create {
            username,
            display_name,
            email,
            role,
            disabled,
            with_password,
            from_file,
        } => {
            let body = draft(
                from_file,
                UserFields {
                    username,
                    display_name,
                    email,
                    role,
                    enabled: disabled.then_some(false),
                    with_password,
                },
            )?;
            let user = util::create(users, body, global).await?;
            let out = output::render_single(&global.output, &user, detail, |u| u.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Update {
            id,
            username,
            display_name,
            email,
            role,
            enabled,
            with_password,
            from_file,
        } => {
            let body = draft(
                from_file,
                UserFields {
                    username,
                    display_name,
                    email,
                    role,
                    enabled,
                    with_password,
                },
            )?;
            let user = util::update(users, id, body, global).await?;
            let out = output::render_single(&global.output, &user, detail, |u| u.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        UsersCommand::Delete { id } => util::delete(users, id, global).await,
    }
}
