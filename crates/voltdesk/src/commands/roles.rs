//! Role command handlers, including the role ↔ power assignment.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tabled::Tabled;
use voltdesk_core::view::{menu_label, partition_powers};
use voltdesk_core::{
    Console, EntityId, Menu, Power, PowerSet, Role, RoleDraft, RolePowerTransition,
};

use crate::cli::{GlobalOpts, RolesArgs, RolesCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct RoleRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&Arc<Role>> for RoleRow {
    fn from(r: &Arc<Role>) -> Self {
        Self {
            id: r.id.to_string(),
            name: r.name.clone(),
            description: r.description.clone().unwrap_or_default(),
        }
    }
}

fn detail(r: &Role) -> String {
    let mut lines = vec![
        format!("ID:          {}", r.id),
        format!("Name:        {}", r.name),
        format!("Description: {}", util::opt(r.description.as_deref())),
    ];
    lines.extend(util::audit_lines(&r.audit));
    lines.join("\n")
}

fn draft(
    from_file: Option<PathBuf>,
    name: Option<String>,
    description: Option<String>,
) -> Result<RoleDraft, CliError> {
    if let Some(path) = from_file {
        return util::read_json_file(&path);
    }
    Ok(RoleDraft {
        name: name.unwrap_or_default(),
        description,
    })
}

// ── Assignment view ─────────────────────────────────────────────────

#[derive(Tabled)]
struct GrantRow {
    #[tabled(rename = "Granted")]
    granted: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Menu")]
    menu: String,
}

/// One power with its membership in the role's set.
#[derive(Serialize)]
struct Grant {
    granted: bool,
    #[serde(flatten)]
    power: Arc<Power>,
}

impl GrantRow {
    fn new(g: &Grant, menus: &[Arc<Menu>]) -> Self {
        Self {
            granted: if g.granted { "✓" } else { "" },
            id: g.power.id.to_string(),
            name: g.power.name.clone(),
            code: g.power.code.clone(),
            menu: menu_label(menus, g.power.menu_id),
        }
    }
}

/// Granted powers first, then the rest, each in collection order.
fn grants(powers: &[Arc<Power>], assigned: &PowerSet) -> Vec<Grant> {
    let (granted, rest) = partition_powers(powers, assigned);
    granted
        .into_iter()
        .map(|power| Grant {
            granted: true,
            power,
        })
        .chain(rest.into_iter().map(|power| Grant {
            granted: false,
            power,
        }))
        .collect()
}

fn settle_assignment(transition: Option<RolePowerTransition>) -> Result<PowerSet, CliError> {
    match transition {
        None => Err(CliError::Interrupted),
        Some(
            RolePowerTransition::LoadSucceeded { powers, .. }
            | RolePowerTransition::SaveSucceeded { powers, .. },
        ) => Ok(powers),
        Some(
            RolePowerTransition::LoadFailed { message, .. }
            | RolePowerTransition::SaveFailed { message, .. },
        ) => Err(CliError::from_notification(message)),
        Some(other) => Err(CliError::ApiError {
            message: format!("unexpected completion: {other:?}"),
        }),
    }
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: RolesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let roles = console.roles();

    match args.command {
        RolesCommand::List(list) => {
            let snap = util::load_filtered(roles, &list, global).await?;
            let out = output::render_list(
                &global.output,
                snap.as_slice(),
                |r| RoleRow::from(r),
                |r| r.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RolesCommand::Get { id } => {
            let role = util::get(roles, id).await?;
            let out = output::render_single(&global.output, &role, detail, |r| r.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RolesCommand::Create {
            name,
            description,
            from_file,
        } => {
            let body = draft(from_file, name, description)?;
            let role = util::create(roles, body, global).await?;
            let out = output::render_single(&global.output, &role, detail, |r| r.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RolesCommand::Update {
            id,
            name,
            description,
            from_file,
        } => {
            let body = draft(from_file, name, description)?;
            let role = util::update(roles, id, body, global).await?;
            let out = output::render_single(&global.output, &role, detail, |r| r.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RolesCommand::Delete { id } => util::delete(roles, id, global).await,

        RolesCommand::Powers { id } => {
            let role = EntityId::new(id);
            let assignments = console.role_powers();
            let (assigned, powers, menus) = tokio::try_join!(
                async {
                    settle_assignment(
                        util::with_spinner("Loading role permissions", global, assignments.load(role))
                            .await,
                    )
                },
                util::load_all(console.powers(), global),
                util::load_all(console.menus(), global),
            )?;

            let view = grants(&powers, &assigned);
            let out = output::render_list(
                &global.output,
                view.as_slice(),
                |g| GrantRow::new(g, &menus),
                |g| g.power.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RolesCommand::Assign { id, powers, clear } => {
            let role = EntityId::new(id);
            let set: PowerSet = if clear {
                PowerSet::new()
            } else {
                powers.into_iter().map(EntityId::new).collect()
            };
            let assignments = console.role_powers();
            let saved = settle_assignment(
                util::with_spinner("Saving role permissions", global, assignments.save(role, set))
                    .await,
            )?;
            util::report(&assignments.slice().status(), global);

            let ids: Vec<EntityId> = saved.into_iter().collect();
            let out = output::render_single(
                &global.output,
                &ids,
                |ids| {
                    let joined = ids.iter().map(ToString::to_string).collect::<Vec<_>>();
                    format!("Role {role} powers: {}", joined.join(", "))
                },
                |ids| {
                    ids.iter()
                        .map(ToString::to_string)
                        .collect::<Vec<_>>()
                        .join("\n")
                },
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use voltdesk_core::Audit;

    use super::*;

    fn power(id: i64) -> Arc<Power> {
        Arc::new(Power {
            id: EntityId::new(id),
            name: format!("power-{id}"),
            code: format!("p:{id}"),
            menu_id: None,
            description: None,
            audit: Audit::default(),
        })
    }

    #[test]
    fn grants_put_assigned_first() {
        let powers = vec![power(1), power(2), power(3)];
        let assigned: PowerSet = [EntityId::new(3)].into_iter().collect();

        let view = grants(&powers, &assigned);
        let order: Vec<(i64, bool)> = view.iter().map(|g| (g.power.id.get(), g.granted)).collect();
        assert_eq!(order, vec![(3, true), (1, false), (2, false)]);
    }
}
