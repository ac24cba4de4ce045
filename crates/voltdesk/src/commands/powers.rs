//! Power (permission) command handlers.

use std::fmt::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use tabled::Tabled;
use voltdesk_core::view::{group_powers_by_menu, menu_label};
use voltdesk_core::{Console, EntityId, Menu, Power, PowerDraft};

use crate::cli::{GlobalOpts, OutputFormat, PowersArgs, PowersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
pub(super) struct PowerRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Menu")]
    menu: String,
}

impl PowerRow {
    pub(super) fn new(p: &Power, menus: &[Arc<Menu>]) -> Self {
        Self {
            id: p.id.to_string(),
            name: p.name.clone(),
            code: p.code.clone(),
            menu: menu_label(menus, p.menu_id),
        }
    }
}

fn detail(p: &Power) -> String {
    let mut lines = vec![
        format!("ID:          {}", p.id),
        format!("Name:        {}", p.name),
        format!("Code:        {}", p.code),
        format!(
            "Menu ID:     {}",
            p.menu_id.map_or_else(|| "-".into(), |id| id.to_string())
        ),
        format!("Description: {}", util::opt(p.description.as_deref())),
    ];
    lines.extend(util::audit_lines(&p.audit));
    lines.join("\n")
}

fn draft(
    from_file: Option<PathBuf>,
    name: Option<String>,
    code: Option<String>,
    menu: Option<i64>,
    description: Option<String>,
) -> Result<PowerDraft, CliError> {
    if let Some(path) = from_file {
        return util::read_json_file(&path);
    }
    Ok(PowerDraft {
        name: name.unwrap_or_default(),
        code: code.unwrap_or_default(),
        menu_id: menu.map(EntityId::new),
        description,
    })
}

pub async fn handle(
    console: &Console,
    args: PowersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let powers = console.powers();

    match args.command {
        PowersCommand::List { list, grouped } => {
            let (snap, menus) = tokio::try_join!(
                util::load_filtered(powers, &list, global),
                util::load_all(console.menus(), global),
            )?;

            let out = if grouped {
                let groups = group_powers_by_menu(&snap, &menus);
                match global.output {
                    OutputFormat::Table => {
                        let mut text = String::new();
                        for (title, members) in &groups {
                            let table = output::render_list(
                                &OutputFormat::Table,
                                members.as_slice(),
                                |p| PowerRow::new(p, &menus),
                                |p| p.id.to_string(),
                            );
                            let _ = writeln!(text, "{title} ({})\n{table}", members.len());
                        }
                        text.trim_end().to_owned()
                    }
                    OutputFormat::Plain => groups
                        .iter()
                        .flat_map(|(title, members)| {
                            members.iter().map(move |p| format!("{title}\t{}", p.id))
                        })
                        .collect::<Vec<_>>()
                        .join("\n"),
                    // Structured formats serialize the grouping as-is.
                    OutputFormat::Json | OutputFormat::JsonCompact | OutputFormat::Yaml => {
                        output::render_single(&global.output, &groups, |_| String::new(), |_| {
                            String::new()
                        })
                    }
                }
            } else {
                output::render_list(
                    &global.output,
                    snap.as_slice(),
                    |p| PowerRow::new(p, &menus),
                    |p| p.id.to_string(),
                )
            };
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PowersCommand::Get { id } => {
            let power = util::get(powers, id).await?;
            let out = output::render_single(&global.output, &power, detail, |p| p.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PowersCommand::Create {
            name,
            code,
            menu,
            description,
            from_file,
        } => {
            let body = draft(from_file, name, code, menu, description)?;
            let power = util::create(powers, body, global).await?;
            let out = output::render_single(&global.output, &power, detail, |p| p.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PowersCommand::Update {
            id,
            name,
            code,
            menu,
            description,
            from_file,
        } => {
            let body = draft(from_file, name, code, menu, description)?;
            let power = util::update(powers, id, body, global).await?;
            let out = output::render_single(&global.output, &power, detail, |p| p.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        PowersCommand::Delete { id } => util::delete(powers, id, global).await,
    }
}
