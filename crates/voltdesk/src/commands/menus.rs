//! Menu command handlers (read-only).

use std::sync::Arc;

use tabled::Tabled;
use voltdesk_core::view::menu_label;
use voltdesk_core::{Console, Menu};

use crate::cli::{GlobalOpts, MenusArgs, MenusCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct MenuRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Title")]
    title: String,
    #[tabled(rename = "Path")]
    path: String,
    #[tabled(rename = "Parent")]
    parent: String,
    #[tabled(rename = "Sort")]
    sort: i32,
}

impl MenuRow {
    fn new(m: &Menu, menus: &[Arc<Menu>]) -> Self {
        Self {
            id: m.id.to_string(),
            title: m.title.clone(),
            path: m.path.clone().unwrap_or_default(),
            parent: menu_label(menus, m.parent_id),
            sort: m.sort,
        }
    }
}

fn detail(m: &Menu) -> String {
    let mut lines = vec![
        format!("ID:          {}", m.id),
        format!("Title:       {}", m.title),
        format!("Path:        {}", util::opt(m.path.as_deref())),
        format!(
            "Parent ID:   {}",
            m.parent_id.map_or_else(|| "-".into(), |id| id.to_string())
        ),
        format!("Sort:        {}", m.sort),
    ];
    lines.extend(util::audit_lines(&m.audit));
    lines.join("\n")
}

pub async fn handle(
    console: &Console,
    args: MenusArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let menus = console.menus();

    match args.command {
        MenusCommand::List(list) => {
            let snap = util::load_filtered(menus, &list, global).await?;
            // Parents resolve against the full collection, not the filtered one.
            let all = menus.get_all();
            let out = output::render_list(
                &global.output,
                snap.as_slice(),
                |m| MenuRow::new(m, &all),
                |m| m.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MenusCommand::Get { id } => {
            let menu = util::get(menus, id).await?;
            let out = output::render_single(&global.output, &menu, detail, |m| m.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }
    }
}
