//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::de::DeserializeOwned;

use voltdesk_core::view::{Searchable, filter_by};
use voltdesk_core::{
    Audit, Entity, EntityId, EntityTransition, Orchestrator, Status,
};

use crate::cli::{GlobalOpts, ListArgs};
use crate::error::CliError;
use crate::output;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: message.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))
}

/// Read a `--from-file` JSON body straight into a draft type.
pub fn read_json_file<D: DeserializeOwned>(path: &Path) -> Result<D, CliError> {
    let contents = std::fs::read_to_string(path)?;
    serde_json::from_str(&contents).map_err(|e| CliError::Validation {
        field: "from-file".into(),
        reason: format!("invalid JSON: {e}"),
    })
}

/// Await `fut` behind a stderr spinner when attached to a terminal.
pub async fn with_spinner<F: Future>(label: &str, global: &GlobalOpts, fut: F) -> F::Output {
    if global.quiet || !std::io::stderr().is_terminal() {
        return fut.await;
    }
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(label.to_owned());
    spinner.enable_steady_tick(Duration::from_millis(80));
    let out = fut.await;
    spinner.finish_and_clear();
    out
}

/// Turn an orchestrator completion into a result.
///
/// `None` means the work was cancelled or superseded; `*Failed` becomes
/// the matching CLI error carrying the notification text.
pub fn settle<T: Entity>(
    transition: Option<EntityTransition<T>>,
) -> Result<EntityTransition<T>, CliError> {
    match transition {
        None => Err(CliError::Interrupted),
        Some(
            EntityTransition::FetchFailed(message)
            | EntityTransition::CreateFailed(message)
            | EntityTransition::UpdateFailed(message)
            | EntityTransition::DeleteFailed(message),
        ) => Err(CliError::from_notification(message)),
        Some(other) => Ok(other),
    }
}

/// Print whatever notification the slice currently shows.
pub fn report(status: &Status, global: &GlobalOpts) {
    output::print_notification(
        &status.notification,
        output::should_color(&global.color),
        global.quiet,
    );
}

/// Load a collection into its slice and return the snapshot.
pub async fn load_all<T: Entity>(
    orch: &Orchestrator<T>,
    global: &GlobalOpts,
) -> Result<Arc<Vec<Arc<T>>>, CliError> {
    let label = format!("Loading {}", T::KIND.collection());
    settle(with_spinner(&label, global, orch.fetch_all()).await)?;
    Ok(orch.get_all())
}

/// `load_all` followed by the optional `--search` filter.
pub async fn load_filtered<T: Entity + Searchable>(
    orch: &Orchestrator<T>,
    list: &ListArgs,
    global: &GlobalOpts,
) -> Result<Arc<Vec<Arc<T>>>, CliError> {
    let records = load_all(orch, global).await?;
    Ok(match list.search.as_deref() {
        Some(query) => filter_by(&records, query),
        None => records,
    })
}

/// Create a record and reload the collection, then report.
pub async fn create<T: Entity>(
    orch: &Orchestrator<T>,
    draft: T::Draft,
    global: &GlobalOpts,
) -> Result<T, CliError> {
    let label = format!("Creating {}", T::KIND);
    let transition = settle(with_spinner(&label, global, orch.create_then_refresh(draft)).await)?;
    report(&orch.slice().status(), global);
    match transition {
        EntityTransition::CreateSucceeded(record) => Ok(record),
        other => Err(unexpected(&other)),
    }
}

pub async fn update<T: Entity>(
    orch: &Orchestrator<T>,
    id: i64,
    draft: T::Draft,
    global: &GlobalOpts,
) -> Result<T, CliError> {
    let label = format!("Updating {} {id}", T::KIND);
    let transition =
        settle(with_spinner(&label, global, orch.update(EntityId::new(id), draft)).await)?;
    report(&orch.slice().status(), global);
    match transition {
        EntityTransition::UpdateSucceeded(record) => Ok(record),
        other => Err(unexpected(&other)),
    }
}

/// Confirm, delete, report.
pub async fn delete<T: Entity>(
    orch: &Orchestrator<T>,
    id: i64,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    if !confirm(&format!("Delete {} {id}?", T::KIND), global.yes)? {
        return Ok(());
    }
    let label = format!("Deleting {} {id}", T::KIND);
    settle(with_spinner(&label, global, orch.delete(EntityId::new(id))).await)?;
    report(&orch.slice().status(), global);
    Ok(())
}

/// Fetch a single record without touching the slice.
pub async fn get<T: Entity>(orch: &Orchestrator<T>, id: i64) -> Result<T, CliError> {
    orch.fetch_one(EntityId::new(id)).await.map_err(|e| {
        if e.status() == Some(404) {
            CliError::NotFound {
                resource_type: T::KIND.to_string(),
                identifier: id.to_string(),
                list_command: format!("{} list", T::KIND.collection()),
            }
        } else {
            e.into()
        }
    })
}

fn unexpected<T: Entity>(transition: &EntityTransition<T>) -> CliError {
    CliError::ApiError {
        message: format!("unexpected completion: {transition:?}"),
    }
}

pub fn opt(value: Option<&str>) -> String {
    value.unwrap_or("-").to_owned()
}

/// Trailing detail lines for the server-maintained audit fields.
pub fn audit_lines(audit: &Audit) -> Vec<String> {
    let stamp = |at: Option<chrono::DateTime<chrono::Utc>>| {
        at.map_or_else(|| "-".into(), |t| t.format("%Y-%m-%d %H:%M").to_string())
    };
    vec![
        format!(
            "Created:     {} by {}",
            stamp(audit.created_at),
            opt(audit.created_by.as_deref())
        ),
        format!(
            "Modified:    {} by {}",
            stamp(audit.modified_at),
            opt(audit.modified_by.as_deref())
        ),
    ]
}
