//! Device command handlers.

use std::path::PathBuf;
use std::sync::Arc;

use tabled::Tabled;
use voltdesk_core::{Console, Device, DeviceDraft, DeviceStatus};

use crate::cli::{DeviceStatusArg, DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "SN")]
    sn: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Model")]
    model: String,
    #[tabled(rename = "Location")]
    location: String,
    #[tabled(rename = "Status")]
    status: String,
}

impl From<&Arc<Device>> for DeviceRow {
    fn from(d: &Arc<Device>) -> Self {
        Self {
            id: d.id.to_string(),
            sn: d.sn.clone(),
            name: d.name.clone().unwrap_or_default(),
            model: d.model.clone().unwrap_or_default(),
            location: d.location.clone().unwrap_or_default(),
            status: d.status.to_string(),
        }
    }
}

fn detail(d: &Device) -> String {
    let mut lines = vec![
        format!("ID:          {}", d.id),
        format!("SN:          {}", d.sn),
        format!("Name:        {}", util::opt(d.name.as_deref())),
        format!("Model:       {}", util::opt(d.model.as_deref())),
        format!("Location:    {}", util::opt(d.location.as_deref())),
        format!("Status:      {}", d.status),
    ];
    lines.extend(util::audit_lines(&d.audit));
    lines.join("\n")
}

impl From<DeviceStatusArg> for DeviceStatus {
    fn from(arg: DeviceStatusArg) -> Self {
        match arg {
            DeviceStatusArg::Online => Self::Online,
            DeviceStatusArg::Offline => Self::Offline,
            DeviceStatusArg::Maintenance => Self::Maintenance,
        }
    }
}

fn draft(
    from_file: Option<PathBuf>,
    sn: Option<String>,
    name: Option<String>,
    model: Option<String>,
    location: Option<String>,
    status: Option<DeviceStatusArg>,
) -> Result<DeviceDraft, CliError> {
    if let Some(path) = from_file {
        return util::read_json_file(&path);
    }
    Ok(DeviceDraft {
        sn: sn.unwrap_or_default(),
        name,
        model,
        location,
        status: status.map(DeviceStatus::from),
    })
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(
    console: &Console,
    args: DevicesArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let devices = console.devices();

    match args.command {
        DevicesCommand::List(list) => {
            let snap = util::load_filtered(devices, &list, global).await?;
            let out = output::render_list(
                &global.output,
                snap.as_slice(),
                |d| DeviceRow::from(d),
                |d| d.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Get { id } => {
            let device = util::get(devices, id).await?;
            let out = output::render_single(&global.output, &device, detail, |d| d.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Create {
            sn,
            name,
            model,
            location,
            status,
            from_file,
        } => {
            let body = draft(from_file, sn, name, model, location, status)?;
            let device = util::create(devices, body, global).await?;
            let out = output::render_single(&global.output, &device, detail, |d| d.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Update {
            id,
            sn,
            name,
            model,
            location,
            status,
            from_file,
        } => {
            let body = draft(from_file, sn, name, model, location, status)?;
            let device = util::update(devices, id, body, global).await?;
            let out = output::render_single(&global.output, &device, detail, |d| d.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Delete { id } => util::delete(devices, id, global).await,
    }
}
