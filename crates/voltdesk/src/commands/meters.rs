//! Meter command handlers.

use std::path::PathBuf;
use std::sync::Arc;

use tabled::Tabled;
use voltdesk_core::view::device_label;
use voltdesk_core::{Console, Device, EntityId, Meter, MeterDraft, MeterKind};

use crate::cli::{GlobalOpts, MeterKindArg, MetersArgs, MetersCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct MeterRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Meter No")]
    meter_no: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Kind")]
    kind: String,
    #[tabled(rename = "Unit")]
    unit: String,
    #[tabled(rename = "Device")]
    device: String,
}

impl MeterRow {
    fn new(m: &Meter, devices: &[Arc<Device>]) -> Self {
        Self {
            id: m.id.to_string(),
            meter_no: m.meter_no.clone(),
            name: m.name.clone().unwrap_or_default(),
            kind: m.kind.to_string(),
            unit: m.unit.clone().unwrap_or_default(),
            device: device_label(devices, m.device_id),
        }
    }
}

fn detail(m: &Meter) -> String {
    let mut lines = vec![
        format!("ID:          {}", m.id),
        format!("Meter No:    {}", m.meter_no),
        format!("Name:        {}", util::opt(m.name.as_deref())),
        format!("Kind:        {}", m.kind),
        format!("Unit:        {}", util::opt(m.unit.as_deref())),
        format!(
            "Device ID:   {}",
            m.device_id.map_or_else(|| "-".into(), |id| id.to_string())
        ),
    ];
    lines.extend(util::audit_lines(&m.audit));
    lines.join("\n")
}

impl From<MeterKindArg> for MeterKind {
    fn from(arg: MeterKindArg) -> Self {
        match arg {
            MeterKindArg::Electricity => Self::Electricity,
            MeterKindArg::Water => Self::Water,
            MeterKindArg::Gas => Self::Gas,
            MeterKindArg::Heat => Self::Heat,
        }
    }
}

fn draft(
    from_file: Option<PathBuf>,
    meter_no: Option<String>,
    name: Option<String>,
    device: Option<i64>,
    kind: Option<MeterKindArg>,
    unit: Option<String>,
) -> Result<MeterDraft, CliError> {
    if let Some(path) = from_file {
        return util::read_json_file(&path);
    }
    Ok(MeterDraft {
        meter_no: meter_no.unwrap_or_default(),
        name,
        device_id: device.map(EntityId::new),
        kind: kind.map(MeterKind::from),
        unit,
    })
}

pub async fn handle(
    console: &Console,
    args: MetersArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let meters = console.meters();

    match args.command {
        MetersCommand::List(list) => {
            let (snap, devices) = tokio::try_join!(
                util::load_filtered(meters, &list, global),
                util::load_all(console.devices(), global),
            )?;
            let out = output::render_list(
                &global.output,
                snap.as_slice(),
                |m| MeterRow::new(m, &devices),
                |m| m.id.to_string(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MetersCommand::Get { id } => {
            let meter = util::get(meters, id).await?;
            let out = output::render_single(&global.output, &meter, detail, |m| m.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MetersCommand::Create {
            meter_no,
            name,
            device,
            kind,
            unit,
            from_file,
        } => {
            let body = draft(from_file, meter_no, name, device, kind, unit)?;
            let meter = util::create(meters, body, global).await?;
            let out = output::render_single(&global.output, &meter, detail, |m| m.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MetersCommand::Update {
            id,
            meter_no,
            name,
            device,
            kind,
            unit,
            from_file,
        } => {
            let body = draft(from_file, meter_no, name, device, kind, unit)?;
            let meter = util::update(meters, id, body, global).await?;
            let out = output::render_single(&global.output, &meter, detail, |m| m.id.to_string());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        MetersCommand::Delete { id } => util::delete(meters, id, global).await,
    }
}
