//! Command handlers
//!
//! Each handler prints its result to stdout (JSON for entity commands, a
//! summary line for imports). Logs go to stderr.

use std::time::Instant;

use anyhow::{bail, Context};
use roombook_core::{BatchImporter, PipelineOptions};
use roombook_domain::{RawResponse, RoomRef, TimeWindow};
use roombook_infra::{write_report_file, ImportTable, PurgeReport, SisClient};
use serde_json::{json, Value};
use tracing::info;

use crate::cli::{
    Cli, Commands, EventCommand, EventTypeCommand, ImportArgs, RoomCommand, StaffCommand,
};
use crate::context::AppContext;
use crate::logging::log_command_execution;

/// Build the context and run the selected command.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    let name = cli.command.name();
    let start = Instant::now();

    let result = dispatch(cli).await;

    log_command_execution(name, start.elapsed(), result.as_ref().err());
    result
}

async fn dispatch(cli: Cli) -> anyhow::Result<()> {
    let ctx = AppContext::new(cli.config)?;

    match cli.command {
        Commands::Import(args) => import(&ctx, &args).await,
        Commands::EventTypes(command) => event_types(&ctx.client, command).await,
        Commands::Rooms(command) => rooms(&ctx.client, command).await,
        Commands::Staff(command) => staff(&ctx, command).await,
        Commands::Events(command) => events(&ctx.client, command).await,
    }
}

async fn import(ctx: &AppContext, args: &ImportArgs) -> anyhow::Result<()> {
    let table = ImportTable::from_path(&args.input)?;

    let mut options = PipelineOptions::from_config(&ctx.config.import).with_dry_run(args.dry_run);
    if let Some(mode) = args.mode {
        options.mode = mode;
    }
    if let Some(policy) = args.orphan_policy {
        options.orphan_policy = policy;
    }

    let cache = ctx.config.import.cache_lookups && !args.no_cache;
    let importer = BatchImporter::new(ctx.client.clone(), options).with_cache(cache);
    let report = importer.run(table.rows()).await;

    write_report_file(&args.output, &table, &report.outcomes)
        .with_context(|| format!("failed to write report to {}", args.output.display()))?;

    let summary = report.summary;
    info!(
        run_id = %report.run_id,
        output = %args.output.display(),
        "report written"
    );
    println!(
        "{} rows: {} succeeded, {} failed ({} orphaned events). Report: {}",
        summary.total,
        summary.succeeded,
        summary.failed,
        summary.orphaned_events,
        args.output.display()
    );
    Ok(())
}

async fn event_types(client: &SisClient, command: EventTypeCommand) -> anyhow::Result<()> {
    match command {
        EventTypeCommand::List => print_json(&client.list_event_types().await?),
        EventTypeCommand::Get { code } => print_json(&client.get_event_type(&code).await?),
        EventTypeCommand::Create { code, name } => {
            print_json(&client.create_event_type(&code, &name).await?)
        }
        EventTypeCommand::Update { code, new_code, name, inactive } => {
            let response = client.update_event_type(&code, &new_code, &name, !inactive).await?;
            print_raw(&response)
        }
        EventTypeCommand::Enable { code } => print_raw(&client.enable_event_type(&code).await?),
        EventTypeCommand::Disable { code } => print_raw(&client.disable_event_type(&code).await?),
        EventTypeCommand::Delete { code } => {
            client.delete_event_type(&code).await?;
            print_json(&json!({ "deleted": code }))
        }
    }
}

async fn rooms(client: &SisClient, command: RoomCommand) -> anyhow::Result<()> {
    match command {
        RoomCommand::Lookup { name } => {
            let room = client.lookup_room(&name).await?;
            print_json(&room_json(&room))
        }
        RoomCommand::Block { name, start, end, reason } => {
            let window = TimeWindow::parse(&start, &end)?;
            let room = client.lookup_room(&name).await?;
            let created = client
                .create_room_unavailability(
                    &room.id,
                    &window.start_str(),
                    &window.end_str(),
                    &reason,
                )
                .await?;
            print_json(&created)
        }
    }
}

async fn staff(ctx: &AppContext, command: StaffCommand) -> anyhow::Result<()> {
    match command {
        StaffCommand::Lookup { email, address_type } => {
            let address_type =
                address_type.unwrap_or_else(|| ctx.config.import.email_address_type.clone());
            let owner = ctx.client.lookup_email_owner_id(&email, &address_type).await?;
            match owner {
                Some(id) => print_json(&json!({ "email": email, "staffId": id })),
                None => bail!("no staff member owns {address_type} address {email}"),
            }
        }
    }
}

async fn events(client: &SisClient, command: EventCommand) -> anyhow::Result<()> {
    match command {
        EventCommand::List => print_json(&client.list_school_events().await?),
        EventCommand::Delete { id } => {
            client.delete_school_event(&id).await?;
            print_json(&json!({ "deleted": id }))
        }
        EventCommand::Purge { event_type } => {
            let report = client.purge_school_events_by_type(&event_type).await?;
            print_json(&purge_json(&report))?;
            if !report.failed.is_empty() {
                bail!(
                    "{} of {} events could not be deleted",
                    report.failed.len(),
                    report.failed.len() + report.deleted.len()
                );
            }
            Ok(())
        }
    }
}

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print the body of a raw response, failing on a non-2xx status.
fn print_raw(response: &RawResponse) -> anyhow::Result<()> {
    if !response.is_success() {
        bail!("request failed with status {}: {}", response.status, response.body.trim());
    }
    let body = serde_json::from_str::<Value>(&response.body)
        .unwrap_or_else(|_| Value::String(response.body.clone()));
    print_json(&json!({ "status": response.status, "body": body }))
}

fn room_json(room: &RoomRef) -> Value {
    json!({
        "id": room.id,
        "roomName": room.room_name,
        "shortName": room.short_name,
        "siteName": room.site_name,
    })
}

fn purge_json(report: &PurgeReport) -> Value {
    let failed: Vec<Value> = report
        .failed
        .iter()
        .map(|(id, err)| json!({ "id": id, "error": err.to_string() }))
        .collect();
    json!({ "deleted": report.deleted, "failed": failed })
}
