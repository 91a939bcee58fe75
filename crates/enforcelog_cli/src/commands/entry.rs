//! `entry save` / `entry show`.

use crate::cli::{EntryCommands, SaveArgs, ShowArgs};
use crate::output::print_values;
use anyhow::{bail, Context};
use enforcelog_core::report::export::values_to_csv;
use enforcelog_core::{
    taxonomy_entries, EntryForm, EntryService, Roster, SessionState, SqliteTableRepository,
};
use enforcelog_core::db::Connection;

pub fn handle(action: EntryCommands, conn: &mut Connection, roster: Roster) -> anyhow::Result<()> {
    let repo = SqliteTableRepository::try_new(conn)?;
    let mut service = EntryService::new(repo, roster);
    match action {
        EntryCommands::Save(args) => save(&mut service, args),
        EntryCommands::Show(args) => show(&mut service, args),
    }
}

fn save(service: &mut EntryService<SqliteTableRepository<'_>>, args: SaveArgs) -> anyhow::Result<()> {
    let enforcer = service.select_enforcer(&args.enforcer)?;
    let mut state = SessionState::new();
    for raw in &args.values {
        let (activity, quantity, remark) = parse_value(raw)?;
        EntryForm::set_quantity(&mut state, &enforcer, activity, quantity)?;
        if let Some(remark) = remark {
            EntryForm::set_remark(&mut state, &enforcer, activity, remark)?;
        }
    }

    let date = args
        .date
        .unwrap_or_else(|| chrono::Local::now().date_naive());
    let written = service.save_entry(&state, &enforcer, date)?;
    println!("Saved {written} rows to table: {enforcer}");
    Ok(())
}

fn show(service: &mut EntryService<SqliteTableRepository<'_>>, args: ShowArgs) -> anyhow::Result<()> {
    let values = service.submitted_values(&args.enforcer)?;
    if values.len() <= 1 {
        println!("No records yet.");
        return Ok(());
    }

    match args.csv {
        Some(path) => {
            std::fs::write(&path, values_to_csv(&values))
                .with_context(|| format!("failed to write `{}`", path.display()))?;
            println!("Wrote {} rows to {}", values.len() - 1, path.display());
        }
        None => print_values(&format!("Submitted data: {}", args.enforcer.trim()), &values),
    }
    Ok(())
}

/// Parses `ACTIVITY=QTY[:REMARK]`, resolving the activity name
/// case-insensitively against the taxonomy.
fn parse_value(raw: &str) -> anyhow::Result<(&'static str, u32, Option<&str>)> {
    let Some((name, rest)) = raw.split_once('=') else {
        bail!("expected ACTIVITY=QTY[:REMARK], got `{raw}`");
    };
    let (quantity_text, remark) = match rest.split_once(':') {
        Some((quantity, remark)) => (quantity, Some(remark.trim())),
        None => (rest, None),
    };
    let quantity: u32 = quantity_text
        .trim()
        .parse()
        .with_context(|| format!("quantity must be a non-negative integer in `{raw}`"))?;

    let name = name.trim();
    let activity = taxonomy_entries()
        .into_iter()
        .map(|entry| entry.activity)
        .find(|activity| activity.eq_ignore_ascii_case(name))
        .with_context(|| format!("unknown activity `{name}`; see `enforcelog taxonomy`"))?;
    Ok((activity, quantity, remark))
}
