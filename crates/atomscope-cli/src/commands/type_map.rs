use crate::cli::TypeMapArgs;
use crate::commands::open_session;
use crate::config::build_config;
use crate::error::Result;
use atomscope::core::chemistry;
use atomscope::core::io::type_map::save_type_map;
use atomscope::core::models::type_map::TypeMapRow;
use std::fmt::Write;
use std::path::Path;
use tracing::{info, warn};

pub fn run(args: TypeMapArgs, config_path: Option<&Path>, set_values: &[String], quiet: bool) -> Result<()> {
    let app = build_config(&args.input, config_path, set_values, None)?;
    let (session, _) = open_session(&app, !quiet)?;

    if !session.has_any_type_id() {
        println!("The file carries no numeric type ids; elements come from the file itself.");
        return Ok(());
    }

    let rows = session.active_type_map_rows();
    print!("{}", render_table(rows));
    let unresolved = session.unresolved_type_ids();
    if unresolved.is_empty() {
        println!("All type ids are resolved.");
    } else {
        warn!(?unresolved, "Unresolved type ids remain.");
        println!(
            "{} type id(s) still map to the placeholder '{}'. Assign them with --type ID=EL.",
            unresolved.len(),
            chemistry::PLACEHOLDER_SYMBOL
        );
    }

    if let Some(path) = &args.save {
        save_type_map(path, rows)?;
        info!("Type map written to {:?}", path);
        println!("Type map written to {}", path.display());
    }
    Ok(())
}

pub fn render_table(rows: &[TypeMapRow]) -> String {
    let mut out = String::from("type  element\n");
    for row in rows {
        let marker = if row.is_unresolved() { "  (unresolved)" } else { "" };
        let _ = writeln!(out, "{:>4}  {}{}", row.type_id, row.element, marker);
    }
    out
}
