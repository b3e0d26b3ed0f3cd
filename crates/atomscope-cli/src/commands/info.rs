use crate::cli::InfoArgs;
use crate::commands::open_session;
use crate::config::build_config;
use crate::error::Result;
use atomscope::engine::backend::InstanceBackend;
use atomscope::engine::batch::BatchKind;
use atomscope::workflows::session::{LoadOutcome, Session};
use std::fmt::Write;
use std::path::Path;

pub fn run(args: InfoArgs, config_path: Option<&Path>, set_values: &[String], quiet: bool) -> Result<()> {
    let app = build_config(&args.input, config_path, set_values, None)?;
    let (session, outcome) = open_session(&app, !quiet)?;
    print!("{}", render_report(&session, &outcome));
    Ok(())
}

/// Plain-text summary of a loaded session.
pub fn render_report<B: InstanceBackend>(session: &Session<B>, outcome: &LoadOutcome) -> String {
    let mut out = String::new();
    if let Some(info) = session.parse_info() {
        let format = info.format.map(|f| f.to_string()).unwrap_or_else(|| "unknown".into());
        let _ = writeln!(out, "File:        {}", info.file_name);
        let _ = writeln!(out, "Format:      {}", format);
        let _ = writeln!(out, "Atoms:       {}", info.atom_count);
        let _ = writeln!(out, "Frames:      {}", info.frame_count);
    }
    let _ = writeln!(out, "Animated:    {}", if outcome.has_animation { "yes" } else { "no" });

    if session.has_any_type_id() {
        let ids: Vec<String> = session.detected_type_ids().iter().map(u32::to_string).collect();
        let _ = writeln!(out, "Type ids:    {}", ids.join(" "));
        let unresolved = session.unresolved_type_ids();
        if unresolved.is_empty() {
            let _ = writeln!(out, "Unresolved:  none");
        } else {
            let ids: Vec<String> = unresolved.iter().map(u32::to_string).collect();
            let _ = writeln!(out, "Unresolved:  {}", ids.join(" "));
        }
    }

    let _ = writeln!(out, "Bonds:       {}", session.runtime().bond_count());
    if let Some(view) = &outcome.view {
        let _ = writeln!(
            out,
            "View:        center ({:.3}, {:.3}, {:.3}) radius {:.3}",
            view.center.x, view.center.y, view.center.z, view.radius
        );
    }

    let batches = session.visible_batches();
    let _ = writeln!(out, "Batches:     {}", batches.len());
    for batch in batches {
        let kind = match batch.kind {
            BatchKind::Atoms => "atoms",
            BatchKind::Bonds => "bonds",
        };
        let _ = writeln!(
            out,
            "  {:<5} {:<8} {} x{}",
            kind,
            batch.key.to_string(),
            batch.color,
            batch.instance_count
        );
    }
    out
}
