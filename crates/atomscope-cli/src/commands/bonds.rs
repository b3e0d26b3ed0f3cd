use crate::cli::BondsArgs;
use crate::commands::open_session;
use crate::config::build_config;
use crate::error::{CliError, Result};
use atomscope::core::bonding::compute_bonds;
use atomscope::core::models::frame::Frame;
use atomscope::core::models::topology::Bond;
use std::fmt::Write;
use std::path::Path;
use tracing::info;

pub fn run(args: BondsArgs, config_path: Option<&Path>, set_values: &[String], quiet: bool) -> Result<()> {
    let app = build_config(&args.input, config_path, set_values, None)?;
    let (session, outcome) = open_session(&app, !quiet)?;

    let frame = session.runtime().frames().get(args.frame).ok_or_else(|| {
        CliError::Argument(format!(
            "Frame {} is out of range (the file has {} frame(s)).",
            args.frame, outcome.frame_count
        ))
    })?;
    let bonds = compute_bonds(&frame.atoms, app.viewer.bonding.bond_factor)
        .map_err(|e| CliError::Other(e.into()))?;
    info!(frame = args.frame, bonds = bonds.len(), "Bonds inferred.");

    print!("{}", render_bonds(frame, &bonds));
    Ok(())
}

/// One `i j length` line per bond, followed by the element pair.
pub fn render_bonds(frame: &Frame, bonds: &[Bond]) -> String {
    let mut out = String::new();
    for bond in bonds {
        let _ = writeln!(
            out,
            "{:>6} {:>6} {:>9.4}  {}-{}",
            bond.i, bond.j, bond.length, frame.atoms[bond.i].element, frame.atoms[bond.j].element
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use atomscope::core::models::atom::Atom;
    use nalgebra::Point3;

    #[test]
    fn renders_one_line_per_bond() {
        let frame = Frame::new(vec![
            Atom::new("O", Point3::origin()),
            Atom::new("H", Point3::new(0.96, 0.0, 0.0)),
        ]);
        let bonds = compute_bonds(&frame.atoms, 1.15).unwrap();
        assert_eq!(render_bonds(&frame, &bonds), "     0      1    0.9600  O-H\n");
    }
}
