use crate::cli::ConvertArgs;
use crate::commands::open_session;
use crate::config::build_config;
use crate::error::{CliError, Result};
use atomscope::core::io::xyz::XyzFile;
use std::path::Path;
use tracing::{info, warn};

pub fn run(args: ConvertArgs, config_path: Option<&Path>, set_values: &[String], quiet: bool) -> Result<()> {
    let app = build_config(&args.input, config_path, set_values, None)?;
    let (session, outcome) = open_session(&app, !quiet)?;

    if outcome.needs_type_mapping {
        warn!(
            unresolved = ?session.unresolved_type_ids(),
            "Writing placeholder elements for unresolved type ids."
        );
    }

    let comment = session
        .parse_info()
        .map(|p| format!("converted from {}", p.file_name))
        .unwrap_or_default();
    let frames = session.runtime().frames();
    XyzFile::write_to_path(frames, &comment, &args.output).map_err(|e| CliError::FileParsing {
        path: args.output.clone(),
        source: e.into(),
    })?;

    info!(frames = frames.len(), "XYZ written to {:?}", &args.output);
    println!("Wrote {} frame(s) to {}", frames.len(), args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::commands::open_session;
    use crate::commands::test_support::*;
    use atomscope::core::io::traits::StructureFile;
    use atomscope::core::io::xyz::XyzFile;
    use atomscope::core::models::type_map::TypeMapRow;

    #[test]
    fn converted_frames_carry_mapped_elements() {
        let dir = tempfile::tempdir().unwrap();
        let app = app_for(
            write_input(dir.path(), "dump.run", TWO_FRAME_DUMP),
            vec![TypeMapRow::new(1, "C"), TypeMapRow::new(2, "O")],
        );
        let (session, _) = open_session(&app, false).unwrap();

        let out = dir.path().join("out.xyz");
        XyzFile::write_to_path(session.runtime().frames(), "converted", &out).unwrap();

        let model = XyzFile::read_from_path(&out, &Default::default()).unwrap();
        assert_eq!(model.frame_count(), 2);
        let elements: Vec<&str> = model.primary().iter().map(|a| a.element.as_str()).collect();
        assert_eq!(elements, vec!["C", "O"]);
        assert_eq!(model.frames()[1].atoms[0].position.x, 3.0);
    }
}
