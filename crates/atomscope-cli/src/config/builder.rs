use super::defaults::DefaultsConfig;
use super::file::FileConfig;
use super::models::AppConfig;
use crate::cli::{InputArgs, PlaybackArgs};
use crate::error::{CliError, Result};
use crate::utils::parser;
use atomscope::core::io::format::FileFormat;
use atomscope::core::io::type_map::load_type_map;
use atomscope::core::models::type_map::TypeMapRow;
use atomscope::core::typemap;
use atomscope::engine::config as core_config;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::debug;

/// Resolves every setting as `CLI flag > -S value > config file > default`.
pub fn build_config(
    input: &InputArgs,
    config_path: Option<&Path>,
    set_values: &[String],
    playback: Option<&PlaybackArgs>,
) -> Result<AppConfig> {
    let defaults = DefaultsConfig::default();

    let file_config = match config_path {
        Some(path) => FileConfig::from_file(path)?,
        None => FileConfig::default(),
    };
    let mut file_config = apply_set_values(file_config, set_values)?;

    let bonding_file = file_config.bonding.take().unwrap_or_default();
    let parsing_file = file_config.parsing.take().unwrap_or_default();
    let style_file = file_config.style.take().unwrap_or_default();
    let playback_file = file_config.playback.take().unwrap_or_default();
    let playback = playback.cloned().unwrap_or_default();

    let bond_factor = input
        .bond_factor
        .or(bonding_file.factor)
        .unwrap_or(defaults.bond_factor);
    let sort_by_id = if input.no_sort {
        false
    } else {
        parsing_file.sort_by_id.unwrap_or(defaults.sort_by_id)
    };
    let format = match (input.format, parsing_file.format.as_deref()) {
        (Some(format), _) => Some(format),
        (None, Some(name)) => Some(
            name.parse::<FileFormat>()
                .map_err(|e| CliError::Config(e.to_string()))?,
        ),
        (None, None) => None,
    };
    let fps = playback.fps.or(playback_file.fps).unwrap_or(defaults.fps);
    let looping = if playback.no_loop {
        false
    } else {
        playback_file.looping.unwrap_or(defaults.looping)
    };

    let mut type_overrides = BTreeMap::new();
    for raw in &input.types {
        let (type_id, element) =
            parser::parse_type_assignment(raw).map_err(|e| CliError::Argument(e.to_string()))?;
        type_overrides.insert(type_id, element);
    }

    let mut builder = core_config::ViewerConfigBuilder::new()
        .bond_factor(bond_factor)
        .sort_by_id(sort_by_id)
        .format(format)
        .type_overrides(type_overrides.clone())
        .atom_scale(style_file.atom_scale.unwrap_or(defaults.atom_scale))
        .bond_radius(style_file.bond_radius.unwrap_or(defaults.bond_radius))
        .fps(fps)
        .looping(looping);
    for (element, radius) in style_file.radius.unwrap_or_default() {
        let element = parser::parse_element(&element).map_err(|e| CliError::Config(e.to_string()))?;
        builder = builder.radius_override(&element, radius);
    }
    let viewer = builder.build().map_err(|e| CliError::Config(e.to_string()))?;

    let mut rows: Vec<TypeMapRow> = type_overrides
        .iter()
        .map(|(&id, element)| TypeMapRow::new(id, element))
        .collect();
    if let Some(path) = &input.type_map {
        debug!("Loading type map from {:?}", path);
        rows.extend(load_type_map(path)?);
    }
    for (key, element) in file_config.type_map.take().unwrap_or_default() {
        let type_id = parser::parse_type_id(&key).map_err(|e| CliError::Config(e.to_string()))?;
        let element = parser::parse_element(&element).map_err(|e| CliError::Config(e.to_string()))?;
        rows.push(TypeMapRow::new(type_id, &element));
    }

    Ok(AppConfig {
        input_path: input.input.clone(),
        viewer,
        type_map_rows: typemap::normalize(&rows),
    })
}

fn invalid_value(key: &str, value: &str, expected: &str) -> CliError {
    CliError::Config(format!("Invalid {} value for {}: {}", expected, key, value))
}

fn apply_set_values(mut config: FileConfig, set_values: &[String]) -> Result<FileConfig> {
    for kv_pair in set_values {
        let (key, value) = parser::parse_key_value(kv_pair).map_err(|_| {
            CliError::Config(format!("Invalid --set format: '{}'. Expected KEY=VALUE.", kv_pair))
        })?;
        let float = || value.parse::<f64>().map_err(|_| invalid_value(key, value, "float"));
        let boolean = || value.parse::<bool>().map_err(|_| invalid_value(key, value, "boolean"));

        match key {
            "bonding.factor" => {
                config.bonding.get_or_insert_with(Default::default).factor = Some(float()?);
            }
            "parsing.sort-by-id" => {
                config.parsing.get_or_insert_with(Default::default).sort_by_id = Some(boolean()?);
            }
            "parsing.format" => {
                config.parsing.get_or_insert_with(Default::default).format = Some(value.to_string());
            }
            "style.atom-scale" => {
                config.style.get_or_insert_with(Default::default).atom_scale = Some(float()?);
            }
            "style.bond-radius" => {
                config.style.get_or_insert_with(Default::default).bond_radius = Some(float()?);
            }
            "playback.fps" => {
                config.playback.get_or_insert_with(Default::default).fps = Some(float()?);
            }
            "playback.looping" => {
                config.playback.get_or_insert_with(Default::default).looping = Some(boolean()?);
            }
            _ => {
                if let Some(element) = key.strip_prefix("style.radius.") {
                    config
                        .style
                        .get_or_insert_with(Default::default)
                        .radius
                        .get_or_insert_with(Default::default)
                        .insert(element.to_string(), float()?);
                } else if let Some(type_id) = key.strip_prefix("type-map.") {
                    config
                        .type_map
                        .get_or_insert_with(Default::default)
                        .insert(type_id.to_string(), value.to_string());
                } else {
                    return Err(CliError::Config(format!(
                        "Unsupported configuration key for --set: '{}'",
                        key
                    )));
                }
            }
        }
    }
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::tempdir;

    fn base_input() -> InputArgs {
        InputArgs {
            input: PathBuf::from("dump.run"),
            format: None,
            no_sort: false,
            bond_factor: None,
            type_map: None,
            types: vec![],
        }
    }

    fn write_config(dir: &Path, content: &str) -> PathBuf {
        let path = dir.join("atomscope.toml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn defaults_apply_without_file_or_flags() {
        let app = build_config(&base_input(), None, &[], None).unwrap();
        let defaults = DefaultsConfig::default();
        assert_eq!(app.input_path, PathBuf::from("dump.run"));
        assert_eq!(app.viewer.bonding.bond_factor, defaults.bond_factor);
        assert!(app.viewer.parsing.sort_by_id);
        assert_eq!(app.viewer.parsing.format, None);
        assert_eq!(app.viewer.style.atom_scale, defaults.atom_scale);
        assert_eq!(app.viewer.playback.fps, defaults.fps);
        assert!(app.viewer.playback.looping);
        assert!(app.type_map_rows.is_empty());
    }

    #[test]
    fn file_values_are_merged() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            r#"
            [bonding]
            factor = 1.25
            [parsing]
            sort-by-id = false
            format = "data"
            [style]
            bond-radius = 0.2
            radius = { o = 0.5 }
            [playback]
            fps = 30.0
            looping = false
            [type-map]
            "2" = "o"
            "1" = "Si"
            "#,
        );

        let app = build_config(&base_input(), Some(&path), &[], None).unwrap();
        assert_eq!(app.viewer.bonding.bond_factor, 1.25);
        assert!(!app.viewer.parsing.sort_by_id);
        assert_eq!(app.viewer.parsing.format, Some(FileFormat::LammpsData));
        assert_eq!(app.viewer.style.bond_radius, 0.2);
        assert_eq!(app.viewer.style.radius_overrides["O"], 0.5);
        assert_eq!(app.viewer.playback.fps, 30.0);
        assert!(!app.viewer.playback.looping);
        assert_eq!(
            app.type_map_rows,
            vec![TypeMapRow::new(1, "Si"), TypeMapRow::new(2, "O")]
        );
    }

    #[test]
    fn cli_overrides_file_values() {
        let dir = tempdir().unwrap();
        let path = write_config(
            dir.path(),
            "[bonding]\nfactor = 1.25\n[playback]\nfps = 30.0\n[type-map]\n\"1\" = \"C\"\n",
        );
        let mut input = base_input();
        input.bond_factor = Some(1.4);
        input.no_sort = true;
        input.format = Some(FileFormat::LammpsDump);
        input.types = vec!["1=Si".to_string()];
        let playback = PlaybackArgs {
            fps: Some(5.0),
            no_loop: true,
        };

        let app = build_config(&input, Some(&path), &[], Some(&playback)).unwrap();
        assert_eq!(app.viewer.bonding.bond_factor, 1.4);
        assert!(!app.viewer.parsing.sort_by_id);
        assert_eq!(app.viewer.parsing.format, Some(FileFormat::LammpsDump));
        assert_eq!(app.viewer.parsing.type_overrides[&1], "Si");
        assert_eq!(app.viewer.playback.fps, 5.0);
        assert!(!app.viewer.playback.looping);
        assert_eq!(app.type_map_rows, vec![TypeMapRow::new(1, "Si")]);
    }

    #[test]
    fn type_map_file_sits_between_flags_and_config_table() {
        let dir = tempdir().unwrap();
        let table = dir.path().join("types.csv");
        fs::write(&table, "type_id,element\n1,C\n2,N\n").unwrap();
        let path = write_config(dir.path(), "[type-map]\n\"2\" = \"O\"\n\"3\" = \"H\"\n");
        let mut input = base_input();
        input.type_map = Some(table);
        input.types = vec!["1=Fe".to_string()];

        let app = build_config(&input, Some(&path), &[], None).unwrap();
        assert_eq!(
            app.type_map_rows,
            vec![
                TypeMapRow::new(1, "Fe"),
                TypeMapRow::new(2, "N"),
                TypeMapRow::new(3, "H")
            ]
        );
    }

    #[test]
    fn set_values_override_file() {
        let dir = tempdir().unwrap();
        let path = write_config(dir.path(), "[bonding]\nfactor = 1.25\n");
        let set_values = vec![
            "bonding.factor=1.05".to_string(),
            "parsing.sort-by-id=false".to_string(),
            "style.atom-scale=0.5".to_string(),
            "style.radius.Na=1.1".to_string(),
            "playback.looping=false".to_string(),
            "type-map.4=cl".to_string(),
        ];

        let app = build_config(&base_input(), Some(&path), &set_values, None).unwrap();
        assert!((app.viewer.bonding.bond_factor - 1.05).abs() < 1e-12);
        assert!(!app.viewer.parsing.sort_by_id);
        assert_eq!(app.viewer.style.atom_scale, 0.5);
        assert_eq!(app.viewer.style.radius_overrides["Na"], 1.1);
        assert!(!app.viewer.playback.looping);
        assert_eq!(app.type_map_rows, vec![TypeMapRow::new(4, "Cl")]);
    }

    #[test]
    fn unsupported_or_malformed_set_values_are_config_errors() {
        for bad in ["bonding.strength=2", "bonding.factor", "playback.fps=fast"] {
            let result = build_config(&base_input(), None, &[bad.to_string()], None);
            assert!(matches!(result, Err(CliError::Config(_))), "{bad}");
        }
    }

    #[test]
    fn non_positive_values_fail_validation() {
        let mut input = base_input();
        input.bond_factor = Some(0.0);
        assert!(matches!(
            build_config(&input, None, &[], None),
            Err(CliError::Config(_))
        ));

        let playback = PlaybackArgs {
            fps: Some(-1.0),
            no_loop: false,
        };
        assert!(matches!(
            build_config(&base_input(), None, &[], Some(&playback)),
            Err(CliError::Config(_))
        ));
    }

    #[test]
    fn bad_type_flag_is_an_argument_error() {
        let mut input = base_input();
        input.types = vec!["x=Si".to_string()];
        assert!(matches!(
            build_config(&input, None, &[], None),
            Err(CliError::Argument(_))
        ));
    }
}
