use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use blockfit_engine::GameConfig;

/// Writes `value` as pretty-printed JSON to `path`, or to stdout when `path` is `None`.
pub fn write_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    let target = path.map_or_else(|| "stdout".to_owned(), |path| path.display().to_string());
    let mut writer: Box<dyn Write> = match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {target}"))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };
    serde_json::to_writer_pretty(&mut writer, value)
        .with_context(|| format!("Failed to write JSON to {target}"))?;
    writeln!(writer)
        .and_then(|()| writer.flush())
        .with_context(|| format!("Failed to flush output to {target}"))?;
    Ok(())
}

pub fn read_json_file<T, P>(file_kind: &str, path: P) -> anyhow::Result<T>
where
    T: serde::de::DeserializeOwned,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open {} file: {}", file_kind, path.display()))?;

    let reader = io::BufReader::new(file);
    let value = serde_json::from_reader(reader).with_context(|| {
        format!(
            "Failed to parse {} JSON file: {}",
            file_kind,
            path.display()
        )
    })?;

    Ok(value)
}

/// Read a game configuration from a JSON file. Missing fields take their defaults.
pub fn read_config_file<P>(path: P) -> anyhow::Result<GameConfig>
where
    P: AsRef<Path>,
{
    read_json_file("config", path)
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf};

    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("blockfit-util-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_read_config_file() {
        let path = temp_path("config.json");
        fs::write(&path, r#"{ "noise_cells": 2, "spawn": { "offer_size": 3 } }"#).unwrap();
        let config = read_config_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert_eq!(config.noise_cells, 2);
        assert_eq!(config.spawn.offer_size, 3);
    }

    #[test]
    fn test_read_json_file_reports_path() {
        let path = temp_path("broken.json");
        fs::write(&path, "{ not json").unwrap();
        let err = read_config_file(&path).unwrap_err();
        fs::remove_file(&path).unwrap();

        assert!(err.to_string().contains("config JSON file"), "{err}");
    }

    #[test]
    fn test_write_json_round_trips_through_file() {
        let path = temp_path("written.json");
        let config = GameConfig {
            noise_cells: 7,
            ..GameConfig::default()
        };
        write_json(&config, Some(&path)).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        let back = read_config_file(&path).unwrap();
        fs::remove_file(&path).unwrap();

        assert!(text.ends_with("}\n"));
        assert_eq!(back, config);
    }

    #[test]
    fn test_write_json_reports_uncreatable_path() {
        let path = temp_path("no-such-dir").join("out.json");
        let err = write_json(&GameConfig::default(), Some(&path)).unwrap_err();
        assert!(err.to_string().starts_with("Failed to create output file"), "{err}");
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = read_config_file(temp_path("missing.json")).unwrap_err();
        assert!(err.to_string().starts_with("Failed to open config file"));
    }
}
