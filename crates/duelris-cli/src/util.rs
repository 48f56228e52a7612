use std::{
    fs::File,
    io::{self, BufReader, BufWriter, Write},
    path::Path,
};

use anyhow::Context;
use duelris_battle::BattleConfig;

/// Write `value` as pretty JSON to `path`, or to stdout when absent
pub fn save_json<T>(value: &T, path: Option<&Path>) -> anyhow::Result<()>
where
    T: serde::Serialize,
{
    match path {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create output file: {}", path.display()))?;
            write_json(BufWriter::new(file), value)
                .with_context(|| format!("Failed to write JSON to {}", path.display()))
        }
        None => write_json(io::stdout().lock(), value).context("Failed to write JSON to stdout"),
    }
}

fn write_json<W, T>(mut writer: W, value: &T) -> anyhow::Result<()>
where
    W: Write,
    T: serde::Serialize,
{
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Read a battle configuration from a JSON file
///
/// Fields missing from the file keep their default values.
pub fn read_battle_config_file<P>(path: P) -> anyhow::Result<BattleConfig>
where
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::open(path)
        .with_context(|| format!("Failed to open battle config file: {}", path.display()))?;
    serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse battle config file: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use duelris_engine::GameMode;

    use super::*;

    #[test]
    fn test_write_json_ends_with_newline() {
        let mut buf = Vec::new();
        write_json(&mut buf, &BattleConfig::new(GameMode::Item)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.ends_with("}\n"));
        assert!(text.contains(r#""mode": "item""#));
    }

    #[test]
    fn test_config_file_roundtrip() {
        let path = std::env::temp_dir().join(format!("duelris-config-{}.json", std::process::id()));
        let config = BattleConfig::new(GameMode::TimeLimit);
        save_json(&config, Some(&path)).unwrap();
        let loaded = read_battle_config_file(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_missing_config_file_names_path() {
        let err = read_battle_config_file("/nonexistent/duelris.json").unwrap_err();
        assert!(err.to_string().contains("/nonexistent/duelris.json"));
    }
}
