//! Config command implementation.

use crate::cli::{ConfigAction, ConfigArgs};
use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;

/// Execute the config command.
///
/// `config` is the effective configuration loaded from `path`.
pub fn execute_config(args: ConfigArgs, config: &Config, path: &Path, formatter: &Formatter) -> Result<String> {
    match args.action {
        ConfigAction::Show => config.to_toml(),
        ConfigAction::Path => Ok(path.display().to_string()),
        ConfigAction::Init => {
            if path.exists() {
                return Ok(formatter.info(&format!("Config already exists at {}", path.display())));
            }
            config.save_to(path)?;
            Ok(formatter.success(&format!("Wrote {}", path.display())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::OutputFormat;
    use tempfile::TempDir;

    #[test]
    fn test_init_then_show() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        let formatter = Formatter::new(OutputFormat::Table, false);
        let config = Config::default();

        let init = ConfigArgs { action: ConfigAction::Init };
        let output = execute_config(init, &config, &path, &formatter).unwrap();
        assert!(output.starts_with("✓ Wrote"));
        assert!(path.exists());

        let again = ConfigArgs { action: ConfigAction::Init };
        let output = execute_config(again, &config, &path, &formatter).unwrap();
        assert!(output.contains("already exists"));

        let show = ConfigArgs { action: ConfigAction::Show };
        let output = execute_config(show, &config, &path, &formatter).unwrap();
        assert!(output.contains("[verifier]"));
        assert!(output.contains("min_text_length = 20"));
    }
}
