use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::context::ContextOptions;
use crate::ui::anchor::{DEFAULT_MARGIN, PanelSize};

/// Panel size used when none is configured, in CSS pixels.
pub const DEFAULT_PANEL: (u32, u32) = (160, 120);

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub word_threshold: Option<usize>,
    pub max_context: Option<usize>,
    pub margin: Option<u32>,
    pub panel: Option<(u32, u32)>,
    pub json: bool,
    pub perf: bool,
    pub debug_log: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            word_threshold: other.word_threshold.or(self.word_threshold),
            max_context: other.max_context.or(self.max_context),
            margin: other.margin.or(self.margin),
            panel: other.panel.or(self.panel),
            json: self.json || other.json,
            perf: self.perf || other.perf,
            debug_log: other.debug_log.clone().or_else(|| self.debug_log.clone()),
        }
    }

    pub fn context_options(&self) -> ContextOptions {
        let defaults = ContextOptions::default();
        ContextOptions {
            word_threshold: self.word_threshold.unwrap_or(defaults.word_threshold),
            max_length: self.max_context.unwrap_or(defaults.max_length),
        }
    }

    pub fn anchor_margin(&self) -> f64 {
        self.margin.map_or(DEFAULT_MARGIN, f64::from)
    }

    pub fn panel_size(&self) -> PanelSize {
        let (width, height) = self.panel.unwrap_or(DEFAULT_PANEL);
        PanelSize::new(f64::from(width), f64::from(height))
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("snapcard").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("snapcard")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("snapcard").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("snapcard")
                .join("config");
        }
    }

    PathBuf::from(".snapcardrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".snapcardrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# snapcard defaults (saved with --save)".to_string());
    if let Some(threshold) = flags.word_threshold {
        lines.push(format!("--word-threshold {threshold}"));
    }
    if let Some(max) = flags.max_context {
        lines.push(format!("--max-context {max}"));
    }
    if let Some(margin) = flags.margin {
        lines.push(format!("--margin {margin}"));
    }
    if let Some((width, height)) = flags.panel {
        lines.push(format!("--panel {width}x{height}"));
    }
    if flags.json {
        lines.push("--json".to_string());
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(path) = &flags.debug_log {
        lines.push(format!("--debug-log {}", path.display()));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pull the flags this module knows about out of a raw argument list.
///
/// Unknown tokens (the file name, engine-only arguments) are skipped, and so
/// are values that fail to parse.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) if name.starts_with("--") => (name, Some(value)),
            _ => (token, None),
        };
        let takes_value = matches!(
            name,
            "--word-threshold" | "--max-context" | "--margin" | "--panel" | "--debug-log"
        );
        let value = if takes_value && inline_value.is_none() {
            i += 1;
            tokens.get(i).map(String::as_str)
        } else {
            inline_value
        };

        match (name, value) {
            ("--json", _) => flags.json = true,
            ("--perf", _) => flags.perf = true,
            ("--word-threshold", Some(value)) => {
                flags.word_threshold = value.parse().ok().or(flags.word_threshold);
            }
            ("--max-context", Some(value)) => {
                flags.max_context = value.parse().ok().or(flags.max_context);
            }
            ("--margin", Some(value)) => flags.margin = value.parse().ok().or(flags.margin),
            ("--panel", Some(value)) => flags.panel = parse_size(value).or(flags.panel),
            ("--debug-log", Some(value)) => flags.debug_log = Some(PathBuf::from(value)),
            _ => {}
        }
        i += 1;
    }
    flags
}

/// Parse `WIDTHxHEIGHT`.
pub fn parse_size(s: &str) -> Option<(u32, u32)> {
    let (width, height) = s.split_once(['x', 'X'])?;
    Some((width.trim().parse().ok()?, height.trim().parse().ok()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let flags = parse_flag_tokens(&args(&[
            "snapcard",
            "--word-threshold",
            "3",
            "--max-context=400",
            "--panel",
            "320x200",
            "--margin=12",
            "--json",
            "--debug-log=events.log",
            "article.md",
        ]));
        assert_eq!(flags.word_threshold, Some(3));
        assert_eq!(flags.max_context, Some(400));
        assert_eq!(flags.panel, Some((320, 200)));
        assert_eq!(flags.margin, Some(12));
        assert!(flags.json);
        assert_eq!(flags.debug_log, Some(PathBuf::from("events.log")));
    }

    #[test]
    fn test_parse_flag_tokens_skips_unparseable_values() {
        let flags = parse_flag_tokens(&args(&["--max-context", "lots", "--panel", "wide"]));
        assert_eq!(flags.max_context, None);
        assert_eq!(flags.panel, None);
    }

    #[test]
    fn test_config_union_prefers_cli_values() {
        let file = ConfigFlags {
            perf: true,
            max_context: Some(500),
            word_threshold: Some(4),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            json: true,
            max_context: Some(300),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.perf);
        assert!(merged.json);
        assert_eq!(merged.max_context, Some(300));
        assert_eq!(merged.word_threshold, Some(4));
    }

    #[test]
    fn test_defaults_feed_engine_constants() {
        let flags = ConfigFlags::default();
        assert_eq!(flags.context_options(), ContextOptions::default());
        assert_eq!(flags.anchor_margin(), DEFAULT_MARGIN);
        assert_eq!(flags.panel_size(), PanelSize::new(160.0, 120.0));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".snapcardrc");
        let flags = ConfigFlags {
            word_threshold: Some(7),
            max_context: Some(450),
            margin: Some(8),
            panel: Some((300, 180)),
            json: true,
            perf: true,
            debug_log: Some(PathBuf::from("events.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_parse_size_accepts_upper_case_separator() {
        assert_eq!(parse_size("640X480"), Some((640, 480)));
        assert_eq!(parse_size("640"), None);
    }
}
