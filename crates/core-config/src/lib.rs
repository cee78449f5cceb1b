//! Configuration loading and parsing.
//!
//! Parses `ted.toml` (or an override path provided by the binary) into the
//! view settings: word wrap, fling-to-scroll, color theme, text size and the
//! line number gutter toggle. Every field has a default, so a missing file, a
//! parse failure, or a partially filled file all produce usable settings.
//! Unknown fields are ignored so newer files load on older builds.
//!
//! The text size is clamped to `[TEXT_SIZE_MIN, TEXT_SIZE_MAX]` when settings
//! are derived; the raw parsed value is retained in `ConfigFile`.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, io::ErrorKind, path::PathBuf};
use tracing::{info, warn};

pub mod theme;
pub use theme::{ColorTheme, UnknownTheme};

pub const TEXT_SIZE_MIN: f32 = 8.0;
pub const TEXT_SIZE_MAX: f32 = 48.0;

/// Read-only snapshot of the view preferences.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub word_wrap: bool,
    pub fling_to_scroll: bool,
    pub color_theme: ColorTheme,
    pub text_size: f32,
    pub show_line_numbers: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            word_wrap: false,
            fling_to_scroll: true,
            color_theme: ColorTheme::Classic,
            text_size: ViewConfig::default_text_size(),
            show_line_numbers: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct ViewConfig {
    #[serde(default)]
    pub word_wrap: bool,
    #[serde(default = "ViewConfig::default_show_line_numbers")]
    pub show_line_numbers: bool,
    #[serde(default = "ViewConfig::default_text_size")]
    pub text_size: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            word_wrap: false,
            show_line_numbers: Self::default_show_line_numbers(),
            text_size: Self::default_text_size(),
        }
    }
}

impl ViewConfig {
    const fn default_show_line_numbers() -> bool {
        true
    }
    const fn default_text_size() -> f32 {
        12.0
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ThemeConfig {
    #[serde(default)]
    pub color: ColorTheme,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScrollConfig {
    #[serde(default = "ScrollConfig::default_fling")]
    pub fling: bool,
}

impl Default for ScrollConfig {
    fn default() -> Self {
        Self {
            fling: Self::default_fling(),
        }
    }
}

impl ScrollConfig {
    const fn default_fling() -> bool {
        true
    }
}

#[derive(Debug, Deserialize, Default, Clone)]
pub struct ConfigFile {
    #[serde(default)]
    pub view: ViewConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
    #[serde(default)]
    pub scroll: ScrollConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // raw file contents (optional)
    pub file: ConfigFile,    // parsed (or default) data
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from("ted.toml");
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("ted").join("ted.toml");
    }
    PathBuf::from("ted.toml")
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!(target: "config", path = %path.display(), "config_missing_using_defaults");
            return Ok(Config::default());
        }
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_read_failed_using_defaults");
            return Ok(Config::default());
        }
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => Ok(Config {
            raw: Some(content),
            file,
        }),
        Err(e) => {
            warn!(target: "config", path = %path.display(), error = %e, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Derive the settings snapshot, clamping the text size into range.
    pub fn settings(&self) -> Settings {
        let raw = self.file.view.text_size;
        let text_size = if raw.is_finite() {
            raw.clamp(TEXT_SIZE_MIN, TEXT_SIZE_MAX)
        } else {
            ViewConfig::default_text_size()
        };
        if text_size != raw {
            info!(
                target: "config",
                raw,
                clamped = text_size,
                min = TEXT_SIZE_MIN,
                max = TEXT_SIZE_MAX,
                "text_size_clamped"
            );
        }
        Settings {
            word_wrap: self.file.view.word_wrap,
            fling_to_scroll: self.file.scroll.fling,
            color_theme: self.file.theme.color,
            text_size,
            show_line_numbers: self.file.view.show_line_numbers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.guard.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl<'a> MakeWriter<'a> for BufferWriter {
        type Writer = LockedWriter<'a>;

        fn make_writer(&'a self) -> Self::Writer {
            LockedWriter {
                guard: self.inner.lock().expect("log buffer poisoned"),
            }
        }
    }

    fn capture_logs(f: impl FnOnce()) -> String {
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();
        with_default(subscriber, f);
        String::from_utf8(buffer.lock().unwrap().clone()).unwrap()
    }

    fn load_str(content: &str) -> Config {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), content).unwrap();
        load_from(Some(tmp.path().to_path_buf())).unwrap()
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert!(cfg.raw.is_none());
        assert_eq!(cfg.settings(), Settings::default());
    }

    #[test]
    fn missing_file_logged_at_info() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ted.toml");
        let log_output = capture_logs(|| {
            load_from(Some(path)).unwrap();
        });
        assert!(log_output.contains("INFO config:"));
        assert!(log_output.contains("config_missing_using_defaults"));
    }

    #[test]
    fn unreadable_file_warns_with_error() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), [0xff, 0xfe, 0x00, b'\n']).unwrap();
        let mut cfg = None;
        let log_output = capture_logs(|| {
            cfg = Some(load_from(Some(tmp.path().to_path_buf())).unwrap());
        });
        let cfg = cfg.unwrap();
        assert!(cfg.raw.is_none());
        assert_eq!(cfg.settings(), Settings::default());
        assert!(log_output.contains("WARN config:"));
        assert!(log_output.contains("config_read_failed_using_defaults"));
        assert!(log_output.contains("error="));
        assert!(!log_output.contains("config_missing_using_defaults"));
    }

    #[test]
    fn defaults_match_documented_values() {
        let s = Settings::default();
        assert!(!s.word_wrap);
        assert!(s.fling_to_scroll);
        assert!(s.show_line_numbers);
        assert_eq!(s.color_theme, ColorTheme::Classic);
        assert_eq!(s.text_size, 12.0);
    }

    #[test]
    fn parses_all_sections() {
        let cfg = load_str(
            "[view]\nword_wrap = true\nshow_line_numbers = false\ntext_size = 16.0\n\
             [theme]\ncolor = \"dracula\"\n[scroll]\nfling = false\n",
        );
        let s = cfg.settings();
        assert!(s.word_wrap);
        assert!(!s.show_line_numbers);
        assert_eq!(s.text_size, 16.0);
        assert_eq!(s.color_theme, ColorTheme::Dracula);
        assert!(!s.fling_to_scroll);
        assert!(cfg.raw.is_some());
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let s = load_str("[theme]\ncolor = \"sky\"\n").settings();
        assert_eq!(s.color_theme, ColorTheme::Sky);
        assert!(s.show_line_numbers);
        assert!(s.fling_to_scroll);
    }

    #[test]
    fn unknown_theme_falls_back_to_classic() {
        let s = load_str("[theme]\ncolor = \"solarized\"\n").settings();
        assert_eq!(s.color_theme, ColorTheme::Classic);
    }

    #[test]
    fn parse_error_uses_defaults() {
        let cfg = load_str("[view\nword_wrap = ");
        assert!(cfg.raw.is_none());
        assert_eq!(cfg.settings(), Settings::default());
    }

    #[test]
    fn text_size_clamped_and_logged() {
        let cfg = load_str("[view]\ntext_size = 200.0\n");
        let mut settings = Settings::default();
        let log_output = capture_logs(|| settings = cfg.settings());
        assert_eq!(settings.text_size, TEXT_SIZE_MAX);
        assert_eq!(cfg.file.view.text_size, 200.0);
        assert!(log_output.contains("INFO config:"));
        assert!(log_output.contains("text_size_clamped"));
    }

    #[test]
    fn small_text_size_clamped_up() {
        let s = load_str("[view]\ntext_size = 2.0\n").settings();
        assert_eq!(s.text_size, TEXT_SIZE_MIN);
    }
}
