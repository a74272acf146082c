//! Build configuration.
//!
//! Two layers of configuration feed a build:
//!
//! - [`BuildConfig`]: where to read from and write to. Resolved once from the
//!   command line (source root, output directory, cache directory, base path)
//!   and read-only for the rest of the build.
//! - [`SiteConfig`]: project settings loaded from an optional `config.toml`
//!   in the source root. Directory names, CSS thresholds, minification and
//!   parallelism live here.
//!
//! ## Config File Location
//!
//! ```text
//! src/
//! ├── config.toml              # Site settings (optional)
//! ├── above-the-fold.html      # Critical-candidate probe (optional)
//! ├── pages/
//! ├── templates/
//! └── candidates/
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [paths]
//! pages = "pages"                      # Page files, mirrored into the output
//! templates = "templates"              # Component templates
//! candidates = "candidates"            # <layer>/<name>/{critical,non-critical}.css
//! above_the_fold = "above-the-fold.html"
//!
//! [css]
//! minify = true                        # Minify generated stylesheets
//! notice_bytes = 2048                  # Log an info line above this critical size
//! warn_bytes = 4096                    # Log a warning above this critical size
//!
//! [processing]
//! max_processes = 4                    # Max parallel page workers (omit for auto)
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
    #[error("Source root does not exist: {}", .0.display())]
    SourceRootMissing(PathBuf),
}

// =============================================================================
// Build inputs
// =============================================================================

/// Paths and URL prefix for one build. Read-only once resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildConfig {
    pub src_root: PathBuf,
    pub out_dir: PathBuf,
    pub cache_dir: PathBuf,
    /// URL path prefix for links to generated assets, e.g. `/my-blog`.
    pub base_path: String,
}

/// Unresolved build inputs as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    pub src_root: Option<PathBuf>,
    pub out_dir: Option<PathBuf>,
    pub cache_dir: Option<PathBuf>,
    pub base_path: Option<String>,
}

impl BuildConfig {
    /// Resolve options against `cwd`, applying defaults.
    ///
    /// Defaults: `src`, `dist`, `.dinomlx/cache`, empty base path. The source
    /// root must exist.
    pub fn resolve(cwd: &Path, options: BuildOptions) -> Result<Self, ConfigError> {
        let src_root = cwd.join(options.src_root.unwrap_or_else(|| PathBuf::from("src")));
        let out_dir = cwd.join(options.out_dir.unwrap_or_else(|| PathBuf::from("dist")));
        let cache_dir = cwd.join(
            options
                .cache_dir
                .unwrap_or_else(|| PathBuf::from(".dinomlx/cache")),
        );
        let base_path = options.base_path.unwrap_or_default();

        if !src_root.exists() {
            return Err(ConfigError::SourceRootMissing(src_root));
        }

        Ok(Self {
            src_root,
            out_dir,
            cache_dir,
            base_path,
        })
    }
}

// =============================================================================
// Site settings
// =============================================================================

/// Site settings loaded from `config.toml`.
///
/// All fields have defaults; a config file only needs the values it changes.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Source directory layout.
    pub paths: PathsConfig,
    /// Generated CSS settings.
    pub css: CssConfig,
    /// Parallel processing settings.
    pub processing: ProcessingConfig,
}

impl SiteConfig {
    /// Validate config values are within acceptable ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let paths = [
            ("paths.pages", &self.paths.pages),
            ("paths.templates", &self.paths.templates),
            ("paths.candidates", &self.paths.candidates),
            ("paths.above_the_fold", &self.paths.above_the_fold),
        ];
        for (key, value) in paths {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.css.notice_bytes > self.css.warn_bytes {
            return Err(ConfigError::Validation(
                "css.notice_bytes must not exceed css.warn_bytes".into(),
            ));
        }
        Ok(())
    }

    pub fn pages_dir(&self, src_root: &Path) -> PathBuf {
        src_root.join(&self.paths.pages)
    }

    pub fn templates_dir(&self, src_root: &Path) -> PathBuf {
        src_root.join(&self.paths.templates)
    }

    pub fn candidates_dir(&self, src_root: &Path) -> PathBuf {
        src_root.join(&self.paths.candidates)
    }

    pub fn above_the_fold_path(&self, src_root: &Path) -> PathBuf {
        src_root.join(&self.paths.above_the_fold)
    }
}

/// Source directory layout, relative to the source root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub pages: String,
    pub templates: String,
    pub candidates: String,
    /// Probe document whose candidates are inlined as critical CSS.
    pub above_the_fold: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            pages: "pages".to_string(),
            templates: "templates".to_string(),
            candidates: "candidates".to_string(),
            above_the_fold: "above-the-fold.html".to_string(),
        }
    }
}

/// Generated CSS settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CssConfig {
    /// Pass generated stylesheets through the minifier.
    pub minify: bool,
    /// Critical CSS size (bytes) above which an info line is logged.
    pub notice_bytes: usize,
    /// Critical CSS size (bytes) above which a warning is logged.
    pub warn_bytes: usize,
}

impl Default for CssConfig {
    fn default() -> Self {
        Self {
            minify: true,
            notice_bytes: 2048,
            warn_bytes: 4096,
        }
    }
}

/// Parallel processing settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProcessingConfig {
    /// Maximum number of parallel page workers.
    /// When absent, defaults to the number of CPU cores.
    /// Values larger than the core count are clamped down.
    pub max_processes: Option<usize>,
}

/// Resolve the effective thread count from config.
///
/// - `None` → use all available cores
/// - `Some(n)` → use `min(n, cores)`, never less than one
pub fn effective_threads(config: &ProcessingConfig) -> usize {
    let cores = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    config
        .max_processes
        .map(|n| n.clamp(1, cores))
        .unwrap_or(cores)
}

/// Load `config.toml` from the source root.
///
/// Returns defaults if the file doesn't exist. Unknown keys and invalid
/// values are errors.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let config_path = root.join("config.toml");
    if !config_path.exists() {
        return Ok(SiteConfig::default());
    }
    let content = fs::read_to_string(&config_path)?;
    let config: SiteConfig = toml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Returns a fully-commented stock `config.toml` with all keys and explanations.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# dinomlx configuration
# =====================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Source layout (relative to the source root)
# ---------------------------------------------------------------------------
[paths]
# Page files. Every *.html file here becomes one output page.
pages = "pages"

# Component templates. <c-ui-cards-hero> resolves to templates/ui/cards/hero.html.
templates = "templates"

# Candidates: candidates/<layer>/<name>/critical.css and/or non-critical.css,
# where <layer> is one of global, layout, components, utils.
candidates = "candidates"

# Probe document. Candidates used here are inlined as critical CSS on every
# page; everything else goes to the external stylesheet.
above_the_fold = "above-the-fold.html"

# ---------------------------------------------------------------------------
# Generated CSS
# ---------------------------------------------------------------------------
[css]
# Minify generated stylesheets.
minify = true

# Log an info line when a page's inline critical CSS exceeds this many bytes.
notice_bytes = 2048

# Log a warning when a page's inline critical CSS exceeds this many bytes.
warn_bytes = 4096

# ---------------------------------------------------------------------------
# Processing
# ---------------------------------------------------------------------------
[processing]
# Maximum parallel page workers.
# Omit or comment out to auto-detect (= number of CPU cores).
# max_processes = 4
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_paths() {
        let config = SiteConfig::default();
        assert_eq!(config.paths.pages, "pages");
        assert_eq!(config.paths.templates, "templates");
        assert_eq!(config.paths.candidates, "candidates");
        assert_eq!(config.paths.above_the_fold, "above-the-fold.html");
    }

    #[test]
    fn default_css_thresholds() {
        let config = SiteConfig::default();
        assert!(config.css.minify);
        assert_eq!(config.css.notice_bytes, 2048);
        assert_eq!(config.css.warn_bytes, 4096);
    }

    #[test]
    fn parse_partial_config() {
        let toml = r#"
[css]
minify = false
"#;
        let config: SiteConfig = toml::from_str(toml).unwrap();
        assert!(!config.css.minify);
        // Unspecified values keep their defaults
        assert_eq!(config.css.warn_bytes, 4096);
        assert_eq!(config.paths.pages, "pages");
    }

    #[test]
    fn unknown_key_rejected() {
        let toml = r#"
[css]
minfy = false
"#;
        let result: Result<SiteConfig, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn unknown_section_rejected() {
        let result: Result<SiteConfig, _> = toml::from_str("[theme]\ncolor = \"red\"\n");
        assert!(result.is_err());
    }

    #[test]
    fn validate_rejects_inverted_thresholds() {
        let mut config = SiteConfig::default();
        config.css.notice_bytes = 5000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn validate_rejects_empty_path() {
        let mut config = SiteConfig::default();
        config.paths.templates = "  ".to_string();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("paths.templates"));
    }

    #[test]
    fn validate_default_config_passes() {
        assert!(SiteConfig::default().validate().is_ok());
    }

    #[test]
    fn stock_config_parses_to_defaults() {
        let config: SiteConfig = toml::from_str(stock_config_toml()).unwrap();
        assert_eq!(config.paths.pages, "pages");
        assert!(config.css.minify);
        assert_eq!(config.processing.max_processes, None);
    }

    #[test]
    fn directories_resolve_under_source_root() {
        let config = SiteConfig::default();
        let root = Path::new("/site/src");
        assert_eq!(config.pages_dir(root), Path::new("/site/src/pages"));
        assert_eq!(config.templates_dir(root), Path::new("/site/src/templates"));
        assert_eq!(config.candidates_dir(root), Path::new("/site/src/candidates"));
        assert_eq!(
            config.above_the_fold_path(root),
            Path::new("/site/src/above-the-fold.html")
        );
    }

    // =========================================================================
    // effective_threads
    // =========================================================================

    #[test]
    fn effective_threads_auto() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        assert_eq!(effective_threads(&ProcessingConfig::default()), cores);
    }

    #[test]
    fn effective_threads_clamped_to_cores() {
        let cores = std::thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        let config = ProcessingConfig {
            max_processes: Some(cores + 64),
        };
        assert_eq!(effective_threads(&config), cores);
    }

    #[test]
    fn effective_threads_never_zero() {
        let config = ProcessingConfig {
            max_processes: Some(0),
        };
        assert_eq!(effective_threads(&config), 1);
    }

    // =========================================================================
    // load_config
    // =========================================================================

    #[test]
    fn load_config_returns_default_when_no_file() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.paths.pages, "pages");
    }

    #[test]
    fn load_config_reads_file() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[paths]\npages = \"content\"\n\n[processing]\nmax_processes = 2\n",
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.paths.pages, "content");
        assert_eq!(config.processing.max_processes, Some(2));
        assert_eq!(config.paths.templates, "templates");
    }

    #[test]
    fn load_config_invalid_toml_is_error() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("config.toml"), "[css\nminify = ").unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn load_config_validates_values() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join("config.toml"),
            "[css]\nnotice_bytes = 9000\nwarn_bytes = 10\n",
        )
        .unwrap();
        assert!(matches!(
            load_config(tmp.path()),
            Err(ConfigError::Validation(_))
        ));
    }

    // =========================================================================
    // BuildConfig::resolve
    // =========================================================================

    #[test]
    fn resolve_applies_defaults() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("src")).unwrap();

        let config = BuildConfig::resolve(tmp.path(), BuildOptions::default()).unwrap();
        assert_eq!(config.src_root, tmp.path().join("src"));
        assert_eq!(config.out_dir, tmp.path().join("dist"));
        assert_eq!(config.cache_dir, tmp.path().join(".dinomlx/cache"));
        assert_eq!(config.base_path, "");
    }

    #[test]
    fn resolve_uses_given_options() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("site")).unwrap();

        let options = BuildOptions {
            src_root: Some(PathBuf::from("site")),
            out_dir: Some(PathBuf::from("public")),
            cache_dir: None,
            base_path: Some("/blog".to_string()),
        };
        let config = BuildConfig::resolve(tmp.path(), options).unwrap();
        assert_eq!(config.src_root, tmp.path().join("site"));
        assert_eq!(config.out_dir, tmp.path().join("public"));
        assert_eq!(config.base_path, "/blog");
    }

    #[test]
    fn resolve_missing_source_root_is_error() {
        let tmp = TempDir::new().unwrap();
        let err = BuildConfig::resolve(tmp.path(), BuildOptions::default()).unwrap_err();
        assert!(matches!(err, ConfigError::SourceRootMissing(_)));
        assert!(err.to_string().contains("Source root does not exist"));
    }
}
