use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

/// Preset grammar surface. Each flavor enables a different set of
/// extensions by default.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Flavor {
    /// Everything on: outline sections, options blocks, heading continuation
    #[default]
    Markline,
    /// Closer to plain CommonMark: flat headings, no options or strikeout
    CommonMark,
}

/// Grammar toggles.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Extensions {
    /// Wrap headings in outline sections sized to their level
    pub sections: bool,
    /// Headings ending in two spaces continue on the next line
    pub heading_continuation: bool,
    /// `{default; key=value}` metadata on paragraphs and headings
    pub options_blocks: bool,
    pub fenced_code_blocks: bool,
    pub code_spans: bool,
    pub inline_links: bool,
    /// `~~text~~`
    pub strikeout: bool,
}

impl Default for Extensions {
    fn default() -> Self {
        Self::for_flavor(Flavor::default())
    }
}

impl Extensions {
    /// Get the default extension set for a given flavor.
    pub fn for_flavor(flavor: Flavor) -> Self {
        match flavor {
            Flavor::Markline => Self {
                sections: true,
                heading_continuation: true,
                options_blocks: true,
                fenced_code_blocks: true,
                code_spans: true,
                inline_links: true,
                strikeout: true,
            },
            Flavor::CommonMark => Self {
                sections: false,
                heading_continuation: false,
                options_blocks: false,
                fenced_code_blocks: true,
                code_spans: true,
                inline_links: true,
                strikeout: false,
            },
        }
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub flavor: Flavor,
    pub extensions: Extensions,
    /// When off, every edit falls back to a full reparse
    pub incremental_updates: bool,
    /// Nesting bound for emphasis and links inside each other
    pub max_inline_depth: usize,
}

impl Default for Config {
    fn default() -> Self {
        let flavor = Flavor::default();
        Self {
            flavor,
            extensions: Extensions::for_flavor(flavor),
            incremental_updates: true,
            max_inline_depth: 16,
        }
    }
}

#[derive(Default, Clone)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Switches flavor and resets extensions to that flavor's defaults.
    pub fn flavor(mut self, flavor: Flavor) -> Self {
        self.config.flavor = flavor;
        self.config.extensions = Extensions::for_flavor(flavor);
        self
    }

    pub fn sections(mut self, enabled: bool) -> Self {
        self.config.extensions.sections = enabled;
        self
    }

    pub fn heading_continuation(mut self, enabled: bool) -> Self {
        self.config.extensions.heading_continuation = enabled;
        self
    }

    pub fn options_blocks(mut self, enabled: bool) -> Self {
        self.config.extensions.options_blocks = enabled;
        self
    }

    pub fn fenced_code_blocks(mut self, enabled: bool) -> Self {
        self.config.extensions.fenced_code_blocks = enabled;
        self
    }

    pub fn code_spans(mut self, enabled: bool) -> Self {
        self.config.extensions.code_spans = enabled;
        self
    }

    pub fn inline_links(mut self, enabled: bool) -> Self {
        self.config.extensions.inline_links = enabled;
        self
    }

    pub fn strikeout(mut self, enabled: bool) -> Self {
        self.config.extensions.strikeout = enabled;
        self
    }

    pub fn incremental_updates(mut self, enabled: bool) -> Self {
        self.config.incremental_updates = enabled;
        self
    }

    pub fn max_inline_depth(mut self, depth: usize) -> Self {
        self.config.max_inline_depth = depth;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}

const CANDIDATE_NAMES: &[&str] = &[".markline.toml", "markline.toml"];

fn parse_config_str(s: &str, path: &Path) -> io::Result<Config> {
    let raw = toml::from_str::<toml::Table>(s).map_err(|e| invalid(path, e))?;
    let mut config = toml::from_str::<Config>(s).map_err(|e| invalid(path, e))?;
    // A flavor without an explicit [extensions] table brings its own defaults
    if !raw.contains_key("extensions") {
        config.extensions = Extensions::for_flavor(config.flavor);
    }
    Ok(config)
}

fn invalid(path: &Path, e: toml::de::Error) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidData,
        format!("invalid config {}: {e}", path.display()),
    )
}

fn read_config(path: &Path) -> io::Result<Config> {
    log::debug!("Reading config from: {}", path.display());
    let s = fs::read_to_string(path)?;
    let config = parse_config_str(&s, path)?;
    log::info!("Loaded config from: {}", path.display());
    Ok(config)
}

fn find_in_tree(start_dir: &Path) -> Option<PathBuf> {
    for dir in start_dir.ancestors() {
        for name in CANDIDATE_NAMES {
            let p = dir.join(name);
            if p.is_file() {
                return Some(p);
            }
        }
    }
    None
}

fn xdg_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let p = Path::new(&xdg).join("markline").join("config.toml");
        if p.is_file() {
            return Some(p);
        }
    }
    if let Ok(home) = env::var("HOME") {
        let p = Path::new(&home)
            .join(".config")
            .join("markline")
            .join("config.toml");
        if p.is_file() {
            return Some(p);
        }
    }
    None
}

/// Load configuration with precedence:
/// 1) explicit path (error if unreadable/invalid)
/// 2) walk up from start_dir: .markline.toml, markline.toml
/// 3) XDG: $XDG_CONFIG_HOME/markline/config.toml or ~/.config/markline/config.toml
/// 4) default config
pub fn load(explicit: Option<&Path>, start_dir: &Path) -> io::Result<(Config, Option<PathBuf>)> {
    if let Some(path) = explicit {
        let cfg = read_config(path)?;
        return Ok((cfg, Some(path.to_path_buf())));
    }

    if let Some(p) = find_in_tree(start_dir)
        && let Ok(cfg) = read_config(&p)
    {
        return Ok((cfg, Some(p)));
    }

    if let Some(p) = xdg_config_path()
        && let Ok(cfg) = read_config(&p)
    {
        return Ok((cfg, Some(p)));
    }

    log::debug!("No config file found, using defaults");
    Ok((Config::default(), None))
}
