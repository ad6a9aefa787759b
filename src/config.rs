//! Site metadata ([`SiteConfig`]) and the project layout for a run
//! ([`Config`]).

use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};

const DEFAULT_TITLE: &str = "My Blog";
const DEFAULT_URL: &str = "https://example.com";

/// The name of the site configuration file at the project root.
pub const SITE_FILE: &str = "site.yml";

/// Site-wide metadata available to every page and to the feed. Loaded once
/// per run and passed around by reference; nothing reads it from ambient
/// state.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct SiteConfig {
    #[serde(default)]
    pub title: String,

    /// The canonical base URL. Post links in the feed are this string
    /// followed by the post path, so it shouldn't end with `/`.
    #[serde(default)]
    pub url: String,

    #[serde(default)]
    pub description: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        SiteConfig {
            title: String::new(),
            url: String::new(),
            description: String::new(),
        }
        .with_defaults()
    }
}

impl SiteConfig {
    /// Replaces an empty title or URL with its default.
    fn with_defaults(mut self) -> Self {
        if self.title.is_empty() {
            self.title = DEFAULT_TITLE.to_owned();
        }
        if self.url.is_empty() {
            self.url = DEFAULT_URL.to_owned();
        }
        self
    }

    /// Parses site configuration from YAML text. An empty document yields
    /// the defaults.
    pub fn from_yaml(input: &str) -> std::result::Result<SiteConfig, serde_yaml::Error> {
        if input.trim().is_empty() {
            return Ok(SiteConfig::default());
        }
        let site: Option<SiteConfig> = serde_yaml::from_str(input)?;
        Ok(site.map(SiteConfig::with_defaults).unwrap_or_default())
    }

    /// Loads `path`, falling back to the defaults if the file doesn't exist.
    pub fn from_file(path: &Path) -> Result<SiteConfig> {
        match std::fs::read_to_string(path) {
            Ok(contents) => SiteConfig::from_yaml(&contents).map_err(|err| Error::Parse {
                path: path.to_owned(),
                err,
            }),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                log::debug!("no {} found; using default site configuration", path.display());
                Ok(SiteConfig::default())
            }
            Err(err) => Err(Error::Read {
                path: path.to_owned(),
                err,
            }),
        }
    }
}

/// The layout of one project and the knobs for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Site metadata loaded from `site.yml`.
    pub site: SiteConfig,

    /// The project root. `site.yml` lives here.
    pub root_directory: PathBuf,

    /// The directory scanned for `*.md` content files.
    pub content_directory: PathBuf,

    /// The project's own templates. Files here take precedence over the
    /// defaults directory's.
    pub templates_directory: PathBuf,

    /// The project's own static assets, copied after (and so over) the
    /// defaults directory's.
    pub static_directory: PathBuf,

    /// The directory the site is generated into. Its contents are deleted at
    /// the start of every run.
    pub output_directory: PathBuf,

    /// The built-in theme, holding `templates/` and `static/` directories.
    pub defaults_directory: Option<PathBuf>,

    /// The number of posts listed on the home page.
    pub home_page_size: usize,

    /// The number of posts included in the feed.
    pub feed_size: usize,
}

impl Config {
    /// Builds the configuration for the project at `root`. The output
    /// directory defaults to `{root}/docs`.
    pub fn from_directory(
        root: &Path,
        output_directory: Option<&Path>,
        defaults_directory: Option<&Path>,
    ) -> Result<Config> {
        Ok(Config {
            site: SiteConfig::from_file(&root.join(SITE_FILE))?,
            root_directory: root.to_owned(),
            content_directory: root.join("posts"),
            templates_directory: root.join("templates"),
            static_directory: root.join("static"),
            output_directory: match output_directory {
                Some(dir) => dir.to_owned(),
                None => root.join("docs"),
            },
            defaults_directory: defaults_directory.map(Path::to_owned),
            home_page_size: 5,
            feed_size: 20,
        })
    }

    /// Resolves a path relative to the templates directory, preferring the
    /// project's copy and falling back to the defaults directory. Returns the
    /// project path if neither exists so the caller reports a sensible
    /// location.
    pub fn resolve_template(&self, name: &str) -> PathBuf {
        let local = self.templates_directory.join(name);
        if local.exists() {
            return local;
        }
        if let Some(defaults) = &self.defaults_directory {
            let candidate = defaults.join("templates").join(name);
            if candidate.exists() {
                return candidate;
            }
        }
        local
    }

    /// The asset directories to mirror into the output root, lowest
    /// precedence first.
    pub fn static_sources(&self) -> Vec<PathBuf> {
        let mut sources = Vec::with_capacity(2);
        if let Some(defaults) = &self.defaults_directory {
            sources.push(defaults.join("static"));
        }
        sources.push(self.static_directory.clone());
        sources
    }
}

/// Represents the result of loading configuration.
pub type Result<T> = std::result::Result<T, Error>;

/// Represents a problem loading the site configuration.
#[derive(Debug)]
pub enum Error {
    /// Returned when `site.yml` exists but can't be read.
    Read { path: PathBuf, err: std::io::Error },

    /// Returned when `site.yml` isn't valid YAML of the expected shape.
    Parse {
        path: PathBuf,
        err: serde_yaml::Error,
    },
}

impl fmt::Display for Error {
    /// Displays an [`Error`] as human-readable text.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Read { path, err } => {
                write!(f, "reading `{}`: {}", path.display(), err)
            }
            Error::Parse { path, err } => {
                write!(f, "parsing `{}`: {}", path.display(), err)
            }
        }
    }
}

impl std::error::Error for Error {
    /// Implements the [`std::error::Error`] trait for [`Error`].
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read { path: _, err } => Some(err),
            Error::Parse { path: _, err } => Some(err),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::fs;

    #[test]
    fn test_site_config_from_yaml() {
        let site = SiteConfig::from_yaml(
            "title: Notes\nurl: https://notes.example.org\ndescription: Things\n",
        )
        .unwrap();
        assert_eq!(
            site,
            SiteConfig {
                title: "Notes".to_owned(),
                url: "https://notes.example.org".to_owned(),
                description: "Things".to_owned(),
            }
        );
    }

    #[test]
    fn test_site_config_defaults() {
        let site = SiteConfig::from_yaml("description: Only this\n").unwrap();
        assert_eq!(site.title, "My Blog");
        assert_eq!(site.url, "https://example.com");
        assert_eq!(site.description, "Only this");

        assert_eq!(SiteConfig::from_yaml("").unwrap(), SiteConfig::default());
        assert_eq!(SiteConfig::from_yaml("~\n").unwrap(), SiteConfig::default());
    }

    #[test]
    fn test_site_config_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let site = SiteConfig::from_file(&dir.path().join(SITE_FILE)).unwrap();
        assert_eq!(site, SiteConfig::default());
    }

    #[test]
    fn test_site_config_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SITE_FILE);
        fs::write(&path, "title: [oops\n").unwrap();
        match SiteConfig::from_file(&path) {
            Err(Error::Parse { path: p, .. }) => assert_eq!(p, path),
            other => panic!("expected a parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_config_layout() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_directory(dir.path(), None, None).unwrap();
        assert_eq!(config.content_directory, dir.path().join("posts"));
        assert_eq!(config.output_directory, dir.path().join("docs"));
        assert_eq!(config.home_page_size, 5);
        assert_eq!(config.feed_size, 20);
        assert_eq!(config.static_sources(), vec![dir.path().join("static")]);
    }

    #[test]
    fn test_resolve_template_prefers_local() {
        let root = tempfile::tempdir().unwrap();
        let defaults = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("templates")).unwrap();
        fs::create_dir_all(defaults.path().join("templates")).unwrap();
        fs::write(root.path().join("templates/home.html"), "local").unwrap();
        fs::write(defaults.path().join("templates/home.html"), "default").unwrap();
        fs::write(defaults.path().join("templates/post.html"), "default").unwrap();

        let config = Config::from_directory(root.path(), None, Some(defaults.path())).unwrap();
        assert_eq!(
            config.resolve_template("home.html"),
            root.path().join("templates/home.html")
        );
        assert_eq!(
            config.resolve_template("post.html"),
            defaults.path().join("templates/post.html")
        );
        assert_eq!(
            config.resolve_template("archive.html"),
            root.path().join("templates/archive.html")
        );
        assert_eq!(
            config.static_sources(),
            vec![defaults.path().join("static"), root.path().join("static")]
        );
    }
}
