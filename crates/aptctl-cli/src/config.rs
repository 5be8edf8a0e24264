use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use aptctl_api::{ClientConfig, Proxy};
use serde::Deserialize;
use tracing::debug;

use crate::{cli::ConnectionArgs, error::ConfigError};

type Result<T> = std::result::Result<T, ConfigError>;

/// Contents of `config.toml`. Every key is optional; command-line flags and
/// environment variables take precedence.
#[derive(Deserialize, Debug, Default, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Aptly server API URL
    pub url: Option<String>,

    /// Skip TLS certificate verification
    pub insecure: Option<bool>,

    pub user: Option<String>,

    pub basic_pass: Option<String>,

    pub timeout_secs: Option<u64>,

    pub proxy: Option<String>,

    pub user_agent: Option<String>,
}

fn home_dir() -> PathBuf {
    env::var_os("HOME")
        .filter(|home| !home.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("/"))
}

fn xdg_config_home() -> PathBuf {
    env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| home_dir().join(".config"))
}

/// Default config location: `$APTCTL_CONFIG`, else
/// `$XDG_CONFIG_HOME/aptctl/config.toml`.
pub fn default_config_path() -> PathBuf {
    match env::var_os("APTCTL_CONFIG") {
        Some(path) if !path.is_empty() => PathBuf::from(path),
        _ => xdg_config_home().join("aptctl").join("config.toml"),
    }
}

impl Config {
    /// Loads the config from `path`, or the default location. A missing file
    /// yields the default config.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path.map_or_else(default_config_path, Path::to_path_buf);

        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!("loaded config from {}", path.display());
                Ok(toml::from_str(&content)?)
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("no config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(err) => {
                Err(ConfigError::Io {
                    path,
                    source: err,
                })
            }
        }
    }

    /// Combines the file settings with `args` into a client configuration.
    pub fn client_config(self, args: &ConnectionArgs) -> Result<ClientConfig> {
        let url = args
            .url
            .clone()
            .or(self.url)
            .filter(|url| !url.is_empty())
            .ok_or(ConfigError::MissingUrl)?;

        let mut config = ClientConfig::new(url).insecure(args.insecure || self.insecure.unwrap_or(false));

        if let Some(user) = args.user.clone().or(self.user) {
            let password = args
                .basic_pass
                .clone()
                .or(self.basic_pass)
                .ok_or(ConfigError::MissingPassword)?;
            config = config.basic_auth(user, password);
        }

        if let Some(secs) = args.timeout.or(self.timeout_secs) {
            config = config.timeout(Duration::from_secs(secs));
        }

        if let Some(url) = args.proxy.clone().or(self.proxy) {
            let proxy = Proxy::new(&url).map_err(|source| {
                ConfigError::InvalidProxy {
                    url,
                    source,
                }
            })?;
            config = config.proxy(proxy);
        }

        if let Some(user_agent) = args.user_agent.clone().or(self.user_agent) {
            config = config.user_agent(user_agent);
        }

        Ok(config)
    }
}
