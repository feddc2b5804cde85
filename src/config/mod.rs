pub mod model;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};

pub use model::AppConfig;

/// Command-line flags. Anything given here overrides the config file.
#[derive(Debug, Parser)]
#[command(name = "ircline", version, about = "Connect to an IRC server.")]
pub struct Cli {
    /// IRC server address
    #[arg(long)]
    pub server: Option<String>,
    /// IRC server port
    #[arg(long)]
    pub port: Option<u16>,
    /// Your IRC nickname
    #[arg(long)]
    pub nickname: Option<String>,
    /// Password for NickServ identification (if any)
    #[arg(long)]
    pub password: Option<String>,
    /// Channel to join
    #[arg(long)]
    pub channel: Option<String>,
    /// Config file to read instead of the default location
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Write diagnostic logs to this file
    #[arg(long)]
    pub log_file: Option<PathBuf>,
    /// Accept any TLS certificate
    #[arg(long)]
    pub insecure: bool,
}

impl Cli {
    pub fn apply(self, config: &mut AppConfig) {
        if let Some(server) = self.server {
            config.server = server;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(nickname) = self.nickname {
            config.nickname = nickname;
        }
        if let Some(password) = self.password {
            config.password = password;
        }
        if let Some(channel) = self.channel {
            config.channel = channel;
        }
        if let Some(log_file) = self.log_file {
            config.log_file = Some(log_file);
        }
        if self.insecure {
            config.accept_invalid_certs = true;
        }
    }
}

fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ircline")
        .join("config.toml")
}

/// Parse the command line, then layer it over the config file and defaults.
pub fn load_config() -> Result<AppConfig> {
    let cli = Cli::parse();
    let path = cli.config.clone();
    let mut config = match path {
        Some(path) => read_config(&path)?,
        None => {
            let path = config_path();
            if path.exists() {
                read_config(&path)?
            } else {
                AppConfig::default()
            }
        }
    };
    cli.apply(&mut config);
    Ok(config)
}

fn read_config(path: &Path) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    parse_config(&contents)
        .with_context(|| format!("Failed to parse config file {}", path.display()))
}

fn parse_config(contents: &str) -> Result<AppConfig> {
    Ok(toml::from_str(contents)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_gives_defaults() {
        let config = parse_config("").unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.server, "irc.libera.chat");
        assert_eq!(config.port, 6697);
        assert_eq!(config.nickname, "Guest");
        assert_eq!(config.channel, "##chat");
        assert!(config.password.is_empty());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let config = parse_config("nickname = \"ferris\"\nport = 7000\n").unwrap();
        assert_eq!(config.nickname, "ferris");
        assert_eq!(config.port, 7000);
        assert_eq!(config.identify_delay_ms, 300);
    }

    #[test]
    fn test_bad_file_is_an_error() {
        assert!(parse_config("port = \"not a number\"").is_err());
    }

    #[test]
    fn test_flags_override_file() {
        let mut config = parse_config("server = \"irc.example.net\"\nchannel = \"#a\"").unwrap();
        let cli = Cli::try_parse_from([
            "ircline",
            "--channel",
            "#b",
            "--password",
            "pw",
            "--insecure",
        ])
        .unwrap();
        cli.apply(&mut config);
        assert_eq!(config.server, "irc.example.net");
        assert_eq!(config.channel, "#b");
        assert_eq!(config.password, "pw");
        assert!(config.accept_invalid_certs);
    }
}
