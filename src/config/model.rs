//! Configuration data model.
//!
//! Every field has a default so the client starts with no config file and no
//! flags at all.

use serde::Deserialize;
use std::path::PathBuf;

/// Launch configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// Hostname of the IRC server.
    #[serde(default = "default_server")]
    pub server: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_nickname")]
    pub nickname: String,
    /// NickServ password; empty means no identification.
    #[serde(default)]
    pub password: String,
    /// Channel joined after registration.
    #[serde(default = "default_channel")]
    pub channel: String,
    /// Pause between identifying and joining, in milliseconds.
    #[serde(default = "default_identify_delay_ms")]
    pub identify_delay_ms: u64,
    #[serde(default = "default_quit_message")]
    pub quit_message: String,
    #[serde(default)]
    pub accept_invalid_certs: bool,
    /// Diagnostic log destination; no logging when unset.
    #[serde(default)]
    pub log_file: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: default_server(),
            port: default_port(),
            nickname: default_nickname(),
            password: String::new(),
            channel: default_channel(),
            identify_delay_ms: default_identify_delay_ms(),
            quit_message: default_quit_message(),
            accept_invalid_certs: false,
            log_file: None,
        }
    }
}

fn default_server() -> String {
    "irc.libera.chat".to_string()
}
fn default_port() -> u16 {
    6697
}
fn default_nickname() -> String {
    "Guest".to_string()
}
fn default_channel() -> String {
    "##chat".to_string()
}
fn default_identify_delay_ms() -> u64 {
    300
}
fn default_quit_message() -> String {
    "bye".to_string()
}
