//
// Copyright (c) The Holo Core Contributors
//
// SPDX-License-Identifier: MIT
//

#![allow(clippy::derivable_impls)]

use serde::Deserialize;

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub user: String,
    pub group: String,
    pub database_path: String,
    pub socket_path: String,
    pub startup_config_path: String,
    pub logging: Logging,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Logging {
    pub journald: LoggingJournald,
    pub file: LoggingFile,
    pub stdout: LoggingStdout,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingJournald {
    pub enabled: bool,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingFile {
    pub enabled: bool,
    pub dir: String,
    pub name: String,
    pub rotation: LoggingFileRotation,
    #[serde(flatten)]
    pub fmt: LoggingFmt,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingStdout {
    pub enabled: bool,
    #[serde(flatten)]
    pub fmt: LoggingFmt,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingFmt {
    pub style: LoggingFmtStyle,
    pub colors: bool,
    pub show_thread_id: bool,
    pub show_source: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingFileRotation {
    #[default]
    Never,
    Hourly,
    Daily,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoggingFmtStyle {
    Compact,
    Full,
    Json,
    Pretty,
}

// ===== impl Config =====

impl Config {
    const DFLT_FILEPATH: &'static str = "/etc/netsyncd.toml";

    pub(crate) fn load(config_file: Option<&str>) -> Config {
        let config_file = config_file.unwrap_or(Config::DFLT_FILEPATH);

        match std::fs::read_to_string(config_file) {
            Ok(config_str) => toml::from_str(&config_str)
                .expect("Failed to parse configuration file"),
            Err(err) => {
                eprintln!("Failed to load configuration file: {err}");
                eprintln!("Falling back to default configuration...");
                Config::default()
            }
        }
    }
}

impl Default for Config {
    fn default() -> Config {
        Config {
            user: "netsync".to_owned(),
            group: "netsync".to_owned(),
            database_path: "/var/opt/netsync/netsync.db".to_owned(),
            socket_path: "/var/run/netsync/netsyncd.sock".to_owned(),
            startup_config_path: "/etc/netsyncd.conf.json".to_owned(),
            logging: Default::default(),
        }
    }
}

// ===== impl LoggingJournald =====

impl Default for LoggingJournald {
    fn default() -> LoggingJournald {
        LoggingJournald { enabled: false }
    }
}

// ===== impl LoggingFile =====

impl Default for LoggingFile {
    fn default() -> LoggingFile {
        LoggingFile {
            enabled: true,
            dir: "/var/log".to_owned(),
            name: "netsyncd.log".to_owned(),
            rotation: Default::default(),
            fmt: Default::default(),
        }
    }
}

// ===== impl LoggingStdout =====

impl Default for LoggingStdout {
    fn default() -> LoggingStdout {
        LoggingStdout {
            enabled: false,
            fmt: Default::default(),
        }
    }
}

// ===== impl LoggingFmt =====

impl Default for LoggingFmt {
    fn default() -> LoggingFmt {
        LoggingFmt {
            style: LoggingFmtStyle::Full,
            colors: false,
            show_thread_id: false,
            show_source: false,
        }
    }
}

// ===== tests =====

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = Config::default();
        assert_eq!(config.user, "netsync");
        assert_eq!(config.group, "netsync");
        assert_eq!(config.database_path, "/var/opt/netsync/netsync.db");
        assert_eq!(config.socket_path, "/var/run/netsync/netsyncd.sock");
        assert!(config.logging.file.enabled);
        assert!(!config.logging.journald.enabled);
        assert!(!config.logging.stdout.enabled);
    }

    #[test]
    fn config_parse() {
        let config_str = r#"
            user = "daemon"
            socket_path = "/tmp/netsyncd.sock"

            [logging.stdout]
            enabled = true
            style = "json"

            [logging.file]
            enabled = false
        "#;

        let config: Config = toml::from_str(config_str).unwrap();
        assert_eq!(config.user, "daemon");
        assert_eq!(config.socket_path, "/tmp/netsyncd.sock");
        assert!(config.logging.stdout.enabled);
        assert!(matches!(
            config.logging.stdout.fmt.style,
            LoggingFmtStyle::Json
        ));
        assert!(!config.logging.file.enabled);

        // Unset fields keep their default values.
        assert_eq!(config.group, "netsync");
        assert_eq!(config.startup_config_path, "/etc/netsyncd.conf.json");
    }

    #[test]
    fn config_load_missing_file() {
        let config = Config::load(Some("/nonexistent/netsyncd.toml"));
        assert_eq!(config.user, "netsync");
        assert_eq!(config.database_path, "/var/opt/netsync/netsync.db");
    }
}
