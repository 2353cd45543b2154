use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use wled_bridge::config::{
    BridgeConfig, DEFAULT_BIND_HOST, DEFAULT_BROKER_URL, DEFAULT_PORT, DEFAULT_STATIC_DIR,
    DispatchMode,
};
use wled_bridge::debug::{LogConfig, LogFormat};

#[derive(Parser, Debug)]
#[command(
    name = "wled-bridge",
    version,
    about = "HTTP bridge for WLED lighting controllers",
    long_about = "Accepts WLED JSON commands over HTTP and either publishes them to an MQTT broker \
                  or forwards them to a device's /json/state endpoint",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Options used when no subcommand is given (same as `run`)
    #[command(flatten)]
    pub run: RunArgs,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the bridge (default)
    Run(RunArgs),
    /// Validate and print the resolved configuration without starting the server
    #[command(name = "check-config")]
    CheckConfig(RunArgs),
}

impl Cli {
    /// Resolve the subcommand, treating a bare invocation as `run`
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Run(self.run))
    }
}

#[derive(Args, Debug, Clone)]
pub struct RunArgs {
    /// Port to bind the web server to
    #[arg(short, long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Host to bind the web server to
    #[arg(short = 'H', long, env = "BIND_HOST", default_value = DEFAULT_BIND_HOST)]
    pub host: String,

    /// How commands are delivered to the controllers
    #[arg(short, long, env = "BRIDGE_MODE", value_enum, default_value_t = DispatchMode::Mqtt)]
    pub mode: DispatchMode,

    /// MQTT broker URL (mqtt://, tcp://, mqtts:// or ssl://)
    #[arg(short, long, env = "MQTT_BROKER", default_value = DEFAULT_BROKER_URL)]
    pub broker: String,

    /// MQTT username
    #[arg(long, env = "MQTT_USERNAME", default_value = "")]
    pub username: String,

    /// MQTT password
    #[arg(long, env = "MQTT_PASSWORD", default_value = "", hide_env_values = true)]
    pub password: String,

    /// Directory containing the control panel's index.html
    #[arg(long, env = "STATIC_DIR", default_value = DEFAULT_STATIC_DIR)]
    pub static_dir: PathBuf,

    /// Console log format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Write JSON logs to daily rotated files in this directory
    #[arg(long, env = "LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl RunArgs {
    pub fn bridge_config(&self) -> BridgeConfig {
        BridgeConfig {
            bind_host: self.host.clone(),
            port: self.port,
            mode: self.mode,
            broker_url: self.broker.clone(),
            mqtt_username: self.username.clone(),
            mqtt_password: self.password.clone(),
            static_dir: self.static_dir.clone(),
        }
    }

    pub fn log_config(&self) -> LogConfig {
        let base = if self.verbose {
            LogConfig::development()
        } else {
            LogConfig::default()
        };
        LogConfig {
            format: self.log_format,
            log_directory: self.log_dir.clone(),
            ..base
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use tracing::Level;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_bare_invocation_runs() {
        let cli = Cli::try_parse_from(["wled-bridge", "--mode", "proxy", "-p", "9000"]).unwrap();
        match cli.into_command() {
            Commands::Run(args) => {
                let config = args.bridge_config();
                assert_eq!(config.mode, DispatchMode::Proxy);
                assert_eq!(config.port, 9000);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_check_config_subcommand() {
        let cli = Cli::try_parse_from([
            "wled-bridge",
            "check-config",
            "--broker",
            "mqtts://broker.example:8884",
            "--username",
            "bridge",
        ])
        .unwrap();
        match cli.into_command() {
            Commands::CheckConfig(args) => {
                let config = args.bridge_config();
                assert_eq!(config.broker_url, "mqtts://broker.example:8884");
                assert_eq!(config.mqtt_username, "bridge");
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_verbose_enables_debug() {
        let cli = Cli::try_parse_from(["wled-bridge", "run", "--verbose", "--log-format", "json"])
            .unwrap();
        let Commands::Run(args) = cli.into_command() else {
            panic!("expected run");
        };
        let log = args.log_config();
        assert_eq!(log.log_level, Level::DEBUG);
        assert_eq!(log.format, LogFormat::Json);
    }

    #[test]
    fn test_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["wled-bridge", "--mode", "serial"]).is_err());
    }
}
