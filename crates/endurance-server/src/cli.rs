use std::path::PathBuf;

use clap::Parser;
use endurance_config::EnduranceConfig;

/// Top-level CLI parser for the `endurance` binary.
#[derive(Debug, Parser)]
#[command(
    name = "endurance",
    version,
    about = "Endurance - engineering analytics dashboard API"
)]
pub struct Cli {
    /// Address to bind (overrides `server.host`)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on (overrides `server.port`)
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Extra TOML config file, layered above the project file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Quiet mode (warnings and errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Verbose mode (debug logging)
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Apply command-line overrides on top of loaded configuration.
    pub fn apply(&self, config: &mut EnduranceConfig) {
        if let Some(host) = &self.host {
            config.server.host.clone_from(host);
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
    }
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::Cli;
    use endurance_config::EnduranceConfig;

    #[test]
    fn clap_command_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn overrides_apply_to_config() {
        let cli = Cli::try_parse_from(["endurance", "--host", "127.0.0.1", "-p", "8080", "-v"])
            .expect("parse");
        let mut config = EnduranceConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.server.bind_addr(), "127.0.0.1:8080");
        assert!(cli.verbose);
        assert!(!cli.quiet);
    }

    #[test]
    fn no_flags_keep_config() {
        let cli = Cli::try_parse_from(["endurance"]).expect("parse");
        let mut config = EnduranceConfig::default();
        cli.apply(&mut config);
        assert_eq!(config.server.port, 3001);
        assert!(cli.config.is_none());
    }
}
