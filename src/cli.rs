use clap::Parser;

use crate::config::AppConfig;

/// Command-line overrides for the server binary. Anything left unset keeps
/// the value from the environment profile.
#[derive(Parser, Debug, Default)]
#[command(name = "monji-web")]
#[command(about = "Monji web tier - browse and manage MongoDB environments through the Monji API")]
#[command(version)]
pub struct Cli {
    #[arg(long, help = "Address to bind (overrides SERVER_HOST)")]
    pub host: Option<String>,

    #[arg(long, short, help = "Port to listen on (overrides SERVER_PORT)")]
    pub port: Option<u16>,

    #[arg(long, help = "Monji API base URL (overrides API_BASE_URL)")]
    pub api_base_url: Option<String>,
}

impl Cli {
    pub fn apply(&self, config: &mut AppConfig) {
        if let Some(host) = &self.host {
            config.server.host = host.clone();
        }
        if let Some(port) = self.port {
            config.server.port = port;
        }
        if let Some(url) = &self.api_base_url {
            config.backend.base_url = url.clone();
        }
    }
}
