use std::path::PathBuf;

use clap::Parser;
use fertilizer_gateway::{
    config::{
        DEFAULT_HOST, DEFAULT_MAX_PAYLOAD_SIZE, DEFAULT_MODEL_PATH, DEFAULT_PORT, GatewayConfig,
    },
    logging::init_logging,
    model::ModelHandle,
    server,
};
use log::info;
use tokio::signal;

#[derive(Parser, Debug)]
#[command(name = "fertilizer-gateway")]
#[command(about = "Serves fertilizer predictions from a pre-trained tabular model")]
struct CliArgs {
    #[arg(long, env = "HOST", default_value = DEFAULT_HOST)]
    host: String,

    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    port: u16,

    /// Serialized model artifact, loaded once at startup
    #[arg(long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    model_path: PathBuf,

    /// Maximum accepted request body in bytes
    #[arg(long, env = "MAX_PAYLOAD_SIZE", default_value_t = DEFAULT_MAX_PAYLOAD_SIZE)]
    max_payload_size: usize,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,
}

impl From<CliArgs> for GatewayConfig {
    fn from(args: CliArgs) -> Self {
        GatewayConfig {
            host: args.host,
            port: args.port,
            model_path: args.model_path,
            max_payload_size: args.max_payload_size,
            log_level: args.log_level,
        }
    }
}

fn main() -> anyhow::Result<()> {
    let config = GatewayConfig::from(CliArgs::parse());
    config.validate()?;
    init_logging(config.level_filter()?);

    let model = ModelHandle::load(&config.model_path);

    actix_web::rt::System::new().block_on(async move {
        tokio::select! {
            res = server::startup(config, model) => res?,
            _ = signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down");
            }
        }
        Ok::<(), anyhow::Error>(())
    })
}
