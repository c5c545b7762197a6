use clap::{Parser, Subcommand};
use serde_json::json;

#[derive(Parser)]
#[command(name = "parley")]
#[command(about = "Parley CLI — Alexa skill gateway backed by an LLM", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Create the configuration directory and a default config file.
    Init {
        /// Config file path (default: PARLEY_CONFIG_PATH or ~/.parley/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,
    },

    /// Run the gateway (health probe + Alexa skill endpoint). Reads OPENAI_API_KEY
    /// from the environment; without a key, chat replies degrade to the fallback text.
    Gateway {
        /// Config file path (default: PARLEY_CONFIG_PATH or ~/.parley/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP port (default from config or 8787)
        #[arg(long, short)]
        port: Option<u16>,
    },

    /// Send one chat query to a running gateway as a synthetic skill request and
    /// print the spoken reply. Useful for smoke-testing without the voice platform.
    Ask {
        /// The question to ask.
        text: String,

        /// Config file path (default: PARLEY_CONFIG_PATH or ~/.parley/config.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// Gateway port (default from config or 8787)
        #[arg(long, short)]
        port: Option<u16>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("parley {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Init { config }) => {
            if let Err(e) = run_init(config) {
                log::error!("init failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Gateway { config, port }) => {
            if let Err(e) = run_gateway(config, port).await {
                log::error!("gateway failed: {}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Ask { text, config, port }) => {
            if let Err(e) = run_ask(text, config, port).await {
                log::error!("ask failed: {}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

fn run_init(config_path: Option<std::path::PathBuf>) -> anyhow::Result<()> {
    let path = config_path.unwrap_or_else(lib::config::default_config_path);
    let dir = lib::init::init_config_dir(&path)?;
    println!("initialized configuration at {}", dir.display());
    Ok(())
}

async fn run_gateway(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let (mut config, _path) = lib::config::load_config(config_path)?;
    if let Some(p) = port {
        config.gateway.port = p;
    }
    log::info!(
        "starting gateway on {}:{}",
        config.gateway.bind,
        config.gateway.port
    );
    lib::gateway::run_gateway(config).await
}

async fn run_ask(
    text: String,
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
) -> anyhow::Result<()> {
    let (config, _path) = lib::config::load_config(config_path)?;
    let port = port.unwrap_or(config.gateway.port);
    let url = format!("http://127.0.0.1:{}/alexa", port);

    let envelope = json!({
        "request": {
            "type": "IntentRequest",
            "intent": {
                "name": "ChatIntent",
                "slots": {"query": {"value": text}}
            }
        }
    });

    let client = reqwest::Client::new();
    let res = client.post(&url).json(&envelope).send().await?;
    if !res.status().is_success() {
        anyhow::bail!("gateway returned {}", res.status());
    }
    let body: serde_json::Value = res.json().await?;
    let speech = body
        .pointer("/response/outputSpeech/text")
        .and_then(|v| v.as_str())
        .unwrap_or("(no speech in response)");
    println!("{}", speech);
    Ok(())
}
