use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use nt_client::voice::{
    RecognitionOptions, RecognitionResult, SpeechCapability, SpeechRecognizer, Utterance, VoiceSession,
};
use nt_client::{Controller, HttpBackend, StalePolicy};
use nt_core::AppConfig;
use nt_web::AppState;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info, Level};

#[derive(Parser, Debug)]
#[command(author, version, about = "Top headlines with neutral rewrites", long_about = None)]
pub struct Cli {
    /// NewsAPI key used by the headline endpoint
    #[arg(long, env = "NEWSAPI_KEY", hide_env_values = true, global = true)]
    news_api_key: Option<String>,
    /// Friendli token used for rewrites
    #[arg(long, env = "FRIENDLI_TOKEN", hide_env_values = true, global = true)]
    friendli_token: Option<String>,
    #[arg(long, default_value = nt_inference::DEFAULT_MODEL, global = true, help = "Model to use for rewrites. Available models: friendli (default), dummy")]
    model: String,
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand, Debug)]
enum Commands {
    /// Serve GET and POST /api/news
    Serve {
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },
    /// Load the headline page from a running server and print it
    Headlines {
        #[arg(long, default_value = "http://127.0.0.1:3000")]
        server: String,
        /// Rewrite every article before printing
        #[arg(long)]
        neutralize: bool,
        /// Ignore rewrite results superseded by a newer request
        #[arg(long)]
        drop_stale: bool,
    },
    /// Rewrite a single text with the configured model
    Neutralize {
        text: String,
    },
    /// Read utterances from stdin and print the avatar commands they trigger.
    /// An empty line toggles listening.
    Avatar,
}

impl Cli {
    fn config(&self) -> AppConfig {
        let mut config = AppConfig::from_env();
        if let Some(key) = &self.news_api_key {
            config.news.api_key = Some(key.clone());
        }
        if let Some(token) = &self.friendli_token {
            config.inference.api_key = Some(token.clone());
        }
        config
    }
}

/// Stands in for a speech engine: stdin lines are delivered as final results
/// by the read loop, so starting and stopping only needs to be logged.
struct StdinRecognizer;

impl SpeechRecognizer for StdinRecognizer {
    fn start(&mut self, options: RecognitionOptions) {
        debug!("Reading speech from stdin ({:?})", options);
    }

    fn stop(&mut self) {
        debug!("Stopped reading speech from stdin");
    }
}

fn describe(utterance: &Utterance) -> String {
    if utterance.command.is_empty() {
        return format!("\"{}\": no command", utterance.text);
    }
    let expression = utterance.command.expression.map(|e| e.as_str()).unwrap_or("-");
    let action = utterance.command.action.map(|a| a.as_str()).unwrap_or("-");
    format!("\"{}\": expression={} action={}", utterance.text, expression, action)
}

async fn run_avatar() -> anyhow::Result<()> {
    let mut session = VoiceSession::new(SpeechCapability::Available(Box::new(StdinRecognizer)));
    session.toggle()?;

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            session.toggle()?;
            continue;
        }
        if !session.is_listening() {
            debug!("Not listening, ignoring {:?}", line);
            continue;
        }
        if let Some(utterance) = session.on_results(0, &[RecognitionResult::final_text(line)]) {
            println!("{}", describe(&utterance));
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Commands::Serve { bind } => {
            let config = cli.config();
            if config.news.api_key.is_none() {
                info!("⚠️ No NewsAPI key configured, GET /api/news will fail");
            }
            let state = AppState::from_config(&config, &cli.model)?;
            info!("🧠 Inference model initialized successfully (using {})", state.inference_model.name());
            nt_web::serve(*bind, state).await?;
        }
        Commands::Headlines { server, neutralize, drop_stale } => {
            let policy = if *drop_stale { StalePolicy::DropStale } else { StalePolicy::LastWriteWins };
            let mut controller = Controller::new(Arc::new(HttpBackend::new(server.as_str()))).with_policy(policy);
            info!("📰 Loading headlines from {}", server);
            controller.load().await;
            if *neutralize {
                let applied = controller.rewrite_all().await;
                info!("⚖️ Applied {} rewrites", applied);
            }
            print!("{}", controller.render());
        }
        Commands::Neutralize { text } => {
            let config = cli.config();
            let model = nt_inference::create_model(&cli.model, config.inference)?;
            model.ensure_configured()?;
            info!("🧠 Rewriting with {}", model.name());
            let summary = model
                .neutralize(text)
                .await
                .context("Failed to generate neutral summary")?;
            println!("{}", summary);
        }
        Commands::Avatar => run_avatar().await?,
    }

    Ok(())
}
