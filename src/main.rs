use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use docqa::application::{Answer, IngestService, QaPrompts, QaService, RetrievalService};
use docqa::domain::Conversation;
use docqa::infrastructure::{
    loader, AnthropicLlm, AppConfig, LocalVectorStore, OpenAiEmbedding,
};

#[derive(Parser)]
#[command(
    name = "docqa",
    version,
    about = "Question answering over a directory of local text and PDF files"
)]
struct Cli {
    /// Optional YAML config file.
    #[arg(long, global = true, env = "DOCQA_CONFIG")]
    config: Option<PathBuf>,

    /// Path of the persisted index (overrides config).
    #[arg(long, global = true, env = "DOCQA_INDEX")]
    index: Option<PathBuf>,

    /// Number of chunks retrieved per question (overrides config).
    #[arg(long, global = true, env = "DOCQA_TOP_K")]
    top_k: Option<usize>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the index from a directory of .txt/.md/.pdf files.
    Ingest { dir: PathBuf },
    /// Answer a single question against the persisted index.
    Ask { question: String },
    /// Show the top-K chunks for a query without calling the LLM.
    Search { query: String },
    /// Interactive session with conversational memory. `exit` or EOF quits.
    Chat,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "docqa=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(index) = cli.index {
        config.index_path = index;
    }
    if let Some(top_k) = cli.top_k {
        config.retrieval.top_k = top_k;
    }
    config.validate()?;

    match cli.command {
        Commands::Ingest { dir } => ingest(&config, &dir).await,
        Commands::Ask { question } => ask(&config, &question).await,
        Commands::Search { query } => search(&config, &query).await,
        Commands::Chat => chat(&config).await,
    }
}

async fn ingest(config: &AppConfig, dir: &Path) -> anyhow::Result<()> {
    let docs = loader::load_directory(dir)?;
    info!(documents = docs.len(), "documents loaded");

    let store = Arc::new(LocalVectorStore::new());
    let embedding = Arc::new(OpenAiEmbedding::from_config(&config.embedding));
    let service = IngestService::new(
        embedding,
        store.clone(),
        config.chunking.max_chars,
        config.chunking.overlap_chars,
    );

    let chunks = service.ingest_all(&docs).await?;
    store.save(&config.index_path)?;

    println!(
        "Indexed {} chunks from {} documents into {}",
        chunks,
        docs.len(),
        config.index_path.display()
    );
    Ok(())
}

fn retrieval_service(config: &AppConfig) -> anyhow::Result<Arc<RetrievalService>> {
    let store = Arc::new(LocalVectorStore::load(&config.index_path)?);
    let embedding = Arc::new(OpenAiEmbedding::from_config(&config.embedding));
    Ok(Arc::new(RetrievalService::new(
        embedding,
        store,
        config.retrieval.top_k,
    )))
}

fn qa_service(config: &AppConfig) -> anyhow::Result<QaService> {
    let llm = Arc::new(AnthropicLlm::from_config(&config.llm));
    let prompts = QaPrompts {
        system: config.prompts.system.clone(),
    };
    Ok(QaService::new(retrieval_service(config)?, llm, prompts))
}

async fn ask(config: &AppConfig, question: &str) -> anyhow::Result<()> {
    let service = qa_service(config)?;
    let mut conversation = Conversation::new();

    let answer = service.ask(&mut conversation, question).await?;
    print_answer(&answer);
    Ok(())
}

async fn search(config: &AppConfig, query: &str) -> anyhow::Result<()> {
    let service = retrieval_service(config)?;

    let results = service.retrieve(query).await?;
    if results.is_empty() {
        println!("No matching chunks.");
        return Ok(());
    }
    for (i, result) in results.iter().enumerate() {
        println!(
            "[{}] {} (chunk {}, score {:.3})",
            i + 1,
            result.chunk.source.path.display(),
            result.chunk.chunk_index,
            result.score
        );
        println!("{}", result.chunk.content);
        println!();
    }
    Ok(())
}

async fn chat(config: &AppConfig) -> anyhow::Result<()> {
    let service = qa_service(config)?;
    let mut conversation = Conversation::new();
    let stdin = std::io::stdin();

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let mut line = String::new();
        if stdin.read_line(&mut line)? == 0 {
            break;
        }
        let question = line.trim();
        if question.is_empty() {
            continue;
        }
        if question == "exit" || question == "quit" {
            break;
        }

        // A failed call leaves the conversation untouched; the session
        // continues with its history intact.
        match service.ask(&mut conversation, question).await {
            Ok(answer) => print_answer(&answer),
            Err(e) => eprintln!("error: {e}"),
        }
    }

    Ok(())
}

fn print_answer(answer: &Answer) {
    println!("{}", answer.text);
    if !answer.sources.is_empty() {
        println!();
        println!("Sources:");
        for result in &answer.sources {
            println!(
                "  {} (chunk {}, score {:.3})",
                result.chunk.source.path.display(),
                result.chunk.chunk_index,
                result.score
            );
        }
    }
}
