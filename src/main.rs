use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use contract_qa::cli::{Args, EmbedderKind};
use contract_qa::config::PipelineConfig;
use contract_qa::database::{InMemoryVectorStore, QdrantVectorStore, VectorStore};
use contract_qa::document::PdfLoader;
use contract_qa::llm::{ConversationalRetrievalChain, EmbeddingGenerator, Retriever};
use contract_qa::pipeline::{answer_questions, build_graph, index_document};
use contract_qa::providers::{CompletionProvider, EmbeddingProvider, HashingEmbedder, OpenAIProvider};
use contract_qa::runner::{BatchRunner, FailurePolicy};
use dotenv::dotenv;
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();

    let mut config = PipelineConfig::from_env();
    config.top_k = args.top_k;
    config.chunk_size = args.chunk_size;
    if args.qdrant_url.is_some() {
        config.qdrant_url = args.qdrant_url.clone();
    }

    let openai = Arc::new(OpenAIProvider::new(args.api_key.clone(), &config.provider));
    log::info!("Answering with {}", openai.get_model_info());
    let embedder: Arc<dyn EmbeddingProvider> = match args.embedder {
        EmbedderKind::Openai => openai.clone(),
        EmbedderKind::Hashing => Arc::new(HashingEmbedder::default()),
    };
    log::info!("Embedding with {}", embedder.model_name());

    let store: Arc<dyn VectorStore> = match &config.qdrant_url {
        Some(url) => Arc::new(
            QdrantVectorStore::new(url, &config.collection_name)
                .await
                .context("failed to open Qdrant collection")?,
        ),
        None => Arc::new(InMemoryVectorStore::new()),
    };

    let generator = EmbeddingGenerator::new(embedder.clone());
    index_document(
        &PdfLoader::new(),
        &args.pdf,
        config.chunk_size,
        &generator,
        store.as_ref(),
    )
    .await
    .with_context(|| format!("failed to index {}", args.pdf.display()))?;

    let retriever = Retriever::new(embedder, store, config.top_k);
    let chain = Arc::new(ConversationalRetrievalChain::from_llm(openai, retriever));
    let graph = build_graph(chain).context("failed to build agent graph")?;

    let policy = if args.skip_failures {
        FailurePolicy::Skip
    } else {
        FailurePolicy::Abort
    };
    let runner = BatchRunner::new(graph)
        .with_policy(policy)
        .with_sources(args.show_sources);

    let questions = args.questions();
    let report = answer_questions(&runner, &questions, &args.log).await?;

    println!(
        "\n{} {} of {} questions answered, log written to {}",
        "✔".bright_green(),
        report.entries.len(),
        questions.len(),
        args.log.display().to_string().bright_yellow()
    );
    if !report.failed.is_empty() {
        println!("{} {} questions failed", "✘".red(), report.failed.len());
    }

    Ok(())
}
