use std::env;

pub const DEFAULT_TOP_K: usize = 4;
pub const DEFAULT_CHUNK_SIZE: usize = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct ProviderConfig {
    pub chat_model: String,
    pub embedding_model: String,
    pub temperature: f32,
}

impl ProviderConfig {
    pub fn from_env(provider: &str) -> Self {
        let prefix = provider.to_uppercase();

        let chat_model = env::var(format!("{}_CHAT_MODEL", prefix))
            .unwrap_or_else(|_| match provider {
                "openai" => "gpt-3.5-turbo".to_string(),
                _ => String::new(),
            });

        let embedding_model = env::var(format!("{}_EMBEDDING_MODEL", prefix))
            .unwrap_or_else(|_| match provider {
                "openai" => "text-embedding-3-small".to_string(),
                _ => String::new(),
            });

        // Answers must be grounded, so sampling is off unless asked for
        let temperature = env::var(format!("{}_TEMPERATURE", prefix))
            .ok()
            .and_then(|t| t.parse().ok())
            .unwrap_or(0.0);

        Self {
            chat_model,
            embedding_model,
            temperature,
        }
    }
}

/// Knobs for turning the PDF into a searchable index.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    pub provider: ProviderConfig,
    pub top_k: usize,
    pub chunk_size: usize,
    pub qdrant_url: Option<String>,
    pub collection_name: String,
}

impl PipelineConfig {
    pub fn from_env() -> Self {
        let top_k = env::var("CONTRACT_QA_TOP_K")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TOP_K);

        let chunk_size = env::var("CONTRACT_QA_CHUNK_SIZE")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_CHUNK_SIZE);

        let collection_name = env::var("CONTRACT_QA_COLLECTION")
            .unwrap_or_else(|_| "contract_chunks".to_string());

        Self {
            provider: ProviderConfig::from_env("openai"),
            top_k,
            chunk_size,
            qdrant_url: env::var("QDRANT_URL").ok(),
            collection_name,
        }
    }
}
