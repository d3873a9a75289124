use qdrant_client::{config::QdrantConfig, Qdrant};
use std::time::Duration;

use crate::database::vector_db::VectorDBError;

/// Normalises a REST-style URL to the gRPC endpoint the client speaks.
pub fn grpc_url(url: &str) -> String {
    let clean_url = if url.contains("://") {
        url.split("://").nth(1).unwrap_or(url).to_string()
    } else {
        url.to_string()
    };

    // Replace port 6333 with 6334 for gRPC if needed
    let grpc_url = if clean_url.ends_with(":6333") {
        clean_url.replace(":6333", ":6334")
    } else {
        clean_url
    };

    format!("http://{}", grpc_url.trim_end_matches('/'))
}

pub async fn create_qdrant_client(url: &str) -> Result<Qdrant, VectorDBError> {
    let url_with_scheme = grpc_url(url);
    log::info!("Attempting to connect to Qdrant with URL: {}", url_with_scheme);

    let mut config = QdrantConfig::from_url(&url_with_scheme);
    config.check_compatibility = false;
    config.timeout = Duration::from_secs(30);
    config.connect_timeout = Duration::from_secs(10);

    let client = Qdrant::new(config).map_err(|e| VectorDBError::Connection(e.to_string()))?;

    match client.list_collections().await {
        Ok(_) => {
            log::info!("Successfully connected to Qdrant");
            Ok(client)
        }
        Err(e) => {
            log::error!("Connection test failed: {}", e);
            Err(VectorDBError::Connection(format!("Failed to connect to Qdrant: {}", e)))
        }
    }
}
