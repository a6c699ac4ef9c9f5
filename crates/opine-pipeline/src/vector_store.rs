//! Qdrant vector store client and the embed-then-store composition.

use async_trait::async_trait;
use serde::Serialize;

use crate::embeddings::TeiClient;
use crate::error::PipelineError;

/// Qdrant HTTP client.
pub struct QdrantClient {
    client: reqwest::Client,
    base_url: String,
    dimension: u64,
}

#[derive(Serialize)]
struct CreateCollectionRequest {
    vectors: VectorsConfig,
}

#[derive(Serialize)]
struct VectorsConfig {
    size: u64,
    distance: &'static str,
}

#[derive(Serialize)]
struct UpsertPointsRequest<'a> {
    points: Vec<Point<'a>>,
}

#[derive(Serialize)]
struct Point<'a> {
    id: u64,
    vector: &'a [f32],
    payload: Payload<'a>,
}

#[derive(Serialize)]
struct Payload<'a> {
    text: &'a str,
}

impl QdrantClient {
    #[must_use]
    pub fn new(client: reqwest::Client, qdrant_url: &str, dimension: u64) -> Self {
        Self {
            client,
            base_url: qdrant_url.trim_end_matches('/').to_string(),
            dimension,
        }
    }

    /// Ensure `collection` exists, creating it if absent.
    ///
    /// New collections use cosine distance and the configured dimension.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::VectorStore`] on network or API failure.
    pub async fn get_or_create(&self, collection: &str) -> Result<(), PipelineError> {
        let url = format!("{}/collections/{collection}", self.base_url);

        let check = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| PipelineError::VectorStore(format!("collection lookup failed: {e}")))?;

        if check.status().is_success() {
            return Ok(());
        }
        if check.status() != reqwest::StatusCode::NOT_FOUND {
            return Err(PipelineError::VectorStore(format!(
                "collection lookup returned status {}",
                check.status()
            )));
        }

        let body = CreateCollectionRequest {
            vectors: VectorsConfig {
                size: self.dimension,
                distance: "Cosine",
            },
        };

        let resp = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                PipelineError::VectorStore(format!("collection create request failed: {e}"))
            })?;

        if !resp.status().is_success() {
            return Err(PipelineError::VectorStore(format!(
                "collection create returned status {}",
                resp.status()
            )));
        }

        tracing::info!(collection, dimension = self.dimension, "created Qdrant collection");
        Ok(())
    }

    /// Upsert `(id, document, embedding)` triples into `collection`.
    ///
    /// Existing points with the same ID are overwritten.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::VectorStore`] if the three slices differ in
    /// length or on network or API failure.
    pub async fn add(
        &self,
        collection: &str,
        ids: &[u64],
        documents: &[&str],
        embeddings: &[Vec<f32>],
    ) -> Result<(), PipelineError> {
        if ids.len() != documents.len() || ids.len() != embeddings.len() {
            return Err(PipelineError::VectorStore(format!(
                "mismatched batch: {} ids, {} documents, {} embeddings",
                ids.len(),
                documents.len(),
                embeddings.len()
            )));
        }

        let points = ids
            .iter()
            .zip(documents)
            .zip(embeddings)
            .map(|((&id, &text), vector)| Point {
                id,
                vector,
                payload: Payload { text },
            })
            .collect();

        let url = format!(
            "{}/collections/{collection}/points?wait=true",
            self.base_url
        );
        let resp = self
            .client
            .put(&url)
            .json(&UpsertPointsRequest { points })
            .send()
            .await
            .map_err(|e| PipelineError::VectorStore(format!("upsert request failed: {e}")))?;

        if !resp.status().is_success() {
            return Err(PipelineError::VectorStore(format!(
                "upsert returned status {}",
                resp.status()
            )));
        }

        Ok(())
    }
}

/// Embeds a batch of texts and stores them under a named collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Returns the number of documents stored.
    async fn embed_and_store(
        &self,
        texts: &[&str],
        collection: &str,
    ) -> Result<usize, PipelineError>;
}

/// TEI embeddings written to Qdrant.
pub struct VectorIndex {
    tei: TeiClient,
    qdrant: QdrantClient,
}

impl VectorIndex {
    #[must_use]
    pub fn new(tei: TeiClient, qdrant: QdrantClient) -> Self {
        Self { tei, qdrant }
    }
}

#[async_trait]
impl DocumentStore for VectorIndex {
    /// Point IDs are the zero-based batch index, so reusing a collection
    /// overwrites earlier entries at the same positions.
    ///
    /// # Errors
    ///
    /// Propagates [`PipelineError::Embedding`] and [`PipelineError::VectorStore`].
    async fn embed_and_store(
        &self,
        texts: &[&str],
        collection: &str,
    ) -> Result<usize, PipelineError> {
        if texts.is_empty() {
            return Ok(0);
        }

        let embeddings = self.tei.embed(texts).await?;
        self.qdrant.get_or_create(collection).await?;

        let ids: Vec<u64> = (0..texts.len() as u64).collect();
        self.qdrant
            .add(collection, &ids, texts, &embeddings)
            .await?;

        tracing::info!(collection, count = texts.len(), "stored documents");
        Ok(texts.len())
    }
}
