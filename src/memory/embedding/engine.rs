//! Local semantic embeddings via nomic-embed-text on candle
//!
//! Weights are fetched from the HuggingFace Hub on first use and cached by
//! `hf-hub`. Documents and queries get the task prefixes the model was
//! trained with.

use crate::errors::{AgentError, Result};
use crate::memory::embedding::{l2_normalize, Embedder};
use anyhow::Context;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use candle_transformers::models::bert::{BertModel, Config};
use hf_hub::{api::sync::Api, Repo, RepoType};
use tokenizers::Tokenizer;

const MODEL_ID: &str = "nomic-ai/nomic-embed-text-v1.5";
const EMBEDDING_DIM: usize = 768;
const DOCUMENT_PREFIX: &str = "search_document: ";
const QUERY_PREFIX: &str = "search_query: ";

pub struct NomicEmbedder {
    model: BertModel,
    tokenizer: Tokenizer,
    device: Device,
}

impl NomicEmbedder {
    /// Download (or reuse cached) weights and build the model on CPU
    pub fn load() -> Result<Self> {
        Self::load_model().map_err(|e| AgentError::EmbeddingError(format!("{:#}", e)))
    }

    fn load_model() -> anyhow::Result<Self> {
        let device = Device::Cpu;

        let api = Api::new().context("Failed to create HuggingFace API client")?;
        let repo = api.repo(Repo::new(MODEL_ID.to_string(), RepoType::Model));

        let config_path = repo.get("config.json").context("Failed to download model config")?;
        let tokenizer_path = repo.get("tokenizer.json").context("Failed to download tokenizer")?;
        let weights_path = repo
            .get("model.safetensors")
            .context("Failed to download model weights")?;

        let config: Config = serde_json::from_str(
            &std::fs::read_to_string(config_path).context("Failed to read config file")?,
        )
        .context("Failed to parse model config")?;

        let tokenizer = Tokenizer::from_file(tokenizer_path)
            .map_err(|e| anyhow::anyhow!("Failed to load tokenizer: {}", e))?;

        // SAFETY: the safetensors file is owned by the hf-hub cache and not
        // modified while mapped.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .context("Failed to load model weights")?
        };
        let model = BertModel::load(vb, &config).context("Failed to create BERT model")?;

        tracing::info!(model = MODEL_ID, "embedding model loaded");

        Ok(Self {
            model,
            tokenizer,
            device,
        })
    }

    fn embed_prefixed(&self, prefix: &str, text: &str) -> Result<Vec<f32>> {
        let input = format!("{}{}", prefix, text);
        let mut vector = self
            .forward(&input)
            .map_err(|e| AgentError::EmbeddingError(format!("{:#}", e)))?;
        l2_normalize(&mut vector);
        Ok(vector)
    }

    /// Mean-pooled last hidden state for a single input
    fn forward(&self, input: &str) -> anyhow::Result<Vec<f32>> {
        let encoding = self
            .tokenizer
            .encode(input, true)
            .map_err(|e| anyhow::anyhow!("Tokenization failed: {}", e))?;

        let ids = encoding.get_ids().to_vec();
        let mask = encoding.get_attention_mask().to_vec();
        let len = ids.len();

        let token_ids = Tensor::from_vec(ids, (1, len), &self.device)?;
        let attention_mask = Tensor::from_vec(mask, (1, len), &self.device)?;
        let token_type_ids = token_ids.zeros_like()?;

        let hidden = self
            .model
            .forward(&token_ids, &token_type_ids, Some(&attention_mask))?;

        let mask = attention_mask
            .unsqueeze(2)?
            .expand(hidden.shape())?
            .to_dtype(hidden.dtype())?;
        let summed = (hidden * &mask)?.sum(1)?;
        let counts = mask.sum(1)?.clamp(1e-9, f64::MAX)?;
        let pooled = summed.broadcast_div(&counts)?;

        let mut rows = pooled.to_vec2::<f32>()?;
        rows.pop().context("model returned no embedding")
    }
}

impl Embedder for NomicEmbedder {
    fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_prefixed("", text)
    }

    fn embed_document(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_prefixed(DOCUMENT_PREFIX, text)
    }

    fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_prefixed(QUERY_PREFIX, text)
    }

    fn dimension(&self) -> usize {
        EMBEDDING_DIM
    }
}
