//! Pretrained sentiment backend on candle.
//!
//! Loads an SST-2 style BERT sequence classifier from the Hugging Face hub
//! (config + weights + tokenizer), runs the whole review batch through one
//! forward pass, and reduces the 2-class head to a positivity score. CPU
//! inference only; the model is loaded once per process by the backend
//! selector and reused across requests.

use async_trait::async_trait;
use candle_core::{D, Device, Tensor};
use candle_nn::{Linear, Module, VarBuilder, ops::softmax};
use candle_transformers::models::bert::{BertModel, Config, DTYPE};
use hf_hub::{Repo, RepoType, api::tokio::Api};
use tokenizers::Tokenizer;

use super::SentimentBackend;
use crate::Error;

/// Input truncation bound; BERT positional embeddings cap out here.
const MAX_TOKENS: usize = 512;

/// SST-2 BERT classifier: encoder, pooler, and a 2-class head.
pub struct BertSst2Backend {
    model: BertModel,
    pooler: Linear,
    classifier: Linear,
    tokenizer: Tokenizer,
    device: Device,
}

impl BertSst2Backend {
    /// Download (or reuse the local hub cache of) the model and assemble it.
    pub async fn load(model_id: &str) -> Result<Self, Error> {
        let api = Api::new().map_err(|e| Error::Inference(format!("hub api init failed: {e}")))?;
        let repo = api.repo(Repo::with_revision(model_id.to_string(), RepoType::Model, "main".to_string()));

        let config_path = repo
            .get("config.json")
            .await
            .map_err(|e| Error::Inference(format!("config download failed: {e}")))?;
        let tokenizer_path = repo
            .get("tokenizer.json")
            .await
            .map_err(|e| Error::Inference(format!("tokenizer download failed: {e}")))?;

        // Prefer safetensors; older checkpoints only ship pytorch_model.bin.
        let weights_path = match repo.get("model.safetensors").await {
            Ok(path) => path,
            Err(_) => repo
                .get("pytorch_model.bin")
                .await
                .map_err(|e| Error::Inference(format!("weights download failed: {e}")))?,
        };

        let device = Device::Cpu;

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| Error::Inference(format!("config read failed: {e}")))?;
        let config: Config =
            serde_json::from_str(&config_str).map_err(|e| Error::Inference(format!("config parse failed: {e}")))?;

        let tokenizer = Tokenizer::from_file(&tokenizer_path)
            .map_err(|e| Error::Inference(format!("tokenizer load failed: {e}")))?;

        let vb = if weights_path.to_string_lossy().ends_with(".safetensors") {
            unsafe {
                VarBuilder::from_mmaped_safetensors(&[weights_path], DTYPE, &device)
                    .map_err(|e| Error::Inference(format!("weights load failed: {e}")))?
            }
        } else {
            VarBuilder::from_pth(weights_path, DTYPE, &device)
                .map_err(|e| Error::Inference(format!("weights load failed: {e}")))?
        };

        let model = BertModel::load(vb.clone(), &config)
            .map_err(|e| Error::Inference(format!("encoder load failed: {e}")))?;
        let pooler = candle_nn::linear(config.hidden_size, config.hidden_size, vb.pp("bert.pooler.dense"))
            .map_err(|e| Error::Inference(format!("pooler load failed: {e}")))?;
        let classifier = candle_nn::linear(config.hidden_size, 2, vb.pp("classifier"))
            .map_err(|e| Error::Inference(format!("classifier head load failed: {e}")))?;

        Ok(Self { model, pooler, classifier, tokenizer, device })
    }

    /// One padded forward pass over the whole batch.
    ///
    /// Returns P(positive) per input: softmax over the 2-class logits,
    /// index 1 being the positive class in SST-2 checkpoints.
    fn positive_probabilities(&self, texts: &[String]) -> Result<Vec<f32>, Error> {
        let encodings = self
            .tokenizer
            .encode_batch(texts.to_vec(), true)
            .map_err(|e| Error::Inference(format!("tokenization failed: {e}")))?;

        let truncated: Vec<Vec<u32>> = encodings
            .iter()
            .map(|enc| {
                let ids = enc.get_ids();
                ids[..ids.len().min(MAX_TOKENS)].to_vec()
            })
            .collect();

        let batch = truncated.len();
        let seq_len = truncated.iter().map(Vec::len).max().unwrap_or(1).max(1);

        let mut ids = Vec::with_capacity(batch * seq_len);
        let mut mask = Vec::with_capacity(batch * seq_len);
        for row in &truncated {
            ids.extend(row.iter().copied());
            ids.extend(std::iter::repeat(0u32).take(seq_len - row.len()));
            mask.extend(std::iter::repeat(1u32).take(row.len()));
            mask.extend(std::iter::repeat(0u32).take(seq_len - row.len()));
        }

        let token_ids = Tensor::from_vec(ids, (batch, seq_len), &self.device)
            .map_err(|e| Error::Inference(format!("input tensor failed: {e}")))?;
        let attention_mask = Tensor::from_vec(mask, (batch, seq_len), &self.device)
            .map_err(|e| Error::Inference(format!("mask tensor failed: {e}")))?;
        let token_type_ids = token_ids
            .zeros_like()
            .map_err(|e| Error::Inference(format!("type-id tensor failed: {e}")))?;

        let hidden = self
            .model
            .forward(&token_ids, &token_type_ids, Some(&attention_mask))
            .map_err(|e| Error::Inference(format!("forward pass failed: {e}")))?;

        // Classification uses the [CLS] position through the tanh pooler.
        let cls = hidden
            .narrow(1, 0, 1)
            .and_then(|t| t.squeeze(1))
            .map_err(|e| Error::Inference(format!("cls slice failed: {e}")))?;
        let pooled = self
            .pooler
            .forward(&cls)
            .and_then(|t| t.tanh())
            .map_err(|e| Error::Inference(format!("pooler failed: {e}")))?;
        let logits = self
            .classifier
            .forward(&pooled)
            .map_err(|e| Error::Inference(format!("classifier head failed: {e}")))?;
        let probs = softmax(&logits, D::Minus1).map_err(|e| Error::Inference(format!("softmax failed: {e}")))?;

        probs
            .narrow(1, 1, 1)
            .and_then(|t| t.squeeze(1))
            .and_then(|t| t.to_vec1::<f32>())
            .map_err(|e| Error::Inference(format!("probability readout failed: {e}")))
    }
}

#[async_trait]
impl SentimentBackend for BertSst2Backend {
    fn name(&self) -> &'static str {
        "bert-sst2"
    }

    async fn score_batch(&self, texts: &[String]) -> Result<Vec<f32>, Error> {
        self.positive_probabilities(texts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::label_for_score;
    use crate::review::Sentiment;

    #[tokio::test]
    #[ignore = "downloads model weights from the Hugging Face hub"]
    async fn test_load_and_score() {
        let backend = BertSst2Backend::load("textattack/bert-base-uncased-SST-2").await.unwrap();
        let texts = vec![
            "Absolutely love this, works perfectly.".to_string(),
            "Stopped working after two days, total waste.".to_string(),
        ];
        let scores = backend.score_batch(&texts).await.unwrap();
        assert_eq!(scores.len(), 2);
        assert_eq!(label_for_score(scores[0]), Sentiment::Positive);
        assert_eq!(label_for_score(scores[1]), Sentiment::Negative);
    }
}
