//! Sequence-classification cross-encoders with a single relevance logit.
//!
//! The architecture comes from `model_type` in `config.json`:
//! - `bert` (or absent): [`BertModel`] plus a linear or projected head
//! - `xlm-roberta` / `roberta`: [`XLMRobertaForSequenceClassification`]

use candle_core::{DType, Device, IndexOp, Module, Result, Tensor};
use candle_nn::{Linear, VarBuilder};
use candle_transformers::models::{bert, xlm_roberta};
use std::path::Path;

/// Encoder family of a checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Architecture {
    Bert,
    XlmRoberta,
}

impl Architecture {
    pub fn from_model_type(model_type: Option<&str>) -> Result<Self> {
        match model_type {
            None | Some("bert") => Ok(Self::Bert),
            Some("xlm-roberta") | Some("roberta") => Ok(Self::XlmRoberta),
            Some(other) => Err(candle_core::Error::Msg(format!(
                "unsupported model_type `{other}` (expected bert, roberta or xlm-roberta)"
            ))),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Bert => "bert",
            Self::XlmRoberta => "xlm-roberta",
        }
    }
}

/// Output head of a BERT checkpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeadKind {
    /// `classifier.{weight,bias}` on the first token.
    Linear,
    /// `classifier.dense` → tanh → `classifier.out_proj`.
    Projected,
}

enum BertHead {
    Linear(Linear),
    Projected { dense: Linear, out_proj: Linear },
}

impl BertHead {
    fn load(vb: VarBuilder, hidden_size: usize) -> Result<Self> {
        if vb.contains_tensor("classifier.out_proj.weight") {
            let head = vb.pp("classifier");
            let dense = candle_nn::linear(hidden_size, hidden_size, head.pp("dense"))?;
            let out_proj = candle_nn::linear(hidden_size, 1, head.pp("out_proj"))?;
            Ok(Self::Projected { dense, out_proj })
        } else {
            Ok(Self::Linear(candle_nn::linear(
                hidden_size,
                1,
                vb.pp("classifier"),
            )?))
        }
    }

    fn forward(&self, first_token: &Tensor) -> Result<Tensor> {
        match self {
            Self::Linear(classifier) => classifier.forward(first_token),
            Self::Projected { dense, out_proj } => {
                out_proj.forward(&dense.forward(first_token)?.tanh()?)
            }
        }
    }

    fn kind(&self) -> HeadKind {
        match self {
            Self::Linear(_) => HeadKind::Linear,
            Self::Projected { .. } => HeadKind::Projected,
        }
    }
}

enum Encoder {
    Bert { model: bert::BertModel, head: BertHead },
    XlmRoberta(xlm_roberta::XLMRobertaForSequenceClassification),
}

/// A loaded cross-encoder.
pub struct CrossEncoder {
    encoder: Encoder,
    architecture: Architecture,
    max_positions: usize,
}

impl std::fmt::Debug for CrossEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrossEncoder")
            .field("architecture", &self.architecture.label())
            .field("head", &self.head_kind())
            .field("max_positions", &self.max_positions)
            .finish()
    }
}

impl CrossEncoder {
    /// Loads `config.json` and memory-maps `model.safetensors` from `model_dir`.
    pub fn load<P: AsRef<Path>>(model_dir: P, device: &Device) -> Result<Self> {
        let model_dir = model_dir.as_ref();
        let raw = std::fs::read_to_string(model_dir.join("config.json"))?;
        let config: serde_json::Value = serde_json::from_str(&raw)
            .map_err(|e| candle_core::Error::Msg(format!("Failed to parse config: {e}")))?;
        let architecture =
            Architecture::from_model_type(config.get("model_type").and_then(|v| v.as_str()))?;

        let weights_path = model_dir.join("model.safetensors");
        // SAFETY: the weights file is not modified while the service runs.
        let vb =
            unsafe { VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)? };

        Self::from_var_builder(architecture, config, vb)
    }

    /// Builds the encoder for `architecture` from a parsed `config.json`.
    pub fn from_var_builder(
        architecture: Architecture,
        config: serde_json::Value,
        vb: VarBuilder,
    ) -> Result<Self> {
        let parse_error =
            |e: serde_json::Error| candle_core::Error::Msg(format!("Failed to parse config: {e}"));

        match architecture {
            Architecture::Bert => {
                let config: bert::Config = serde_json::from_value(config).map_err(parse_error)?;
                let model = if vb.contains_tensor("bert.embeddings.word_embeddings.weight") {
                    bert::BertModel::load(vb.pp("bert"), &config)?
                } else {
                    bert::BertModel::load(vb.clone(), &config)?
                };
                let head = BertHead::load(vb, config.hidden_size)?;

                Ok(Self {
                    encoder: Encoder::Bert { model, head },
                    architecture,
                    max_positions: config.max_position_embeddings,
                })
            }
            Architecture::XlmRoberta => {
                let config: xlm_roberta::Config =
                    serde_json::from_value(config).map_err(parse_error)?;
                let model =
                    xlm_roberta::XLMRobertaForSequenceClassification::new(1, &config, vb)?;
                // Positions start after the padding index.
                let offset = config.pad_token_id as usize + 1;

                Ok(Self {
                    encoder: Encoder::XlmRoberta(model),
                    architecture,
                    max_positions: config.max_position_embeddings.saturating_sub(offset),
                })
            }
        }
    }

    pub fn architecture(&self) -> Architecture {
        self.architecture
    }

    /// Classification head; XLM-RoBERTa checkpoints always use the projected form.
    pub fn head_kind(&self) -> HeadKind {
        match &self.encoder {
            Encoder::Bert { head, .. } => head.kind(),
            Encoder::XlmRoberta(_) => HeadKind::Projected,
        }
    }

    /// Longest token sequence the position embeddings can address.
    pub fn max_positions(&self) -> usize {
        self.max_positions
    }

    /// Returns logits shaped `[batch, 1]`.
    pub fn forward(
        &self,
        input_ids: &Tensor,
        token_type_ids: &Tensor,
        attention_mask: &Tensor,
    ) -> Result<Tensor> {
        match &self.encoder {
            Encoder::Bert { model, head } => {
                let hidden = model.forward(input_ids, token_type_ids, Some(attention_mask))?;
                head.forward(&hidden.i((.., 0, ..))?)
            }
            Encoder::XlmRoberta(model) => {
                model.forward(input_ids, attention_mask, token_type_ids)
            }
        }
    }
}
