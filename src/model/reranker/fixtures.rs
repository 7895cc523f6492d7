//! Tiny randomly initialised checkpoints written to a temp dir.

use candle_core::{DType, Device, Tensor};
use candle_nn::{VarBuilder, VarMap};
use candle_transformers::models::{bert, xlm_roberta};
use serde_json::{Value, json};
use std::path::Path;
use tempfile::TempDir;
use tokenizers::Tokenizer;

use crate::model::HeadKind;

const WORDS: [&str; 20] = [
    "what", "is", "rust", "a", "systems", "language", "paris", "weather", "bread", "recipe",
    "the", "tree", "binary", "in", "fast", "safe", "memory", "panda", "bamboo", "eats",
];

pub const MAX_POSITION_EMBEDDINGS: usize = 40;

pub struct Checkpoint {
    pub dir: TempDir,
    pub config: Value,
}

impl Checkpoint {
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn with_model_max_length(self, model_max_length: Value) -> Self {
        let tokenizer_config = json!({ "model_max_length": model_max_length });
        std::fs::write(
            self.path().join("tokenizer_config.json"),
            tokenizer_config.to_string(),
        )
        .expect("write tokenizer_config.json");
        self
    }

    pub fn with_model_type(self, model_type: &str) -> Self {
        let mut config = self.config.clone();
        config["model_type"] = json!(model_type);
        std::fs::write(self.path().join("config.json"), config.to_string())
            .expect("write config.json");
        Self { config, ..self }
    }

    /// Scores each pair on its own, unpadded, with candle's XLM-RoBERTa classifier.
    pub fn reference_xlm_roberta_scores(&self, query: &str, documents: &[String]) -> Vec<f32> {
        let device = Device::Cpu;
        let config: xlm_roberta::Config =
            serde_json::from_value(self.config.clone()).expect("xlm-roberta config");
        let tensors = candle_core::safetensors::load(self.path().join("model.safetensors"), &device)
            .expect("load safetensors");
        let vb = VarBuilder::from_tensors(tensors, DType::F32, &device);
        let model = xlm_roberta::XLMRobertaForSequenceClassification::new(1, &config, vb)
            .expect("reference model");

        let tokenizer =
            Tokenizer::from_file(self.path().join("tokenizer.json")).expect("tokenizer");

        documents
            .iter()
            .map(|document| {
                let encoding = tokenizer
                    .encode((query, document.as_str()), true)
                    .expect("encode");
                let row = |ids: &[u32]| {
                    Tensor::new(ids, &device)
                        .and_then(|t| t.unsqueeze(0))
                        .expect("tensor")
                };
                let logits = model
                    .forward(
                        &row(encoding.get_ids()),
                        &row(encoding.get_attention_mask()),
                        &row(encoding.get_type_ids()),
                    )
                    .expect("reference forward");
                logits.flatten_all().expect("flatten").to_vec1::<f32>().expect("vec")[0]
            })
            .collect()
    }
}

fn base_config(model_type: &str, pad_token_id: u32, type_vocab_size: usize, vocab: usize) -> Value {
    json!({
        "model_type": model_type,
        "vocab_size": vocab,
        "hidden_size": 16,
        "num_hidden_layers": 2,
        "num_attention_heads": 2,
        "intermediate_size": 32,
        "hidden_act": "gelu",
        "hidden_dropout_prob": 0.0,
        "attention_probs_dropout_prob": 0.0,
        "max_position_embeddings": MAX_POSITION_EMBEDDINGS,
        "type_vocab_size": type_vocab_size,
        "initializer_range": 0.02,
        "layer_norm_eps": 1e-5,
        "pad_token_id": pad_token_id,
        "position_embedding_type": "absolute",
    })
}

fn vocab(specials: &[&str]) -> serde_json::Map<String, Value> {
    specials
        .iter()
        .chain(WORDS.iter())
        .enumerate()
        .map(|(id, token)| (token.to_string(), json!(id)))
        .collect()
}

fn tokenizer_json(vocab: serde_json::Map<String, Value>, unk: &str, post_processor: Value) -> Value {
    json!({
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": { "type": "Lowercase" },
        "pre_tokenizer": { "type": "Whitespace" },
        "post_processor": post_processor,
        "decoder": null,
        "model": { "type": "WordLevel", "vocab": vocab, "unk_token": unk },
    })
}

/// Replaces every variable with N(0, 0.5) noise so no layer is degenerate.
fn randomize(varmap: &VarMap) {
    for var in varmap.all_vars() {
        let noise = Tensor::randn(0f32, 0.5, var.dims().to_vec(), &Device::Cpu).expect("randn");
        var.set(&noise).expect("set var");
    }
}

fn write_checkpoint(config: Value, tokenizer: Value, varmap: &VarMap) -> Checkpoint {
    let dir = TempDir::new().expect("temp dir");
    randomize(varmap);
    varmap
        .save(dir.path().join("model.safetensors"))
        .expect("save weights");
    std::fs::write(dir.path().join("config.json"), config.to_string()).expect("write config");
    std::fs::write(dir.path().join("tokenizer.json"), tokenizer.to_string())
        .expect("write tokenizer");
    Checkpoint { dir, config }
}

/// BERT cross-encoder under the `bert.` prefix with the requested head.
pub fn bert(head: HeadKind) -> Checkpoint {
    let specials = ["[PAD]", "[UNK]", "[CLS]", "[SEP]"];
    let config = base_config("bert", 0, 2, specials.len() + WORDS.len());
    let bert_config: bert::Config = serde_json::from_value(config.clone()).expect("bert config");

    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    bert::BertModel::load(vb.pp("bert"), &bert_config).expect("bert vars");
    let hidden = bert_config.hidden_size;
    match head {
        HeadKind::Linear => {
            candle_nn::linear(hidden, 1, vb.pp("classifier")).expect("classifier");
        }
        HeadKind::Projected => {
            candle_nn::linear(hidden, hidden, vb.pp("classifier.dense")).expect("dense");
            candle_nn::linear(hidden, 1, vb.pp("classifier.out_proj")).expect("out_proj");
        }
    }

    let tokenizer = tokenizer_json(
        vocab(&specials),
        "[UNK]",
        json!({ "type": "BertProcessing", "sep": ["[SEP]", 3], "cls": ["[CLS]", 2] }),
    );
    write_checkpoint(config, tokenizer, &varmap)
}

/// XLM-RoBERTa cross-encoder laid out like `bge-reranker` exports.
pub fn xlm_roberta() -> Checkpoint {
    let specials = ["<s>", "<pad>", "</s>", "<unk>"];
    let config = base_config("xlm-roberta", 1, 1, specials.len() + WORDS.len());
    let xlm_config: xlm_roberta::Config =
        serde_json::from_value(config.clone()).expect("xlm-roberta config");

    let varmap = VarMap::new();
    let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
    xlm_roberta::XLMRobertaForSequenceClassification::new(1, &xlm_config, vb)
        .expect("xlm-roberta vars");

    let tokenizer = tokenizer_json(
        vocab(&specials),
        "<unk>",
        json!({
            "type": "RobertaProcessing",
            "sep": ["</s>", 2],
            "cls": ["<s>", 0],
            "trim_offsets": true,
            "add_prefix_space": false,
        }),
    );
    write_checkpoint(config, tokenizer, &varmap)
}
