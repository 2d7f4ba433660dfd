/*!
 * Token counting for chunk sizing.
 *
 * The chunker only needs a count per line, so counting sits behind the
 * [`TokenCounter`] trait. The default counter uses the BPE encoding of the
 * configured OpenAI model.
 */

use anyhow::{anyhow, Result};
use std::fmt;
use tiktoken_rs::CoreBPE;

/// Counts tokens in a piece of text
pub trait TokenCounter: Send + Sync {
    /// Number of tokens `text` encodes to
    fn count_tokens(&self, text: &str) -> usize;
}

impl<F> TokenCounter for F
where
    F: Fn(&str) -> usize + Send + Sync,
{
    fn count_tokens(&self, text: &str) -> usize {
        self(text)
    }
}

/// Token counter backed by a tiktoken encoding
pub struct TiktokenCounter {
    bpe: CoreBPE,
    model: String,
}

impl TiktokenCounter {
    /// Load the encoding used by `model`
    pub fn for_model(model: &str) -> Result<Self> {
        let bpe = tiktoken_rs::get_bpe_from_model(model)
            .map_err(|e| anyhow!("No tokenizer available for model {}: {}", model, e))?;
        Ok(Self {
            bpe,
            model: model.to_string(),
        })
    }

    /// Load the `cl100k_base` encoding shared by the GPT-3.5/GPT-4 family
    pub fn cl100k() -> Result<Self> {
        let bpe = tiktoken_rs::cl100k_base().map_err(|e| anyhow!("Failed to load cl100k_base: {}", e))?;
        Ok(Self {
            bpe,
            model: "cl100k_base".to_string(),
        })
    }

    /// Model whose encoding is used
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl fmt::Debug for TiktokenCounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TiktokenCounter").field("model", &self.model).finish()
    }
}

impl TokenCounter for TiktokenCounter {
    fn count_tokens(&self, text: &str) -> usize {
        self.bpe.encode_with_special_tokens(text).len()
    }
}

/// Whitespace word count, a rough offline stand-in for a real encoding
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceTokenCounter;

impl TokenCounter for WhitespaceTokenCounter {
    fn count_tokens(&self, text: &str) -> usize {
        text.split_whitespace().count()
    }
}
