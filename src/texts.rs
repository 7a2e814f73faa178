use include_dir::{include_dir, Dir};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use serde_json::from_str;
use std::collections::HashMap;

use crate::error::CorpusError;
use crate::session::Difficulty;

static TEXTS_DIR: Dir = include_dir!("$CARGO_MANIFEST_DIR/src/texts");

/// One difficulty tier as stored on disk
#[derive(Deserialize, Clone, Debug)]
pub struct TextTier {
    pub name: String,
    pub version: u32,
    pub texts: Vec<String>,
}

/// Static passages keyed by difficulty
#[derive(Clone, Debug)]
pub struct TextCorpus {
    tiers: HashMap<Difficulty, TextTier>,
}

impl TextCorpus {
    /// Load the tiers compiled into the binary
    pub fn embedded() -> Result<Self, CorpusError> {
        let mut tiers = HashMap::new();
        for difficulty in Difficulty::ALL {
            tiers.insert(difficulty, read_tier(difficulty)?);
        }
        Ok(Self { tiers })
    }

    pub fn tier(&self, difficulty: Difficulty) -> Option<&TextTier> {
        self.tiers.get(&difficulty)
    }

    pub fn random_text(&self, difficulty: Difficulty) -> &str {
        self.random_text_with(difficulty, &mut rand::thread_rng())
    }

    pub fn random_text_with<R: Rng + ?Sized>(&self, difficulty: Difficulty, rng: &mut R) -> &str {
        // tiers are validated non-empty at load
        self.tiers
            .get(&difficulty)
            .and_then(|tier| tier.texts.choose(rng))
            .map(String::as_str)
            .unwrap_or_default()
    }
}

fn read_tier(difficulty: Difficulty) -> Result<TextTier, CorpusError> {
    let file_name = format!("{}.json", difficulty.key());
    let file = TEXTS_DIR
        .get_file(&file_name)
        .ok_or_else(|| CorpusError::MissingTier(file_name.clone()))?;
    let contents = file
        .contents_utf8()
        .ok_or_else(|| CorpusError::NotUtf8(file_name.clone()))?;
    parse_tier(difficulty, contents)
}

fn parse_tier(difficulty: Difficulty, json: &str) -> Result<TextTier, CorpusError> {
    let mut tier: TextTier = from_str(json)?;
    tier.texts.retain(|t| !t.is_empty());
    if tier.texts.is_empty() {
        return Err(CorpusError::EmptyTier(difficulty));
    }
    Ok(tier)
}
