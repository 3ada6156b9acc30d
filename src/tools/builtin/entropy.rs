use super::DRAFT_04;
use crate::tools::{Tool, ToolContext, ToolOutput};
use anyhow::Result;
use async_trait::async_trait;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::{json, Value};
use std::sync::Arc;

const DEFAULT_MIN: usize = 100;
const DEFAULT_MAX: usize = 200;
const MAX_WORDS: usize = 10_000;

const WORDS: &[&str] = &[
    "amber", "anchor", "apple", "arch", "arrow", "ash", "autumn", "badge", "bank", "barrel",
    "basket", "beacon", "bell", "berry", "birch", "blade", "blanket", "bloom", "bottle", "branch",
    "brass", "bread", "brick", "bridge", "brook", "brush", "bucket", "cabin", "candle", "canyon",
    "canvas", "castle", "cedar", "chalk", "charm", "chimney", "cider", "cliff", "clock", "cloud",
    "clover", "coal", "coast", "comet", "copper", "coral", "cotton", "crane", "creek", "crown",
    "crystal", "dawn", "desert", "dove", "drift", "drum", "dune", "dust", "eagle", "echo",
    "ember", "engine", "fable", "feather", "fern", "field", "flame", "flint", "forest", "fossil",
    "fountain", "frost", "garden", "garnet", "gate", "glacier", "glass", "globe", "granite", "grove",
    "harbor", "harvest", "hazel", "hollow", "honey", "horizon", "island", "ivory", "jade", "jasmine",
    "kettle", "lantern", "lark", "leaf", "ledger", "lemon", "lily", "linen", "marble", "meadow",
    "mirror", "mist", "moss", "mountain", "needle", "nest", "oak", "ocean", "olive", "orchard",
    "paper", "pearl", "pebble", "pepper", "pine", "plume", "pond", "quartz", "quill", "rain",
    "raven", "reed", "ribbon", "ridge", "river", "robin", "rope", "saddle", "sage", "salt",
    "sand", "shadow", "shell", "silk", "silver", "slate", "smoke", "snow", "spark", "spice",
    "spindle", "spring", "spruce", "stone", "storm", "straw", "stream", "summit", "thistle", "thread",
    "thunder", "timber", "torch", "tower", "trail", "tulip", "valley", "velvet", "violet", "wagon",
    "walnut", "willow", "window", "winter", "wool", "wren", "yarrow", "zephyr",
];

/// Numeric argument floored to a count; missing, zero or negative values fall back.
fn count_arg(args: &Value, key: &str, default: usize) -> usize {
    args.get(key)
        .and_then(Value::as_f64)
        .filter(|n| *n >= 1.0)
        .map(|n| (n.floor() as usize).min(MAX_WORDS))
        .unwrap_or(default)
}

/// Between `min + 1` and `max` random words (exactly `min + 1` when `max <= min`).
pub fn random_word_string<R: Rng + ?Sized>(rng: &mut R, min: usize, max: usize) -> String {
    let span = max.saturating_sub(min);
    let extra = if span > 0 { rng.gen_range(0..span) } else { 0 };
    let count = (min + extra + 1).min(MAX_WORDS);

    (0..count)
        .filter_map(|_| WORDS.choose(&mut *rng).copied())
        .collect::<Vec<_>>()
        .join(" ")
}

pub struct TextEntropyTool {
    ctx: Arc<ToolContext>,
}

impl TextEntropyTool {
    pub fn new(ctx: Arc<ToolContext>) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Tool for TextEntropyTool {
    fn name(&self) -> &str {
        "GetTextEntropy"
    }

    fn display_name(&self) -> &str {
        "Get Text Entropy"
    }

    fn description(&self) -> &str {
        "Generates a string of random tokens as a source of entropy."
    }

    fn parameters_schema(&self) -> Value {
        json!({
            "$schema": DRAFT_04,
            "type": "object",
            "properties": {
                "minTokens": {
                    "type": "number",
                    "description": "minimum number of tokens in the entropy string",
                    "default": DEFAULT_MIN
                },
                "maxTokens": {
                    "type": "number",
                    "description": "maximum number of tokens in the entropy string",
                    "default": DEFAULT_MAX
                }
            },
            "required": []
        })
    }

    async fn execute(&self, args: Value) -> Result<ToolOutput> {
        let min = count_arg(&args, "minTokens", DEFAULT_MIN);
        let max = count_arg(&args, "maxTokens", DEFAULT_MAX);
        let text = random_word_string(&mut rand::thread_rng(), min, max);
        Ok(text.into())
    }

    fn should_register(&self) -> bool {
        self.ctx.settings.enabled(self.name(), true)
    }
}
