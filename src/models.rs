use serde::Serialize;

/// `created` value reported for every model in the listing. The upstream
/// catalog carries no per-model timestamps, so a fixed constant keeps the
/// listing stable across restarts.
pub const MODEL_CREATED: i64 = 1752371050;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Driver {
    Deepseek,
    Xai,
    OpenaiCompletion,
    Claude,
    Mistral,
}

impl Driver {
    /// Wire tag used in the upstream envelope.
    pub fn as_str(&self) -> &'static str {
        match self {
            Driver::Deepseek => "deepseek",
            Driver::Xai => "xai",
            Driver::OpenaiCompletion => "openai-completion",
            Driver::Claude => "claude",
            Driver::Mistral => "mistral",
        }
    }

    /// Resolve a model id to its backend driver. Unknown ids fall back to
    /// the generic OpenAI completion driver rather than failing.
    pub fn resolve(model: &str) -> Driver {
        if DEEPSEEK_MODELS.contains(&model) {
            Driver::Deepseek
        } else if XAI_MODELS.contains(&model) {
            Driver::Xai
        } else if CLAUDE_MODELS.contains(&model) {
            Driver::Claude
        } else if MISTRAL_MODELS.contains(&model) {
            Driver::Mistral
        } else {
            Driver::OpenaiCompletion
        }
    }
}

pub const DEEPSEEK_MODELS: &[&str] = &[
    "deepseek-chat",
    "deepseek-reasoner",
    "deepseek-v3",
    "deepseek-r1-0528",
];

pub const XAI_MODELS: &[&str] = &["grok-beta", "grok-3-mini"];

pub const OPENAI_MODELS: &[&str] = &[
    "gpt-4.1-nano",
    "gpt-4o-mini",
    "o1",
    "o1-mini",
    "o1-pro",
    "o4-mini",
    "gpt-4.1",
    "gpt-4.1-mini",
    "gpt-4.1-nano",
    "gpt-4.5-preview",
];

pub const CLAUDE_MODELS: &[&str] = &[
    "claude-sonnet-4-20250514",
    "claude-opus-4-20250514",
    "claude-3-7-sonnet-latest",
    "claude-3-5-sonnet-latest",
];

pub const MISTRAL_MODELS: &[&str] = &["mistral-large-latest", "codestral-latest"];

#[derive(Debug, Clone, Copy)]
pub struct ModelEntry {
    pub id: &'static str,
    pub driver: Driver,
    pub owned_by: &'static str,
}

/// Flatten the static tables in listing order.
pub fn all_models() -> Vec<ModelEntry> {
    let categories: [(&[&str], Driver, &str); 5] = [
        (DEEPSEEK_MODELS, Driver::Deepseek, "deepseek"),
        (XAI_MODELS, Driver::Xai, "xai"),
        (OPENAI_MODELS, Driver::OpenaiCompletion, "openai"),
        (CLAUDE_MODELS, Driver::Claude, "anthropic"),
        (MISTRAL_MODELS, Driver::Mistral, "mistral"),
    ];
    let mut out = Vec::new();
    for (ids, driver, owned_by) in categories {
        for id in ids {
            out.push(ModelEntry {
                id,
                driver,
                owned_by,
            });
        }
    }
    out
}
