use std::collections::BTreeMap;
use std::fmt::Display;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Where an interaction is in its lifecycle when a message applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum State {
    /// Before the interaction starts
    Pending,

    /// While the interaction is running
    Active,

    /// The interaction cannot be performed
    Unsupported,
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            State::Pending => write!(f, "pending"),
            State::Active => write!(f, "active"),
            State::Unsupported => write!(f, "unsupported"),
        }
    }
}

/// Severity of a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Display for Level {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Level::Info => write!(f, "info"),
            Level::Warning => write!(f, "warning"),
            Level::Error => write!(f, "error"),
        }
    }
}

/// One step of guidance shown to the person operating a keystore.
///
/// Vendor specific data (Hermit commands, Trezor button sequences, ...) lives in `extra`
/// and is flattened when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub state: State,
    pub level: Level,
    pub code: String,
    pub text: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Message {
    pub fn new(state: State, level: Level, code: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            state,
            level,
            code: code.into(),
            text: text.into(),
            version: None,
            extra: BTreeMap::new(),
        }
    }

    /// Restrict the message to a device model or firmware version
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    pub fn with_extra(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn extra(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }
}

/// Criteria used to select messages.
///
/// `state` and `level` must be equal, `code`, `text` and `version` are regular expressions
/// tested against the corresponding field (a missing version is tested as the empty string).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MessageFilter {
    state: Option<State>,
    level: Option<Level>,
    code: Option<String>,
    text: Option<String>,
    version: Option<String>,
}

impl MessageFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(mut self, state: State) -> Self {
        self.state = Some(state);
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.version = Some(version.into());
        self
    }

    /// Whether `message` satisfies every criterion of this filter
    pub fn matches(&self, message: &Message) -> bool {
        if let Some(state) = self.state {
            if message.state != state {
                return false;
            }
        }
        if let Some(level) = self.level {
            if message.level != level {
                return false;
            }
        }
        if let Some(code) = &self.code {
            if !pattern_matches(code, &message.code) {
                return false;
            }
        }
        if let Some(text) = &self.text {
            if !pattern_matches(text, &message.text) {
                return false;
            }
        }
        if let Some(version) = &self.version {
            if !pattern_matches(version, message.version.as_deref().unwrap_or("")) {
                return false;
            }
        }
        true
    }
}

fn pattern_matches(pattern: &str, value: &str) -> bool {
    match regex_lite::Regex::new(pattern) {
        Ok(re) => re.is_match(value),
        // not a valid expression, e.g. "Sign (testnet"
        Err(_) => value.contains(pattern),
    }
}
