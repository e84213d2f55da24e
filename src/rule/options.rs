//! Option resolution for the yoda rule
//!
//! The raw configuration is a primary order token (`"always"` or
//! `"never"`) plus an options object. Validation is strict: unknown
//! keys, out-of-set enum values, and type mismatches are errors, never
//! silently defaulted. Resolution happens once; the resulting
//! `Settings` are immutable for the whole pass.

use serde::Deserialize;

/// Which operand order the rule enforces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum OrderMode {
    /// Literal first: `5 === x`
    #[serde(rename = "always")]
    Yoda,
    /// Variable first: `x === 5`
    #[serde(rename = "never")]
    Normal,
}

impl OrderMode {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "always" => Some(OrderMode::Yoda),
            "never" => Some(OrderMode::Normal),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderMode::Yoda => "always",
            OrderMode::Normal => "never",
        }
    }
}

/// How range idioms (`lo <= x && x <= hi`) are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum RangeMode {
    /// No range detection; each sub-comparison is checked independently
    #[serde(rename = "no-special")]
    NoSpecial,
    /// Range-shaped expressions are excluded from checking entirely
    #[serde(rename = "ignore")]
    Ignore,
    /// Enforce the canonical range form for the configured order
    #[serde(rename = "enforce")]
    #[default]
    Enforce,
}

/// Which surface form of the not-in-range idiom is canonical
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
pub enum NotInRangeMode {
    /// Never check the negated idiom
    #[serde(rename = "ignore")]
    Ignore,
    /// Prefer `x < lo || x > hi`
    #[serde(rename = "or")]
    #[default]
    Or,
    /// Prefer `!(lo <= x && x <= hi)`
    #[serde(rename = "negateAnd")]
    NegateAnd,
}

fn default_true() -> bool {
    true
}

/// Raw options object, validated strictly against the schema
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawOptions {
    #[serde(default = "default_true")]
    pub equality: bool,
    #[serde(default = "default_true")]
    pub inequality: bool,
    #[serde(default = "default_true")]
    pub comparison: bool,
    #[serde(default)]
    pub range: RangeMode,
    #[serde(default, rename = "notInRange")]
    pub not_in_range: NotInRangeMode,
    #[serde(default, rename = "onlyIfs")]
    pub only_ifs: bool,
    #[serde(default, rename = "requireParenthesizedRange")]
    pub require_parenthesized_range: bool,
}

impl Default for RawOptions {
    fn default() -> Self {
        Self {
            equality: true,
            inequality: true,
            comparison: true,
            range: RangeMode::default(),
            not_in_range: NotInRangeMode::default(),
            only_ifs: false,
            require_parenthesized_range: false,
        }
    }
}

/// Error during option resolution
#[derive(Debug, Clone)]
pub enum OptionsError {
    /// The primary order token was not `"always"` or `"never"`
    InvalidOrder(String),
    /// The options object failed validation (unknown key, bad enum
    /// value, or type mismatch)
    Invalid(String),
}

impl std::fmt::Display for OptionsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidOrder(token) => {
                write!(
                    f,
                    "invalid order '{}': expected 'always' or 'never'",
                    token
                )
            }
            Self::Invalid(msg) => write!(f, "invalid options: {}", msg),
        }
    }
}

impl std::error::Error for OptionsError {}

/// Resolved, immutable rule settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settings {
    pub order: OrderMode,
    pub equality: bool,
    pub inequality: bool,
    pub comparison: bool,
    pub range: RangeMode,
    pub not_in_range: NotInRangeMode,
    pub only_ifs: bool,
    pub require_parenthesized_range: bool,
}

impl Settings {
    /// Settings with all defaults for the given order
    pub fn new(order: OrderMode) -> Self {
        Self::from_raw(order, RawOptions::default())
    }

    fn from_raw(order: OrderMode, raw: RawOptions) -> Self {
        Self {
            order,
            equality: raw.equality,
            inequality: raw.inequality,
            comparison: raw.comparison,
            range: raw.range,
            not_in_range: raw.not_in_range,
            only_ifs: raw.only_ifs,
            require_parenthesized_range: raw.require_parenthesized_range,
        }
    }

    /// Resolve raw configuration into settings, failing fast on any
    /// malformed value
    pub fn resolve(
        order: &str,
        options: Option<&serde_json::Value>,
    ) -> Result<Self, OptionsError> {
        let order = OrderMode::parse(order)
            .ok_or_else(|| OptionsError::InvalidOrder(order.to_string()))?;

        let raw = match options {
            Some(value) => serde_json::from_value::<RawOptions>(value.clone())
                .map_err(|e| OptionsError::Invalid(e.to_string()))?,
            None => RawOptions::default(),
        };

        Ok(Self::from_raw(order, raw))
    }
}
