//! Alignment configuration.
//!
//! Everything that influences an alignment run is carried explicitly in an
//! [`AlignConfig`] and handed to the engine; there is no process-wide state.

use std::path::Path;

use serde::{Deserialize, Serialize};

use nerpos_core::{NerPosError, Result};

use crate::similarity::DEFAULT_THRESHOLD;

/// Which dynamic program the engine runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlignMode {
    /// Each NER token pairs with at most one POS token.
    #[default]
    OneToOne,
    /// Each NER token may pair with 1..=`max_span` consecutive POS tokens.
    Span,
}

/// Runtime configuration for the aligner and the batch engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AlignConfig {
    pub mode: AlignMode,
    /// Minimum similarity for a one-to-one match. Default: 0.8.
    pub threshold: f64,
    /// Minimum similarity between a NER word and a joined POS span.
    /// Default: 0.8.
    pub span_threshold: f64,
    /// Longest POS run one NER token may claim in span mode. Default: 1.
    pub max_span: usize,
    /// Split NER tokens on punctuation before aligning. Default: false.
    pub split_ner: bool,
    /// Split POS tokens on punctuation before aligning. Default: false.
    pub split_pos: bool,
}

impl Default for AlignConfig {
    fn default() -> Self {
        Self {
            mode: AlignMode::OneToOne,
            threshold: DEFAULT_THRESHOLD,
            span_threshold: DEFAULT_THRESHOLD,
            max_span: 1,
            split_ner: false,
            split_pos: false,
        }
    }
}

impl AlignConfig {
    /// One-to-one alignment over the tokens as given.
    pub fn one_to_one() -> Self {
        Self::default()
    }

    /// Span alignment; the POS side is split on punctuation first so a
    /// single NER token can claim the resulting run of sub-tokens.
    pub fn span(max_span: usize) -> Self {
        Self {
            mode: AlignMode::Span,
            max_span,
            split_pos: true,
            ..Self::default()
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_span_threshold(mut self, span_threshold: f64) -> Self {
        self.span_threshold = span_threshold;
        self
    }

    pub fn with_split(mut self, split_ner: bool, split_pos: bool) -> Self {
        self.split_ner = split_ner;
        self.split_pos = split_pos;
        self
    }

    /// The threshold that applies to the configured mode.
    pub fn effective_threshold(&self) -> f64 {
        match self.mode {
            AlignMode::OneToOne => self.threshold,
            AlignMode::Span => self.span_threshold,
        }
    }

    /// Reject thresholds outside `[0, 1]` and a zero `max_span`.
    pub fn validate(&self) -> Result<()> {
        check_threshold("threshold", self.threshold)?;
        check_threshold("span_threshold", self.span_threshold)?;
        if self.max_span == 0 {
            return Err(NerPosError::InvalidConfig(
                "max_span must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Parse and validate a JSON configuration. Missing fields take their
    /// defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json_str(&data)
    }
}

fn check_threshold(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() || !(0.0..=1.0).contains(&value) {
        return Err(NerPosError::InvalidConfig(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )));
    }
    Ok(())
}
