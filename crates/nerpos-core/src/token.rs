use serde::{Deserialize, Serialize};

/// Tag carried by NER tokens that are not part of any entity.
pub const NO_ENTITY: &str = "O";

// ---------------------------------------------------------------------------
// Token trait
// ---------------------------------------------------------------------------

/// A surface word plus whatever annotation the producing tool attached to it.
///
/// The aligner only ever looks at [`Token::word`]; the remaining attributes
/// are opaque and travel along unchanged. [`Token::with_word`] is the shallow
/// copy used by the punctuation splitter: every attribute is duplicated and
/// only the surface form is replaced.
pub trait Token: Clone {
    fn word(&self) -> &str;

    fn with_word(&self, word: String) -> Self;
}

// ---------------------------------------------------------------------------
// NerToken
// ---------------------------------------------------------------------------

/// One line of a tab-delimited NER annotation: a word and its entity tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NerToken {
    pub word: String,
    /// Entity class, or [`NO_ENTITY`].
    pub tag: String,
}

impl NerToken {
    pub fn new(word: impl Into<String>, tag: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            tag: tag.into(),
        }
    }

    /// A token outside any entity.
    pub fn outside(word: impl Into<String>) -> Self {
        Self::new(word, NO_ENTITY)
    }

    pub fn is_entity(&self) -> bool {
        self.tag != NO_ENTITY
    }
}

impl Token for NerToken {
    fn word(&self) -> &str {
        &self.word
    }

    fn with_word(&self, word: String) -> Self {
        Self {
            word,
            tag: self.tag.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// PosToken
// ---------------------------------------------------------------------------

/// One token of a dependency-annotated (CoNLL-U style) sentence.
///
/// Every attribute is optional: the external parser leaves a field `None`
/// when the source marks it empty, and the record assembler substitutes its
/// null marker on output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PosToken {
    pub word: String,
    pub lemma: Option<String>,
    /// Universal part-of-speech tag.
    pub upos: Option<String>,
    /// Morphological features, e.g. `"Case=Nom|Number=Sing"`.
    pub feats: Option<String>,
    /// Index of the syntactic head within the sentence, kept verbatim.
    pub head: Option<String>,
    pub deprel: Option<String>,
    /// Enhanced (secondary) dependencies.
    pub deps: Option<String>,
    pub misc: Option<String>,
}

impl PosToken {
    /// A token with only its surface form set.
    pub fn new(word: impl Into<String>) -> Self {
        Self {
            word: word.into(),
            ..Self::default()
        }
    }

    pub fn with_lemma(mut self, lemma: impl Into<String>) -> Self {
        self.lemma = Some(lemma.into());
        self
    }

    pub fn with_upos(mut self, upos: impl Into<String>) -> Self {
        self.upos = Some(upos.into());
        self
    }

    pub fn with_feats(mut self, feats: impl Into<String>) -> Self {
        self.feats = Some(feats.into());
        self
    }

    pub fn with_head(mut self, head: impl Into<String>) -> Self {
        self.head = Some(head.into());
        self
    }

    pub fn with_deprel(mut self, deprel: impl Into<String>) -> Self {
        self.deprel = Some(deprel.into());
        self
    }

    pub fn with_deps(mut self, deps: impl Into<String>) -> Self {
        self.deps = Some(deps.into());
        self
    }

    pub fn with_misc(mut self, misc: impl Into<String>) -> Self {
        self.misc = Some(misc.into());
        self
    }
}

impl Token for PosToken {
    fn word(&self) -> &str {
        &self.word
    }

    fn with_word(&self, word: String) -> Self {
        Self {
            word,
            ..self.clone()
        }
    }
}

// ---------------------------------------------------------------------------
// SentencePair
// ---------------------------------------------------------------------------

/// Both annotations of one sentence, segmented by the caller.
///
/// This is the unit of work handed to the batch engine; sentences are
/// aligned independently of each other.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SentencePair {
    /// Source sentence identifier (`sent_id`), if the input carried one.
    pub id: Option<String>,
    pub ner: Vec<NerToken>,
    pub pos: Vec<PosToken>,
}

impl SentencePair {
    pub fn new(ner: Vec<NerToken>, pos: Vec<PosToken>) -> Self {
        Self { id: None, ner, pos }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
