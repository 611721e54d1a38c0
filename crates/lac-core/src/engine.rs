//! # Lexical Analysis Engine
//!
//! [`Lac`] ties the pipeline together: tokenize queries, map tokens to ids,
//! run the tagger (and the rank model in rank mode), resolve tag ids to
//! labels, apply the user dictionary, decode words and merge rank scores.
//!
//! An instance is single-threaded and keeps reusable scratch buffers. For
//! concurrent use, [`Lac::fork`] creates a sibling that shares the
//! dictionaries and user dictionary but owns its own buffers and predictor
//! handles.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::config::LacConfig;
use crate::decode::{decode, BoundaryRule, Customization, OffsetTable, RankMerger, TagOverlay};
use crate::dict::Resources;
use crate::error::{LacError, Result};
use crate::predictor::{LexiconPredictor, RankPredictor, TagPredictor};
use crate::tokenizer::{Token, Tokenizer};
use crate::types::Word;

/// Per-sequence outcome of a batch call.
pub type SequenceResult = Result<Vec<Word>>;

/// Lexical analysis worker.
pub struct Lac {
    resources: Arc<Resources>,
    custom: Option<Arc<dyn TagOverlay>>,
    predictor: Box<dyn TagPredictor>,
    rank_predictor: Option<Box<dyn RankPredictor>>,
    merger: RankMerger,
    tokenizer: Tokenizer,

    // Scratch, rebuilt on every call.
    offsets: OffsetTable,
    seq_tokens: Vec<Vec<Token>>,
    input_ids: Vec<i64>,
}

impl Lac {
    /// Create a worker from shared dictionaries and a tagger.
    pub fn new(resources: Arc<Resources>, predictor: Box<dyn TagPredictor>) -> Self {
        Self {
            resources,
            custom: None,
            predictor,
            rank_predictor: None,
            merger: RankMerger::default(),
            tokenizer: Tokenizer::new(),
            offsets: OffsetTable::new(),
            seq_tokens: Vec::new(),
            input_ids: Vec::new(),
        }
    }

    /// Load dictionaries, the lexicon tagger and the optional user
    /// dictionary described by `config`.
    pub fn from_config(config: &LacConfig) -> Result<Self> {
        let resources = Arc::new(Resources::load(config)?);
        let predictor = LexiconPredictor::from_file(
            config.lexicon_path(),
            &resources,
            &config.fallback_category,
        )?;

        let mut lac =
            Self::new(resources, Box::new(predictor)).with_boundary_rule(config.boundary_rule);
        if let Some(path) = &config.user_dict {
            lac.load_customization(path)?;
        }
        Ok(lac)
    }

    /// Set the boundary rule used when merging rank scores.
    pub fn with_boundary_rule(mut self, rule: BoundaryRule) -> Self {
        self.merger = RankMerger::new(rule);
        self
    }

    /// The shared dictionaries.
    pub fn resources(&self) -> &Arc<Resources> {
        &self.resources
    }

    /// Load a user dictionary file and apply it to every later call.
    ///
    /// Replaces any previously loaded dictionary on this worker only; forks
    /// made earlier keep the one they were created with.
    pub fn load_customization(&mut self, path: impl AsRef<Path>) -> Result<()> {
        let custom = Customization::from_file(path)?;
        self.set_overlay(Arc::new(custom));
        Ok(())
    }

    /// Install any overlay implementation.
    pub fn set_overlay(&mut self, overlay: Arc<dyn TagOverlay>) {
        self.custom = Some(overlay);
    }

    /// Attach a rank model, enabling the `run_rank*` calls.
    pub fn enable_rank_mode(&mut self, predictor: Box<dyn RankPredictor>) {
        self.rank_predictor = Some(predictor);
    }

    pub fn is_rank_mode(&self) -> bool {
        self.rank_predictor.is_some()
    }

    /// A sibling worker for another thread.
    ///
    /// Dictionaries and the user dictionary are shared by reference; the
    /// predictors are forked and scratch buffers start empty.
    pub fn fork(&self) -> Result<Self> {
        let rank_predictor = match &self.rank_predictor {
            Some(p) => Some(p.fork()?),
            None => None,
        };
        Ok(Self {
            resources: Arc::clone(&self.resources),
            custom: self.custom.clone(),
            predictor: self.predictor.fork()?,
            rank_predictor,
            merger: self.merger,
            tokenizer: Tokenizer::new(),
            offsets: OffsetTable::new(),
            seq_tokens: Vec::new(),
            input_ids: Vec::new(),
        })
    }

    /// Analyze one query.
    pub fn run(&mut self, query: &str) -> Result<Vec<Word>> {
        first(self.run_batch(&[query])?)
    }

    /// Analyze a batch of queries.
    ///
    /// The outer error is fatal for the whole batch (inconsistent predictor
    /// output); inner errors affect only their own sequence.
    pub fn run_batch<S: AsRef<str>>(&mut self, queries: &[S]) -> Result<Vec<SequenceResult>> {
        self.run_inner(queries, false)
    }

    /// Analyze one query and attach rank scores.
    pub fn run_rank(&mut self, query: &str) -> Result<Vec<Word>> {
        first(self.run_rank_batch(&[query])?)
    }

    /// Analyze a batch of queries and attach rank scores.
    ///
    /// Fails with [`LacError::RankModeDisabled`] if no rank model is attached.
    pub fn run_rank_batch<S: AsRef<str>>(&mut self, queries: &[S]) -> Result<Vec<SequenceResult>> {
        if self.rank_predictor.is_none() {
            return Err(LacError::RankModeDisabled);
        }
        self.run_inner(queries, true)
    }

    fn run_inner<S: AsRef<str>>(&mut self, queries: &[S], rank: bool) -> Result<Vec<SequenceResult>> {
        self.feed(queries);

        let tag_ids = self.predictor.predict(&self.input_ids, &self.offsets)?;
        self.offsets.check_flat("predicted tags", tag_ids.len())?;

        let scores = match self.rank_predictor.as_mut() {
            Some(rank_predictor) if rank => {
                let raw = rank_predictor.predict(&self.input_ids, &tag_ids, &self.offsets)?;
                self.offsets.check_flat("rank scores", raw.len())?;
                Some(to_scores(raw)?)
            }
            _ => None,
        };

        Ok(self
            .offsets
            .ranges()
            .enumerate()
            .map(|(sequence, range)| {
                let scores = scores.as_deref().map(|s| &s[range.clone()]);
                self.decode_sequence(sequence, &tag_ids[range], scores)
            })
            .collect())
    }

    /// Tokenize queries into the scratch buffers and build the id array.
    fn feed<S: AsRef<str>>(&mut self, queries: &[S]) {
        self.offsets.clear();
        self.input_ids.clear();
        self.seq_tokens.resize_with(queries.len(), Vec::new);

        for (query, tokens) in queries.iter().zip(self.seq_tokens.iter_mut()) {
            self.tokenizer.tokenize_into(query.as_ref(), tokens);
            self.offsets.push(tokens.len());
            let vocab = &self.resources.vocab;
            self.input_ids
                .extend(tokens.iter().map(|t| vocab.id_of(&t.text)));
        }
        debug!(
            batch = queries.len(),
            tokens = self.offsets.total(),
            "fed batch"
        );
    }

    fn decode_sequence(
        &self,
        sequence: usize,
        tag_ids: &[i64],
        scores: Option<&[u32]>,
    ) -> SequenceResult {
        let tokens = self
            .seq_tokens
            .get(sequence)
            .ok_or(LacError::IndexOutOfRange {
                index: sequence,
                len: self.seq_tokens.len(),
            })?;
        let labels = self.resources.labels.resolve_sequence(tag_ids, sequence)?;

        let mut words = match &self.custom {
            Some(custom) => {
                let mut adjusted = labels.clone();
                custom.apply(tokens, &mut adjusted);
                decode(tokens, &adjusted)?
            }
            None => decode(tokens, &labels)?,
        };

        if let Some(scores) = scores {
            // Scores follow the tagger's own boundaries, not the overridden ones.
            let report = self.merger.merge(&labels, scores, &mut words)?;
            if let Some(shortfall) = report.shortfall(sequence) {
                warn!(%shortfall, "trailing words left unranked");
            }
        }
        Ok(words)
    }
}

fn first(mut results: Vec<SequenceResult>) -> Result<Vec<Word>> {
    if results.is_empty() {
        return Err(LacError::IndexOutOfRange { index: 0, len: 0 });
    }
    results.swap_remove(0)
}

fn to_scores(raw: Vec<i64>) -> Result<Vec<u32>> {
    raw.into_iter()
        .enumerate()
        .map(|(i, score)| {
            u32::try_from(score).map_err(|_| {
                LacError::InferenceError(format!("rank score {score} at flat index {i} is out of range"))
            })
        })
        .collect()
}
