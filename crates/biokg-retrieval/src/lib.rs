//! biokg-retrieval: schema-constrained path retrieval
//!
//! Given a natural-language question and a typed biomedical graph, returns a
//! small, explainable set of ranked paths for downstream prompt building.
//!
//! ## Pipeline
//!
//! 1. **Keywords**: [`KeywordExtractor`] (default [`StopwordExtractor`])
//! 2. **Entity resolution**: tiered token-to-node linking ([`EntityResolver`])
//! 3. **Intent classification**: rule table to [`SchemaConfig`]
//!    (allow/deny relations, plus one [`PathTarget`] per matched rule with
//!    its end kind, hop limit and structural constraints)
//! 4. **Core lock**: anchor selection ([`select_anchors`])
//! 5. **Path search**: bounded, stack-based, simple paths ([`PathFinder`])
//! 6. **Ranking**: weighted factors plus an end-node diversity bonus ([`PathRanker`])
//! 7. **Fallback**: one proxy schema when nothing matched ([`plan_fallback`])
//! 8. **Assembly**: [`RetrievalResult`] with alternating node/edge paths
//!
//! ## Example
//!
//! ```rust,ignore
//! let engine = RetrievalEngine::new(Arc::new(graph));
//! let result = engine.retrieve("What genes covary with BRCA1?");
//! println!("{}", result.summary);
//! ```
//!
//! Retrieval never fails: degraded states are reported through
//! [`RetrievalOutcome`] and the summary string.

pub mod anchors;
pub mod assemble;
mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod fallback;
pub mod intent;
pub mod keywords;
pub mod lexicon;
pub mod paths;
pub mod ranking;
pub mod resolver;
pub mod schema;

pub use anchors::{select_anchors, Anchor};
pub use assemble::{PathElement, RankedPathRecord, RetrievalOutcome, RetrievalResult};
pub use config::RetrievalConfig;
pub use engine::RetrievalEngine;
pub use error::RetrievalError;
pub use fallback::{plan_fallback, FallbackPlan};
pub use intent::{standard_rules, IntentClassifier, IntentRule};
pub use keywords::{KeywordExtractor, StopwordExtractor};
pub use paths::{CandidatePath, PathFinder};
pub use ranking::{PathRanker, ScoreFactors, ScoredPath};
pub use resolver::{EntityResolver, MatchTier, Resolution, ResolvedEntities};
pub use schema::{Constraint, EndKind, IntentTag, PathTarget, SchemaConfig};
