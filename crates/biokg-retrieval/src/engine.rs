//! The long-lived retrieval context.
//!
//! One engine per loaded graph. It owns the rule tables, the name index and
//! the bounded caches; queries take `&self` and may run concurrently.

use biokg_graph::{GraphStore, NodeId};
use std::sync::Arc;
use tracing::{debug, info};

use crate::anchors::select_anchors;
use crate::assemble::{assemble_paths, summarize, RetrievalOutcome, RetrievalResult};
use crate::cache::BoundedCache;
use crate::config::RetrievalConfig;
use crate::error::Result;
use crate::fallback::plan_fallback;
use crate::intent::IntentClassifier;
use crate::keywords::{KeywordExtractor, StopwordExtractor};
use crate::paths::PathFinder;
use crate::ranking::{PathRanker, ScoredPath};
use crate::resolver::{EntityResolver, ResolvedEntities};
use crate::schema::SchemaConfig;

pub struct RetrievalEngine<G: GraphStore> {
    graph: Arc<G>,
    config: RetrievalConfig,
    extractor: Box<dyn KeywordExtractor>,
    classifier: IntentClassifier,
    resolver: EntityResolver,
    degrees: BoundedCache<NodeId, usize>,
}

impl<G: GraphStore> RetrievalEngine<G> {
    /// Engine with default configuration.
    pub fn new(graph: Arc<G>) -> Self {
        Self::build(graph, RetrievalConfig::default())
    }

    pub fn with_config(graph: Arc<G>, config: RetrievalConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(graph, config))
    }

    fn build(graph: Arc<G>, config: RetrievalConfig) -> Self {
        let resolver = EntityResolver::new(graph.as_ref(), &config);
        Self {
            degrees: BoundedCache::new(config.degree_cache_capacity),
            graph,
            config,
            extractor: Box::new(StopwordExtractor::new()),
            classifier: IntentClassifier::default(),
            resolver,
        }
    }

    pub fn extractor(mut self, extractor: impl KeywordExtractor + 'static) -> Self {
        self.extractor = Box::new(extractor);
        self
    }

    pub fn classifier(mut self, classifier: IntentClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn graph(&self) -> &G {
        &self.graph
    }

    pub fn config(&self) -> &RetrievalConfig {
        &self.config
    }

    // ========================================================================
    // Pipeline stages
    // ========================================================================

    /// Schema for a query, with any configured hop-limit override applied.
    pub fn classify(&self, query: &str) -> SchemaConfig {
        let schema = self.classifier.classify(query);
        match self.config.hop_limit_override {
            Some(hops) => schema.hop_limit(hops),
            None => schema,
        }
    }

    pub fn resolve(&self, tokens: &[String]) -> ResolvedEntities {
        self.resolver.resolve(self.graph.as_ref(), tokens)
    }

    /// Node degree, memoized.
    pub fn degree(&self, id: &str) -> usize {
        self.degrees
            .get_or_insert_with(NodeId::from(id), || self.graph.degree(id))
    }

    /// Path search plus ranking for one schema.
    pub fn search(&self, anchors: &[NodeId], schema: &SchemaConfig, query: &str) -> Vec<ScoredPath> {
        let candidates = PathFinder::new(self.graph.as_ref())
            .max_results_per_hop(self.config.max_results_per_hop)
            .find(anchors, schema);
        debug!(
            intent = %schema.intent(),
            candidates = candidates.len(),
            "ranking candidate paths"
        );
        PathRanker::new(|id: &str| self.degree(id))
            .top_k(self.config.top_k)
            .rank(candidates, query, schema)
    }

    // ========================================================================
    // Entry points
    // ========================================================================

    /// Run the full pipeline on a free-text query. Never fails.
    pub fn retrieve(&self, query: &str) -> RetrievalResult {
        let tokens = self.extractor.extract(query);
        self.retrieve_tokens(query, tokens)
    }

    /// As [`retrieve`](Self::retrieve), with tokens from an external extractor.
    pub fn retrieve_tokens(&self, query: &str, tokens: Vec<String>) -> RetrievalResult {
        let schema = self.classify(query);
        self.retrieve_with_schema(query, tokens, schema)
    }

    /// Skip classification and search under a caller-supplied schema.
    pub fn retrieve_with_schema(
        &self,
        query: &str,
        tokens: Vec<String>,
        schema: SchemaConfig,
    ) -> RetrievalResult {
        let resolved = self.resolve(&tokens);
        let anchors = select_anchors(&resolved, &schema, query, self.config.max_anchors);
        debug!(
            intent = %schema.intent_tag(),
            resolved = resolved.len(),
            anchors = anchors.len(),
            "selected anchors"
        );

        if anchors.is_empty() {
            let summary = summarize(&schema, RetrievalOutcome::NoAnchors, None, 0);
            return RetrievalResult {
                query: query.to_string(),
                intent_tag: schema.intent_tag(),
                schema,
                outcome: RetrievalOutcome::NoAnchors,
                fallback_applied: false,
                fallback_intent: None,
                tokens,
                resolved,
                anchors,
                paths: Vec::new(),
                summary,
            };
        }

        let anchor_ids: Vec<NodeId> = anchors.iter().map(|a| a.id.clone()).collect();
        let mut ranked = self.search(&anchor_ids, &schema, query);

        let mut fallback = None;
        if ranked.is_empty() && self.config.enable_fallback {
            if let Some(plan) = plan_fallback(&self.classifier, &schema, self.config.hop_limit_override) {
                info!(
                    primary = %plan.primary,
                    proxy = %plan.proxy,
                    "no paths under primary schema; applying fallback"
                );
                ranked = self.search(&anchor_ids, &plan.schema, query);
                let note = plan.note();
                for path in &mut ranked {
                    path.notes.insert(0, note.clone());
                }
                fallback = Some(plan);
            }
        }

        let outcome = match (ranked.is_empty(), fallback.is_some()) {
            (true, _) => RetrievalOutcome::NoPaths,
            (false, true) => RetrievalOutcome::Fallback,
            (false, false) => RetrievalOutcome::Ok,
        };
        let paths = assemble_paths(self.graph.as_ref(), ranked);
        let summary = summarize(&schema, outcome, fallback.as_ref(), paths.len());
        debug!(outcome = ?outcome, paths = paths.len(), "retrieval finished");

        RetrievalResult {
            query: query.to_string(),
            intent_tag: schema.intent_tag(),
            schema,
            outcome,
            fallback_applied: fallback.is_some(),
            fallback_intent: fallback.map(|p| p.proxy),
            tokens,
            resolved,
            anchors,
            paths,
            summary,
        }
    }
}
