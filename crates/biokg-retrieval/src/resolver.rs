//! Entity resolution: query tokens to graph nodes.
//!
//! Tiers are tried in order and the first hit wins:
//!
//! 1. **Synonym**: curated gene table; a token that names a curated gene
//!    resolves only to that gene or not at all
//! 2. **SymbolExact**: symbol-shaped tokens (`BRCA1`, `TP53RK`) accept only
//!    an exact, case-insensitive Gene name
//! 3. **Substring**: exact name, then first name containing the token (or
//!    all words of a multi-word token) in stable node order
//! 4. **Indexed**: normalized-name index, exact then bounded prefix scan
//! 5. **KindKeyword**: a generic word ("drugs") picks a representative
//!    node of that kind
//! 6. unresolved tokens with a cross-lingual equivalent retry 1-5
//!
//! Kind-keyword hits are dropped whenever any token resolved more
//! specifically. Results are memoized per token; the graph is immutable
//! while shared so cached entries never go stale.

use ahash::AHashMap;
use biokg_graph::{GraphStore, Node, NodeId, NodeKind};
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::OnceLock;
use tracing::debug;

use crate::cache::BoundedCache;
use crate::config::RetrievalConfig;
use crate::lexicon::{self, GeneSynonym};

const MIN_SUBSTRING_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchTier {
    Synonym,
    SymbolExact,
    Substring,
    Indexed,
    KindKeyword,
}

impl MatchTier {
    /// Synonym and symbol hits are authoritative.
    pub fn is_exact(self) -> bool {
        matches!(self, MatchTier::Synonym | MatchTier::SymbolExact)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            MatchTier::Synonym => "synonym",
            MatchTier::SymbolExact => "symbol-exact",
            MatchTier::Substring => "substring",
            MatchTier::Indexed => "indexed",
            MatchTier::KindKeyword => "kind-keyword",
        }
    }
}

/// One token linked to one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolution {
    pub token: String,
    pub node: NodeId,
    pub name: String,
    pub kind: NodeKind,
    pub tier: MatchTier,
    /// Reached through the cross-lingual table.
    pub translated: bool,
}

/// Token-ordered resolutions, at most one per token.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ResolvedEntities(Vec<Resolution>);

impl ResolvedEntities {
    pub fn get(&self, token: &str) -> Option<&Resolution> {
        self.0.iter().find(|r| r.token == token)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Resolution> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// ============================================================================
// Name Index
// ============================================================================

/// Lowercase, with every run of non-alphanumerics collapsed to one space.
pub fn normalize_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut gap = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if gap && !out.is_empty() {
                out.push(' ');
            }
            gap = false;
            out.extend(c.to_lowercase());
        } else {
            gap = true;
        }
    }
    out
}

/// Name lookups built once from a loaded graph.
#[derive(Debug, Default)]
pub struct NameIndex {
    /// lowercase name -> ids, in graph order
    exact: AHashMap<String, Vec<NodeId>>,
    /// normalized name -> ids, ordered for prefix range scans
    normalized: BTreeMap<String, Vec<NodeId>>,
    /// `(id, lowercase name)` in graph order, for containment scans
    scan: Vec<(NodeId, String)>,
}

impl NameIndex {
    pub fn build<G: GraphStore + ?Sized>(graph: &G) -> Self {
        let mut index = Self::default();
        for node in graph.nodes() {
            let lower = node.name.to_lowercase();
            index
                .exact
                .entry(lower.clone())
                .or_default()
                .push(node.id.clone());
            index
                .normalized
                .entry(normalize_name(&node.name))
                .or_default()
                .push(node.id.clone());
            index.scan.push((node.id.clone(), lower));
        }
        index
    }

    pub fn len(&self) -> usize {
        self.scan.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scan.is_empty()
    }

    fn exact(&self, lower: &str) -> &[NodeId] {
        self.exact.get(lower).map(Vec::as_slice).unwrap_or(&[])
    }
}

// ============================================================================
// Resolver
// ============================================================================

fn symbol_shape() -> Option<&'static Regex> {
    static SHAPE: OnceLock<Option<Regex>> = OnceLock::new();
    SHAPE
        .get_or_init(|| Regex::new(r"^[A-Za-z0-9][A-Za-z0-9-]{1,14}$").ok())
        .as_ref()
}

/// Gene-symbol shape: 2-15 alphanumerics or hyphens with at least two
/// uppercase letters.
pub fn is_symbol_shaped(token: &str) -> bool {
    symbol_shape().is_some_and(|re| re.is_match(token))
        && token.chars().filter(|c| c.is_ascii_uppercase()).count() >= 2
}

pub struct EntityResolver {
    index: NameIndex,
    cache: BoundedCache<String, Option<Resolution>>,
    substring_scan_limit: usize,
    index_prefix_scan_limit: usize,
}

impl EntityResolver {
    pub fn new<G: GraphStore + ?Sized>(graph: &G, config: &RetrievalConfig) -> Self {
        Self {
            index: NameIndex::build(graph),
            cache: BoundedCache::new(config.resolution_cache_capacity),
            substring_scan_limit: config.substring_scan_limit,
            index_prefix_scan_limit: config.index_prefix_scan_limit,
        }
    }

    pub fn index(&self) -> &NameIndex {
        &self.index
    }

    /// Resolve every token that can be linked. Unresolvable tokens are
    /// silently omitted.
    pub fn resolve<G: GraphStore + ?Sized>(&self, graph: &G, tokens: &[String]) -> ResolvedEntities {
        let mut entries: Vec<Resolution> = tokens
            .iter()
            .filter_map(|token| {
                self.cache
                    .get_or_insert_with(token.clone(), || self.resolve_token(graph, token))
            })
            .collect();

        if entries.iter().any(|r| r.tier != MatchTier::KindKeyword) {
            entries.retain(|r| r.tier != MatchTier::KindKeyword);
        }

        debug!(
            tokens = tokens.len(),
            resolved = entries.len(),
            "resolved query tokens"
        );
        ResolvedEntities(entries)
    }

    /// Resolve one token through every tier, including translation.
    pub fn resolve_token<G: GraphStore + ?Sized>(&self, graph: &G, token: &str) -> Option<Resolution> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return None;
        }
        let (node, tier, translated) = match self.resolve_direct(graph, trimmed) {
            Some((node, tier)) => (node, tier, false),
            None => {
                let english = lexicon::translate(trimmed)?;
                let (node, tier) = self.resolve_direct(graph, english)?;
                (node, tier, true)
            }
        };
        Some(Resolution {
            token: token.to_string(),
            node: node.id.clone(),
            name: node.name.clone(),
            kind: node.kind,
            tier,
            translated,
        })
    }

    fn resolve_direct<'g, G: GraphStore + ?Sized>(
        &self,
        graph: &'g G,
        token: &str,
    ) -> Option<(&'g Node, MatchTier)> {
        if let Some(synonym) = lexicon::gene_synonym(token) {
            return self
                .synonym_match(graph, synonym)
                .map(|n| (n, MatchTier::Synonym));
        }

        if is_symbol_shaped(token) {
            return self
                .gene_named(graph, token)
                .map(|n| (n, MatchTier::SymbolExact));
        }

        let lower = token.to_lowercase();
        if lower.chars().count() >= MIN_SUBSTRING_LEN {
            if let Some(node) = self.substring_match(graph, &lower) {
                return Some((node, MatchTier::Substring));
            }
        }

        if let Some(node) = self.index_match(graph, &lower) {
            return Some((node, MatchTier::Indexed));
        }

        let kind = lexicon::kind_keyword(&lower)?;
        self.kind_match(graph, kind, &lower)
            .map(|n| (n, MatchTier::KindKeyword))
    }

    /// First Gene node whose name equals `name`, ignoring case.
    fn gene_named<'g, G: GraphStore + ?Sized>(&self, graph: &'g G, name: &str) -> Option<&'g Node> {
        self.index
            .exact(&name.to_lowercase())
            .iter()
            .filter_map(|id| graph.get_node(id.as_str()))
            .find(|n| n.kind == NodeKind::Gene)
    }

    fn synonym_match<'g, G: GraphStore + ?Sized>(
        &self,
        graph: &'g G,
        synonym: &GeneSynonym,
    ) -> Option<&'g Node> {
        std::iter::once(synonym.canonical)
            .chain(synonym.variants.iter().copied())
            .find_map(|name| self.gene_named(graph, name))
            .or_else(|| {
                // Containment only for descriptive, multi-word variants.
                let descriptive: Vec<String> = synonym
                    .variants
                    .iter()
                    .filter(|v| v.contains(' '))
                    .map(|v| v.to_lowercase())
                    .collect();
                if descriptive.is_empty() {
                    return None;
                }
                graph
                    .nodes_of_kind(NodeKind::Gene)
                    .take(self.substring_scan_limit)
                    .find(|n| {
                        let name = n.name.to_lowercase();
                        descriptive.iter().any(|v| name.contains(v.as_str()))
                    })
            })
    }

    fn substring_match<'g, G: GraphStore + ?Sized>(&self, graph: &'g G, lower: &str) -> Option<&'g Node> {
        if let Some(node) = self
            .index
            .exact(lower)
            .first()
            .and_then(|id| graph.get_node(id.as_str()))
        {
            return Some(node);
        }

        let words: Vec<&str> = lower.split_whitespace().collect();
        self.index
            .scan
            .iter()
            .take(self.substring_scan_limit)
            .find(|(_, name)| {
                name.contains(lower) || (words.len() > 1 && words.iter().all(|w| name.contains(w)))
            })
            .and_then(|(id, _)| graph.get_node(id.as_str()))
    }

    fn index_match<'g, G: GraphStore + ?Sized>(&self, graph: &'g G, lower: &str) -> Option<&'g Node> {
        let key = normalize_name(lower);
        if key.is_empty() {
            return None;
        }
        let ids = match self.index.normalized.get(&key) {
            Some(ids) => ids,
            None => {
                self.index
                    .normalized
                    .range(key.clone()..)
                    .take(self.index_prefix_scan_limit)
                    .take_while(|(name, _)| name.starts_with(&key))
                    .map(|(_, ids)| ids)
                    .next()?
            }
        };
        ids.first().and_then(|id| graph.get_node(id.as_str()))
    }

    fn kind_match<'g, G: GraphStore + ?Sized>(
        &self,
        graph: &'g G,
        kind: NodeKind,
        lower: &str,
    ) -> Option<&'g Node> {
        let token_len = lower.chars().count() as f64;
        let mut best: Option<(&'g Node, f64)> = None;
        for node in graph.nodes_of_kind(kind).take(self.substring_scan_limit) {
            let name = node.name.to_lowercase();
            let score = if name.contains(lower) {
                token_len / name.chars().count().max(1) as f64
            } else if lower.split_whitespace().any(|w| name.contains(w)) {
                0.5
            } else {
                0.1
            };
            if best.map_or(true, |(_, s)| score > s) {
                best = Some((node, score));
            }
        }
        best.map(|(node, _)| node)
    }
}
