//! One-step schema substitution when the primary search finds nothing.

use crate::intent::IntentClassifier;
use crate::schema::{IntentTag, SchemaConfig};

/// A substitute schema and the intent it stands in for.
#[derive(Debug, Clone, PartialEq)]
pub struct FallbackPlan {
    pub primary: IntentTag,
    pub proxy: IntentTag,
    pub schema: SchemaConfig,
}

impl FallbackPlan {
    /// Note attached to every path found under the proxy schema.
    pub fn note(&self) -> String {
        format!(
            "fallback: approximate proxy via {} ({} found no paths)",
            self.proxy, self.primary
        )
    }
}

/// Look up the proxy for `primary`'s intent. The proxy's own fallback is
/// never consulted, so at most one substitution happens per query.
pub fn plan_fallback(
    classifier: &IntentClassifier,
    primary: &SchemaConfig,
    hop_limit_override: Option<usize>,
) -> Option<FallbackPlan> {
    let proxy = classifier.fallback_for(primary.intent())?;
    let mut schema = classifier.template(proxy);
    if let Some(hops) = hop_limit_override {
        schema = schema.hop_limit(hops);
    }
    Some(FallbackPlan {
        primary: primary.intent(),
        proxy,
        schema,
    })
}
