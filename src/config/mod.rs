//! Configuration for the territory resolver.

/// Tunables for the territory resolver
///
/// Both values were chosen empirically against real source data; they are
/// exposed as configuration rather than hidden constants so a caller can
/// tighten or loosen matching per source.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Minimum similarity ratio for accepting a fuzzy match
    pub fuzzy_threshold: f64,
    /// Minimum length of a normalized token before it may be used for
    /// token-level substring matching (filters out articles and connectors)
    pub min_token_len: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            fuzzy_threshold: 0.8,
            min_token_len: 3,
        }
    }
}
