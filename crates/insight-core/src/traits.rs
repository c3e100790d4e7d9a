use crate::types::Insight;

/// Anything carrying a headline insight.
pub trait Explained {
    fn insight(&self) -> &Insight;
}

impl Explained for Insight {
    fn insight(&self) -> &Insight {
        self
    }
}

/// Trait for insight selectors.
///
/// Selectors are pure: the output depends only on `rows` and the selector's
/// own configuration, and an empty slice yields a "no data" insight.
pub trait InsightSelector {
    type Row;
    type Output: Explained;

    /// Stable identifier used in logs and reports.
    fn name(&self) -> &'static str;

    fn select(&self, rows: &[Self::Row]) -> Self::Output;
}
