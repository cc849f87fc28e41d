use serde::Serialize;

/// Row counts broken down by label.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LabelCounts {
    pub total: i64,
    pub oui: i64,
    pub non: i64,
    /// Rows whose label is missing or not one of `Oui`/`Non`.
    pub other: i64,
}

impl LabelCounts {
    /// Builds counts from `(label, count)` groups as returned by a `GROUP BY` query.
    #[must_use]
    pub fn from_groups(groups: &[(Option<String>, i64)]) -> Self {
        groups
            .iter()
            .fold(Self::default(), |mut counts, (label, count)| {
                counts.total += count;
                match label.as_deref() {
                    Some("Oui") => counts.oui += count,
                    Some("Non") => counts.non += count,
                    _ => counts.other += count,
                }
                counts
            })
    }
}

/// Aggregate statistics over the feature store and the prediction log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Stats {
    pub employees: LabelCounts,
    pub predictions: LabelCounts,
}
