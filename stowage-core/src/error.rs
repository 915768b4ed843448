use std::fmt;

/// Typed failures shared across the estimation and selection stages.
///
/// Estimation failures (`RankDeficiency`) abort the pipeline before any
/// knapsack work runs; selection-stage failures are input validation and are
/// raised before the dynamic program touches its state.
#[derive(Debug, Clone, PartialEq)]
pub enum StowageError {
    /// The least-squares system cannot identify the named items: either
    /// their indicator column is all zeros (never observed in a package) or
    /// elimination found their column linearly dependent on others.
    RankDeficiency { items: Vec<String> },
    /// Capacity was not a finite positive number, or quantizing it
    /// overflowed the scaled integer range.
    InvalidCapacity { capacity: f64 },
    /// Packages referenced item names absent from the catalog. Each entry is
    /// `(package index, item name)`.
    UnknownItemReference { references: Vec<(usize, String)> },
    /// The exact optimizer could not certify an optimum (e.g. its node
    /// budget ran out). Never reported as an empty-but-"optimal" selection.
    InfeasibleSelection { reason: String },
}

impl fmt::Display for StowageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StowageError::RankDeficiency { items } => {
                write!(
                    f,
                    "least-squares system is rank deficient; unidentifiable item(s): {}",
                    items.join(", ")
                )
            }
            StowageError::InvalidCapacity { capacity } => {
                write!(f, "capacity must be a finite positive number, got {}", capacity)
            }
            StowageError::UnknownItemReference { references } => {
                let preview: Vec<String> = references
                    .iter()
                    .take(5)
                    .map(|(p, name)| format!("package {} -> '{}'", p, name))
                    .collect();
                write!(
                    f,
                    "{} package reference(s) to items not in the catalog: {}{}",
                    references.len(),
                    preview.join(", "),
                    if references.len() > 5 { ", ..." } else { "" }
                )
            }
            StowageError::InfeasibleSelection { reason } => {
                write!(f, "exact optimizer failed to certify an optimum: {}", reason)
            }
        }
    }
}

impl std::error::Error for StowageError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_offending_items() {
        let err = StowageError::RankDeficiency {
            items: vec!["anvil".to_string(), "bolt".to_string()],
        };
        let msg = err.to_string();
        assert!(msg.contains("anvil"));
        assert!(msg.contains("bolt"));
    }

    #[test]
    fn display_counts_unknown_references() {
        let err = StowageError::UnknownItemReference {
            references: vec![(3, "ghost".to_string())],
        };
        let msg = err.to_string();
        assert!(msg.contains("1 package reference(s)"));
        assert!(msg.contains("package 3 -> 'ghost'"));
    }
}
