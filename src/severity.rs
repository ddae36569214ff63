use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Operational,
    Degraded,
    Partial,
    Major,
    Maintenance,
    Investigating,
}

// The raw status ids are not ordered by priority, so this has to stay a
// literal table: Major Outage > Partial Outage > Under Maintenance >
// Degraded Performance > Investigating.
const RANKING: [(i64, Severity); 5] = [
    (4, Severity::Major),
    (3, Severity::Partial),
    (5, Severity::Maintenance),
    (2, Severity::Degraded),
    (6, Severity::Investigating),
];

/// Reduces a set of status ids to a single severity. Empty input, or input
/// with no ranked id, resolves to `Operational`.
pub fn resolve(status_ids: &[i64]) -> Severity {
    for (id, severity) in RANKING {
        if status_ids.contains(&id) {
            return severity;
        }
    }
    Severity::Operational
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_set_is_operational() {
        assert_eq!(resolve(&[]), Severity::Operational);
    }

    #[test]
    fn major_outranks_everything() {
        assert_eq!(resolve(&[4, 1, 2]), Severity::Major);
        assert_eq!(resolve(&[4, 1]), Severity::Major);
        assert_eq!(resolve(&[6, 2, 5, 3, 4]), Severity::Major);
    }

    #[test]
    fn ranking_is_a_table_not_a_numeric_min() {
        assert_eq!(resolve(&[5, 2]), Severity::Maintenance);
        assert_eq!(resolve(&[2, 3]), Severity::Partial);
        assert_eq!(resolve(&[6, 2]), Severity::Degraded);
    }

    #[test]
    fn investigating_alone() {
        assert_eq!(resolve(&[6]), Severity::Investigating);
    }

    #[test]
    fn input_order_does_not_matter() {
        let mut ids = vec![6, 5, 3];
        let forward = resolve(&ids);
        ids.reverse();
        assert_eq!(resolve(&ids), forward);
        assert_eq!(forward, Severity::Partial);
    }

    #[test]
    fn unranked_ids_fall_back_to_operational() {
        assert_eq!(resolve(&[1]), Severity::Operational);
        assert_eq!(resolve(&[99, 1]), Severity::Operational);
    }
}
