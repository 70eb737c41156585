//! Derived metrics computed client-side from fetched entities
//!
//! The backend ships raw counts and lists; the dashboard views derive
//! everything else. These transforms are pure functions so any
//! presentation layer (terminal, web, tests) gets identical numbers.

use crate::models::{Fix, FixStatus};
use std::collections::HashMap;

/// Fixed chart palette, cycled by sort index so a given rank always gets
/// the same color.
pub const CHART_COLORS: [&str; 6] = [
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#8884d8", "#82ca9d",
];

const REPO_LABEL_MAX: usize = 20;
const ERROR_LABEL_MAX: usize = 15;
const TOP_REPO_COUNT: usize = 10;

/// Aggregated counts over a fix list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixStatistics {
    pub total: u64,
    pub pending: u64,
    pub approved: u64,
    pub rejected: u64,
    pub applied: u64,
    /// Mean confidence over all fixes; absent scores contribute 0 to the
    /// sum but still count in the denominator.
    pub avg_confidence: f64,
    /// `(approved + applied) / total * 100`.
    pub success_rate: f64,
}

/// Compute per-status counts, average confidence, and success rate for a
/// list of fixes. An empty list yields all zeros.
pub fn compute_fix_statistics(fixes: &[Fix]) -> FixStatistics {
    let mut stats = FixStatistics::default();

    for fix in fixes {
        stats.total += 1;
        match fix.status {
            FixStatus::Pending | FixStatus::PendingApproval => stats.pending += 1,
            FixStatus::Approved => stats.approved += 1,
            FixStatus::Rejected => stats.rejected += 1,
            FixStatus::Applied => stats.applied += 1,
            FixStatus::Unknown => {}
        }
        stats.avg_confidence += fix.confidence_score.map_or(0.0, clamp_confidence);
    }

    if stats.total > 0 {
        stats.avg_confidence /= stats.total as f64;
        stats.success_rate = (stats.approved + stats.applied) as f64 / stats.total as f64 * 100.0;
    }

    stats
}

/// Clamp a confidence score into `[0, 1]`. The backend has emitted values
/// outside the range; they must never render as >100% or negative.
pub fn clamp_confidence(score: f64) -> f64 {
    score.clamp(0.0, 1.0)
}

/// Render a confidence score as a percentage string. An absent score is
/// "N/A", never a silent 0%.
pub fn format_confidence(score: Option<f64>) -> String {
    match score {
        Some(score) => format!("{:.1}%", clamp_confidence(score) * 100.0),
        None => "N/A".to_string(),
    }
}

/// One bar in the failing-repositories ranking.
#[derive(Debug, Clone, PartialEq)]
pub struct RepoFailureEntry {
    /// Display label, truncated to 20 characters.
    pub label: String,
    /// Untruncated repository name for tooltip lookups.
    pub full_name: String,
    pub failures: u64,
}

/// Rank repositories by failure count, descending, keeping the top 10.
/// Ties break alphabetically so the ranking is deterministic.
pub fn rank_failing_repositories(counts: &HashMap<String, u64>) -> Vec<RepoFailureEntry> {
    let mut ranked: Vec<(&String, &u64)> = counts.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    ranked
        .into_iter()
        .take(TOP_REPO_COUNT)
        .map(|(name, failures)| RepoFailureEntry {
            label: truncate_label(name, REPO_LABEL_MAX),
            full_name: name.clone(),
            failures: *failures,
        })
        .collect()
}

/// One slice of a categorical distribution chart.
#[derive(Debug, Clone, PartialEq)]
pub struct DistributionSlice {
    /// Display label, truncated where the chart is tight on space.
    pub label: String,
    /// Untruncated label for tooltip lookups.
    pub full_name: String,
    pub count: u64,
    pub color: &'static str,
}

/// Error-type distribution: sorted descending, colored by rank, labels
/// truncated to 15 characters.
pub fn error_type_distribution(counts: &HashMap<String, u64>) -> Vec<DistributionSlice> {
    sorted_slices(counts, Some(ERROR_LABEL_MAX))
}

/// Language distribution: same shape as the error-type chart but labels
/// are short enough to keep whole.
pub fn language_distribution(counts: &HashMap<String, u64>) -> Vec<DistributionSlice> {
    sorted_slices(counts, None)
}

fn sorted_slices(
    counts: &HashMap<String, u64>,
    label_max: Option<usize>,
) -> Vec<DistributionSlice> {
    let mut ranked: Vec<(&String, &u64)> = counts.iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

    ranked
        .into_iter()
        .enumerate()
        .map(|(index, (name, count))| DistributionSlice {
            label: match label_max {
                Some(max) => truncate_label(name, max),
                None => name.clone(),
            },
            full_name: name.clone(),
            count: *count,
            color: CHART_COLORS[index % CHART_COLORS.len()],
        })
        .collect()
}

fn truncate_label(name: &str, max: usize) -> String {
    if name.chars().count() > max {
        let short: String = name.chars().take(max).collect();
        format!("{}...", short)
    } else {
        name.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fix_with_status(status: FixStatus, confidence: Option<f64>) -> Fix {
        let mut fix: Fix = serde_json::from_str("{}").unwrap();
        fix.status = status;
        fix.confidence_score = confidence;
        fix
    }

    #[test]
    fn test_empty_fix_list_yields_zeros() {
        let stats = compute_fix_statistics(&[]);
        assert_eq!(stats, FixStatistics::default());
        assert_eq!(stats.success_rate, 0.0);
        assert_eq!(stats.avg_confidence, 0.0);
    }

    #[test]
    fn test_success_rate_exact() {
        // 2 of 5 in {approved, applied} -> 40%
        let fixes = vec![
            fix_with_status(FixStatus::Approved, Some(0.9)),
            fix_with_status(FixStatus::Applied, Some(0.8)),
            fix_with_status(FixStatus::Pending, None),
            fix_with_status(FixStatus::PendingApproval, Some(0.5)),
            fix_with_status(FixStatus::Rejected, Some(0.2)),
        ];

        let stats = compute_fix_statistics(&fixes);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.approved, 1);
        assert_eq!(stats.applied, 1);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.rejected, 1);
        assert!((stats.success_rate - 40.0).abs() < 1e-9);
    }

    #[test]
    fn test_avg_confidence_denominator_is_total_count() {
        // Sum of present scores 0.9 + 0.3 = 1.2, over 3 fixes -> 0.4.
        let fixes = vec![
            fix_with_status(FixStatus::Pending, Some(0.9)),
            fix_with_status(FixStatus::Pending, None),
            fix_with_status(FixStatus::Pending, Some(0.3)),
        ];

        let stats = compute_fix_statistics(&fixes);
        assert!((stats.avg_confidence - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_unknown_status_counts_toward_total_only() {
        let fixes = vec![
            fix_with_status(FixStatus::Unknown, None),
            fix_with_status(FixStatus::Approved, None),
        ];

        let stats = compute_fix_statistics(&fixes);
        assert_eq!(stats.total, 2);
        assert_eq!(
            stats.pending + stats.approved + stats.rejected + stats.applied,
            1
        );
        assert!((stats.success_rate - 50.0).abs() < 1e-9);
    }

    #[test]
    fn test_out_of_range_confidence_is_clamped() {
        assert_eq!(clamp_confidence(1.4), 1.0);
        assert_eq!(clamp_confidence(-0.2), 0.0);
        assert_eq!(format_confidence(Some(1.4)), "100.0%");
    }

    #[test]
    fn test_absent_confidence_renders_na() {
        assert_eq!(format_confidence(None), "N/A");
        assert_eq!(format_confidence(Some(0.856)), "85.6%");
    }

    #[test]
    fn test_repo_ranking_truncates_but_keeps_full_name() {
        let mut counts = HashMap::new();
        counts.insert(
            "a-very-long-organization-repository-name".to_string(),
            12u64,
        );
        counts.insert("short/repo".to_string(), 3);

        let ranked = rank_failing_repositories(&counts);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].label, "a-very-long-organiza...");
        assert_eq!(ranked[0].label.chars().count(), 23);
        assert_eq!(
            ranked[0].full_name,
            "a-very-long-organization-repository-name"
        );
        assert_eq!(ranked[1].label, "short/repo");
    }

    #[test]
    fn test_repo_ranking_takes_top_ten_descending() {
        let counts: HashMap<String, u64> =
            (0..15).map(|i| (format!("repo-{:02}", i), i as u64)).collect();

        let ranked = rank_failing_repositories(&counts);
        assert_eq!(ranked.len(), 10);
        assert_eq!(ranked[0].failures, 14);
        assert!(ranked.windows(2).all(|w| w[0].failures >= w[1].failures));
    }

    #[test]
    fn test_error_distribution_colors_cycle_deterministically() {
        let counts: HashMap<String, u64> =
            (0..8).map(|i| (format!("error-{}", i), 100 - i as u64)).collect();

        let slices = error_type_distribution(&counts);
        assert_eq!(slices.len(), 8);
        assert_eq!(slices[0].color, CHART_COLORS[0]);
        assert_eq!(slices[6].color, CHART_COLORS[0]);
        assert_eq!(slices[7].color, CHART_COLORS[1]);
    }

    #[test]
    fn test_error_labels_truncate_at_fifteen() {
        let mut counts = HashMap::new();
        counts.insert("dependency_resolution_failure".to_string(), 4u64);

        let slices = error_type_distribution(&counts);
        assert_eq!(slices[0].label, "dependency_reso...");
        assert_eq!(slices[0].full_name, "dependency_resolution_failure");
    }

    #[test]
    fn test_language_labels_not_truncated() {
        let mut counts = HashMap::new();
        counts.insert("a-language-with-a-long-name".to_string(), 1u64);

        let slices = language_distribution(&counts);
        assert_eq!(slices[0].label, "a-language-with-a-long-name");
    }
}
