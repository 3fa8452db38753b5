use std::collections::BTreeMap;

use crate::activities::repo_types::Activity;
use crate::stats::dto::{ActivityStats, CategoryAverage, CategoryImpact};

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Reduce a record set to summary statistics.
///
/// Uncategorized records count towards the totals but not towards any
/// category. Categories are visited in name order and only a strictly
/// better average replaces the current pick, so ties go to the
/// lexicographically smallest name.
pub fn summarize(activities: &[Activity]) -> ActivityStats {
    if activities.is_empty() {
        return ActivityStats::empty();
    }

    let total = activities.len();
    let delta_sum: i64 = activities.iter().map(Activity::energy_delta).sum();
    let avg_energy_change = round2(delta_sum as f64 / total as f64);

    let mut groups: BTreeMap<&str, (i64, usize)> = BTreeMap::new();
    for a in activities {
        if let Some(category) = a.category.as_deref() {
            let entry = groups.entry(category).or_insert((0, 0));
            entry.0 += a.energy_delta();
            entry.1 += 1;
        }
    }

    let averages: Vec<(&str, f64, usize)> = groups
        .into_iter()
        .map(|(cat, (sum, count))| (cat, sum as f64 / count as f64, count))
        .collect();

    let mut most_energizing: Option<(&str, f64)> = None;
    let mut most_draining: Option<(&str, f64)> = None;
    for &(cat, avg, _) in &averages {
        if most_energizing.map_or(true, |(_, best)| avg > best) {
            most_energizing = Some((cat, avg));
        }
        if most_draining.map_or(true, |(_, worst)| avg < worst) {
            most_draining = Some((cat, avg));
        }
    }

    let impact = |pick: Option<(&str, f64)>| match pick {
        Some((cat, avg)) => CategoryImpact {
            category: Some(cat.to_string()),
            change: round2(avg),
        },
        None => CategoryImpact::none(),
    };

    ActivityStats {
        total_activities: total,
        avg_energy_change,
        most_energizing: impact(most_energizing),
        most_draining: impact(most_draining),
        categories: averages
            .into_iter()
            .map(|(cat, avg, count)| CategoryAverage {
                category: cat.to_string(),
                avg_change: round2(avg),
                count,
            })
            .collect(),
    }
}
