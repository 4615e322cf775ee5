//! Plain-text multicollinearity report

use std::path::Path;

use anyhow::{Context, Result};

use crate::analysis::CorrelatedPair;

/// One warning line per flagged pair, or a single all-clear line.
pub fn format_multicollinearity_report(pairs: &[CorrelatedPair], threshold: f64) -> String {
    if pairs.is_empty() {
        return format!("No high correlations (>{}) detected.\n", threshold);
    }

    pairs
        .iter()
        .map(|p| {
            format!(
                "⚠️ High correlation detected between {} and {} (r={:.2})\n",
                p.feature1, p.feature2, p.correlation
            )
        })
        .collect()
}

pub fn export_multicollinearity_report(
    pairs: &[CorrelatedPair],
    threshold: f64,
    output_path: &Path,
) -> Result<()> {
    std::fs::write(output_path, format_multicollinearity_report(pairs, threshold)).with_context(
        || {
            format!(
                "Failed to write multicollinearity report to {}",
                output_path.display()
            )
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_pairs_message() {
        assert_eq!(
            format_multicollinearity_report(&[], 0.8),
            "No high correlations (>0.8) detected.\n"
        );
    }

    #[test]
    fn test_flagged_pair_line() {
        let pairs = vec![CorrelatedPair {
            feature1: "age".to_string(),
            feature2: "bmi".to_string(),
            correlation: 0.912,
        }];
        assert_eq!(
            format_multicollinearity_report(&pairs, 0.8),
            "⚠️ High correlation detected between age and bmi (r=0.91)\n"
        );
    }
}
