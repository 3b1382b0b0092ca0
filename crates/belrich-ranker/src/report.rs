//! Plain-text rendering of gene ranks.

use crate::scorer::GeneRank;

/// `score<sep>namespace<sep>name`, score to two decimals.
pub fn format_rank(rank: &GeneRank, sep: &str) -> String {
    format!("{:.2}{sep}{}{sep}{}", rank.score, rank.namespace, rank.name)
}

/// The first `n` ranks, or all of them when `n` is `None`.
pub fn most_common(ranks: &[GeneRank], n: Option<usize>) -> &[GeneRank] {
    match n {
        Some(n) if n < ranks.len() => &ranks[..n],
        _ => ranks,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rank(name: &str, score: f64) -> GeneRank {
        GeneRank {
            namespace: "HGNC".into(),
            name: name.into(),
            degree: 0,
            score,
        }
    }

    #[test]
    fn test_format_rank() {
        assert_eq!(format_rank(&rank("AKT1", 1.0 / 3.0), "\t"), "0.33\tHGNC\tAKT1");
        assert_eq!(format_rank(&rank("MTOR", 1.0), ","), "1.00,HGNC,MTOR");
    }

    #[test]
    fn test_most_common_truncates() {
        let ranks = vec![rank("A", 1.0), rank("B", 0.5), rank("C", 0.25)];
        assert_eq!(most_common(&ranks, Some(2)).len(), 2);
        assert_eq!(most_common(&ranks, Some(10)).len(), 3);
        assert_eq!(most_common(&ranks, None).len(), 3);
        assert!(most_common(&ranks, Some(0)).is_empty());
    }
}
