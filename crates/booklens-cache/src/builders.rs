//! Word-cloud aggregation builders.
//!
//! Three variants, same shape: fan out over labeled comments, group by
//! label, compute a weighted score, sort descending, truncate to a fixed
//! top-N. Only the weight formula differs per scope.

use std::collections::{HashMap, HashSet};

use booklens_entity::{CloudTag, CommentRecord};

/// Labels kept in the global word cloud before rescaling.
const GLOBAL_LIMIT: usize = 200;
/// Labels kept in a per-book tag cloud.
const BOOK_LIMIT: usize = 50;
/// Labels kept in a per-upload word cloud.
const UPLOAD_LIMIT: usize = 100;

/// Per-label occurrence statistics.
#[derive(Debug, Default)]
struct LabelStats {
    count: u64,
    positive: u64,
    books: HashSet<String>,
}

fn collect_stats(comments: &[CommentRecord]) -> HashMap<String, LabelStats> {
    let mut stats: HashMap<String, LabelStats> = HashMap::new();
    for comment in comments {
        for label in &comment.labels {
            if label.is_empty() {
                continue;
            }
            let entry = stats.entry(label.clone()).or_default();
            entry.count += 1;
            if comment.sentiment.is_positive() {
                entry.positive += 1;
            }
            entry.books.insert(comment.book_id.clone());
        }
    }
    stats
}

/// Sort by weight descending, breaking ties by label so output is stable.
fn sort_and_truncate(mut tags: Vec<CloudTag>, limit: usize) -> Vec<CloudTag> {
    tags.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.label.cmp(&b.label))
    });
    tags.truncate(limit);
    tags
}

/// Linearly rescale weights into `[lo, hi]`. When every weight is equal the
/// whole set maps to the midpoint constant `50`.
pub fn rescale(tags: &mut [CloudTag], lo: f64, hi: f64) {
    let Some(first) = tags.first() else {
        return;
    };
    let mut min = first.weight;
    let mut max = first.weight;
    for tag in tags.iter() {
        min = min.min(tag.weight);
        max = max.max(tag.weight);
    }

    if max > min {
        let span = max - min;
        for tag in tags.iter_mut() {
            tag.weight = lo + (tag.weight - min) / span * (hi - lo);
        }
    } else {
        for tag in tags.iter_mut() {
            tag.weight = 50.0;
        }
    }
}

/// Global word cloud: weight combines occurrence count, positive count, and
/// distinct-book coverage, then rescales linearly to `[1, 100]`.
pub fn global_word_cloud(comments: &[CommentRecord]) -> Vec<CloudTag> {
    let stats = collect_stats(comments);
    let tags: Vec<CloudTag> = stats
        .into_iter()
        .map(|(label, s)| {
            let weight =
                0.4 * s.count as f64 + 0.3 * s.positive as f64 + 0.3 * s.books.len() as f64;
            CloudTag { label, weight }
        })
        .collect();

    let mut tags = sort_and_truncate(tags, GLOBAL_LIMIT);
    rescale(&mut tags, 1.0, 100.0);
    tags
}

/// Per-book tag cloud: raw occurrence counts, no rescale. The caller
/// pre-filters `comments` to the book in question.
pub fn book_tag_cloud(comments: &[CommentRecord]) -> Vec<CloudTag> {
    let stats = collect_stats(comments);
    let tags: Vec<CloudTag> = stats
        .into_iter()
        .map(|(label, s)| CloudTag {
            label,
            weight: s.count as f64,
        })
        .collect();

    sort_and_truncate(tags, BOOK_LIMIT)
}

/// Per-upload word cloud: occurrence count normalized by the upload's
/// maximum, positive ratio, and book coverage over `total_books` (the number
/// of distinct books in the upload).
pub fn upload_word_cloud(comments: &[CommentRecord], total_books: usize) -> Vec<CloudTag> {
    if total_books == 0 {
        return Vec::new();
    }

    let stats = collect_stats(comments);
    let max_count = stats.values().map(|s| s.count).max().unwrap_or(0);
    if max_count == 0 {
        return Vec::new();
    }

    let tags: Vec<CloudTag> = stats
        .into_iter()
        .map(|(label, s)| {
            let weight = 0.4 * (s.count as f64 / max_count as f64)
                + 0.3 * (s.positive as f64 / s.count as f64)
                + 0.3 * (s.books.len() as f64 / total_books as f64);
            CloudTag { label, weight }
        })
        .collect();

    sort_and_truncate(tags, UPLOAD_LIMIT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use booklens_core::traits::{Enrichment, Sentiment};
    use booklens_core::types::UploadId;

    fn comment(book_id: &str, labels: &[&str], sentiment: Sentiment) -> CommentRecord {
        CommentRecord::from_enrichment(
            format!("c-{}", uuid_like(book_id, labels)),
            book_id.to_string(),
            UploadId::new(),
            None,
            "text".to_string(),
            None,
            Enrichment {
                summary: "text".to_string(),
                keywords: vec![],
                labels: labels.iter().map(|l| l.to_string()).collect(),
                sentiment,
            },
        )
    }

    fn uuid_like(book_id: &str, labels: &[&str]) -> String {
        format!("{book_id}-{}", labels.join("-"))
    }

    /// A label appearing 10 times (6 positive) across 3 books has raw global
    /// weight 0.4*10 + 0.3*6 + 0.3*3 = 6.7.
    fn ten_comments_three_books() -> Vec<CommentRecord> {
        let mut comments = Vec::new();
        for i in 0..10 {
            let book = match i % 3 {
                0 => "b1",
                1 => "b2",
                _ => "b3",
            };
            let sentiment = if i < 6 {
                Sentiment::Positive
            } else {
                Sentiment::Negative
            };
            comments.push(comment(book, &["classic"], sentiment));
        }
        comments
    }

    #[test]
    fn test_rescale_endpoints_map_exactly() {
        let mut tags = vec![
            CloudTag::new("low", 4.0),
            CloudTag::new("mid", 6.7),
            CloudTag::new("high", 40.0),
        ];
        rescale(&mut tags, 1.0, 100.0);

        assert_eq!(tags[0].weight, 1.0);
        assert_eq!(tags[2].weight, 100.0);
        let expected_mid = 1.0 + (6.7 - 4.0) / 36.0 * 99.0;
        assert!((tags[1].weight - expected_mid).abs() < 1e-9);
    }

    #[test]
    fn test_rescale_equal_weights_become_fifty() {
        let mut tags = vec![CloudTag::new("a", 7.0), CloudTag::new("b", 7.0)];
        rescale(&mut tags, 1.0, 100.0);
        assert!(tags.iter().all(|t| t.weight == 50.0));
    }

    #[test]
    fn test_global_single_label_rescales_to_constant() {
        let tags = global_word_cloud(&ten_comments_three_books());
        assert_eq!(tags.len(), 1);
        assert_eq!(tags[0].label, "classic");
        assert_eq!(tags[0].weight, 50.0);
    }

    #[test]
    fn test_global_orders_by_weight() {
        let mut comments = ten_comments_three_books();
        comments.push(comment("b1", &["minor"], Sentiment::Negative));
        let tags = global_word_cloud(&comments);

        assert_eq!(tags[0].label, "classic");
        assert_eq!(tags[0].weight, 100.0);
        assert_eq!(tags[1].label, "minor");
        assert_eq!(tags[1].weight, 1.0);
    }

    #[test]
    fn test_book_cloud_uses_raw_counts() {
        let comments = vec![
            comment("b1", &["dense", "slow"], Sentiment::Negative),
            comment("b1", &["dense"], Sentiment::Positive),
        ];
        let tags = book_tag_cloud(&comments);
        assert_eq!(tags[0], CloudTag::new("dense", 2.0));
        assert_eq!(tags[1], CloudTag::new("slow", 1.0));
    }

    #[test]
    fn test_upload_cloud_formula() {
        // "hit": count 2 of max 2, both positive, 1 of 2 books.
        // "miss": count 1 of max 2, negative, 1 of 2 books.
        let comments = vec![
            comment("b1", &["hit"], Sentiment::Positive),
            comment("b1", &["hit"], Sentiment::Positive),
            comment("b2", &["miss"], Sentiment::Negative),
        ];
        let tags = upload_word_cloud(&comments, 2);

        let hit = 0.4 * 1.0 + 0.3 * 1.0 + 0.3 * 0.5;
        let miss = 0.4 * 0.5 + 0.3 * 0.0 + 0.3 * 0.5;
        assert_eq!(tags[0].label, "hit");
        assert!((tags[0].weight - hit).abs() < 1e-9);
        assert_eq!(tags[1].label, "miss");
        assert!((tags[1].weight - miss).abs() < 1e-9);
    }

    #[test]
    fn test_empty_inputs_yield_empty_clouds() {
        assert!(global_word_cloud(&[]).is_empty());
        assert!(book_tag_cloud(&[]).is_empty());
        assert!(upload_word_cloud(&[], 3).is_empty());
        assert!(upload_word_cloud(&[comment("b1", &["x"], Sentiment::Positive)], 0).is_empty());
    }
}
