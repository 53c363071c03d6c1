//! Stable merge sort of crawl nodes by similarity

use crate::crawler::CrawlNode;

/// Sort nodes ascending by similarity
///
/// The sort is stable: nodes with equal scores keep their input order, which
/// keeps seed selection reproducible for a given cache.
pub fn merge_sort(mut nodes: Vec<CrawlNode>) -> Vec<CrawlNode> {
    if nodes.len() <= 1 {
        return nodes;
    }

    let right = nodes.split_off(nodes.len() / 2);
    merge(merge_sort(nodes), merge_sort(right))
}

/// Merge two ascending runs into one ascending run
///
/// On ties the node from `left` is emitted first.
pub fn merge(left: Vec<CrawlNode>, right: Vec<CrawlNode>) -> Vec<CrawlNode> {
    let mut merged = Vec::with_capacity(left.len() + right.len());
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();

    while let (Some(l), Some(r)) = (left.peek(), right.peek()) {
        let next = if l.similarity <= r.similarity {
            left.next()
        } else {
            right.next()
        };
        merged.extend(next);
    }

    // At most one side still holds elements.
    merged.extend(left);
    merged.extend(right);
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(url: &str, similarity: f64) -> CrawlNode {
        CrawlNode::seed(url).with_similarity(similarity)
    }

    fn urls(nodes: &[CrawlNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.url.as_str()).collect()
    }

    #[test]
    fn test_merge_sort() {
        let nodes = vec![
            node("u1", 0.9),
            node("u2", 0.1),
            node("u3", 0.5),
            node("u4", 0.3),
        ];
        let sorted = merge_sort(nodes);
        assert_eq!(urls(&sorted), vec!["u2", "u4", "u3", "u1"]);
    }

    #[test]
    fn test_merge() {
        let a = vec![node("a1", 0.2), node("a2", 0.4)];
        let b = vec![node("b1", 0.1), node("b2", 0.3)];
        assert_eq!(urls(&merge(a, b)), vec!["b1", "a1", "b2", "a2"]);
    }

    #[test]
    fn test_merge_uneven_sides() {
        let a = vec![node("a1", 0.1)];
        let b = vec![node("b1", 0.2), node("b2", 0.3), node("b3", 0.4)];
        assert_eq!(urls(&merge(a, b)), vec!["a1", "b1", "b2", "b3"]);

        let a = vec![node("a1", 0.5), node("a2", 0.6), node("a3", 0.7)];
        let b = vec![node("b1", 0.1)];
        assert_eq!(urls(&merge(a, b)), vec!["b1", "a1", "a2", "a3"]);

        assert!(merge(Vec::new(), Vec::new()).is_empty());
        assert_eq!(urls(&merge(Vec::new(), vec![node("b1", 0.0)])), vec!["b1"]);
    }

    #[test]
    fn test_stable_on_ties() {
        let nodes = vec![
            node("first", 0.5),
            node("low", 0.1),
            node("second", 0.5),
            node("third", 0.5),
        ];
        let sorted = merge_sort(nodes);
        assert_eq!(urls(&sorted), vec!["low", "first", "second", "third"]);
    }

    #[test]
    fn test_idempotent() {
        let nodes = vec![
            node("a", 0.3),
            node("b", -0.2),
            node("c", 0.3),
            node("d", 1.0),
            node("e", -1.0),
        ];
        let once = merge_sort(nodes);
        let twice = merge_sort(once.clone());
        assert_eq!(urls(&once), urls(&twice));
        assert_eq!(urls(&once), vec!["e", "b", "a", "c", "d"]);
    }
}
