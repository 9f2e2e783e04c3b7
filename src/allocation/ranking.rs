use crate::allocation::{Ranked, Scored};

pub const DEFAULT_RANK_LIMIT: usize = 10;

/// Sorts by score, highest first, keeps the top `limit`, and numbers them
/// from 1. The sort is stable: equal scores keep their input order.
pub fn rank<T: Scored>(mut items: Vec<T>, limit: usize) -> Vec<Ranked<T>> {
    items.sort_by(|a, b| b.priority_score().total_cmp(&a.priority_score()));
    items
        .into_iter()
        .take(limit)
        .enumerate()
        .map(|(idx, item)| Ranked {
            rank: idx + 1,
            item,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entity {
        name: String,
        score: f64,
    }

    impl Scored for Entity {
        fn priority_score(&self) -> f64 {
            self.score
        }

        fn label(&self) -> &str {
            &self.name
        }
    }

    fn entity(name: &str, score: f64) -> Entity {
        Entity {
            name: name.to_string(),
            score,
        }
    }

    #[test]
    fn truncates_and_numbers_ranks() {
        let items: Vec<Entity> = (0..15)
            .map(|i| entity(&format!("e{i}"), f64::from((i * 37) % 100)))
            .collect();
        let ranked = rank(items, DEFAULT_RANK_LIMIT);

        assert_eq!(ranked.len(), 10);
        for (idx, entry) in ranked.iter().enumerate() {
            assert_eq!(entry.rank, idx + 1);
        }
        for pair in ranked.windows(2) {
            assert!(pair[0].priority_score() >= pair[1].priority_score());
        }
    }

    #[test]
    fn ties_keep_input_order() {
        let items = vec![
            entity("first", 50.0),
            entity("top", 80.0),
            entity("second", 50.0),
            entity("third", 50.0),
        ];
        let ranked = rank(items, 10);
        let labels: Vec<&str> = ranked.iter().map(|r| r.label()).collect();
        assert_eq!(labels, vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn limit_larger_than_input_keeps_everything() {
        let ranked = rank(vec![entity("a", 1.0), entity("b", 2.0)], 10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].label(), "b");
        assert_eq!(ranked[0].rank(), Some(1));
    }
}
