//! Product rank reassignment.
//!
//! The admin panel keeps a client-visible product sequence. Moves (up/down
//! buttons or a drag-drop sequence) never increment ranks in place:
//! a dense 1-based ranking is re-derived from the resulting visual order
//! and only the entries whose rank changed are persisted, one update call
//! each.

use serde::{Deserialize, Serialize};

use crate::types::Product;

/// Direction of a single-step move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// A rank update to persist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankChange {
    pub id: i64,
    pub rank: u32,
}

/// Sort products for display: ascending rank, unranked last, name tiebreak.
#[must_use]
pub fn sort_by_rank(products: &[Product]) -> Vec<Product> {
    let mut sorted = products.to_vec();
    sorted.sort_by(|a, b| {
        let rank_a = a.rank.unwrap_or(u32::MAX);
        let rank_b = b.rank.unwrap_or(u32::MAX);
        rank_a.cmp(&rank_b).then_with(|| a.name.cmp(&b.name))
    });
    sorted
}

/// Assign dense 1-based ranks over `ordered`, returning only the changes.
///
/// Products without a backend id cannot be persisted and are skipped.
#[must_use]
pub fn reassign_ranks(ordered: &[Product]) -> Vec<RankChange> {
    ordered
        .iter()
        .enumerate()
        .filter_map(|(index, product)| {
            let rank = u32::try_from(index).unwrap_or(u32::MAX - 1) + 1;
            let id = product.id?;
            (product.rank != Some(rank)).then_some(RankChange { id, rank })
        })
        .collect()
}

/// Plan a one-step move of `product_id` within the rank-sorted list.
///
/// Returns `None` when the id is unknown; an empty plan when the move
/// falls off either end of the list.
#[must_use]
pub fn plan_move(products: &[Product], product_id: i64, direction: Direction) -> Option<Vec<RankChange>> {
    let mut sorted = sort_by_rank(products);

    let index = sorted
        .iter()
        .position(|product| product.id == Some(product_id))?;

    let neighbour = match direction {
        Direction::Up => match index.checked_sub(1) {
            Some(previous) => previous,
            None => return Some(Vec::new()),
        },
        Direction::Down => {
            let next = index + 1;
            if next >= sorted.len() {
                return Some(Vec::new());
            }
            next
        }
    };

    sorted.swap(index, neighbour);
    Some(reassign_ranks(&sorted))
}

/// Plan ranks for an explicit drag-drop sequence of product ids.
///
/// Ids not present in `products` are ignored; the ranking is dense over
/// the ids that remain.
#[must_use]
pub fn plan_sequence(ordered_ids: &[i64], products: &[Product]) -> Vec<RankChange> {
    let ordered: Vec<Product> = ordered_ids
        .iter()
        .filter_map(|id| {
            products
                .iter()
                .find(|product| product.id == Some(*id))
                .cloned()
        })
        .collect();
    reassign_ranks(&ordered)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::types::ProductCode;

    fn product(id: i64, name: &str, rank: Option<u32>) -> Product {
        let mut p = Product::new(
            ProductCode::parse(&format!("P{id}")).unwrap(),
            name,
            Decimal::ONE,
        );
        p.id = Some(id);
        p.rank = rank;
        p
    }

    fn apply(products: &mut [Product], changes: &[RankChange]) {
        for change in changes {
            if let Some(p) = products.iter_mut().find(|p| p.id == Some(change.id)) {
                p.rank = Some(change.rank);
            }
        }
    }

    fn ranks_in_display_order(products: &[Product]) -> Vec<u32> {
        sort_by_rank(products)
            .iter()
            .map(|p| p.rank.unwrap())
            .collect()
    }

    #[test]
    fn test_sort_unranked_last_with_name_tiebreak() {
        let products = vec![
            product(1, "Zanahoria", None),
            product(2, "Miel", Some(2)),
            product(3, "Pan", Some(1)),
            product(4, "Avena", None),
        ];
        let sorted = sort_by_rank(&products);
        let names: Vec<&str> = sorted.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Pan", "Miel", "Avena", "Zanahoria"]);
    }

    #[test]
    fn test_reassign_reports_only_changes() {
        let products = vec![
            product(1, "Pan", Some(1)),
            product(2, "Miel", Some(5)),
            product(3, "Avena", None),
        ];
        let changes = reassign_ranks(&products);
        assert_eq!(
            changes,
            vec![
                RankChange { id: 2, rank: 2 },
                RankChange { id: 3, rank: 3 }
            ]
        );
    }

    #[test]
    fn test_move_down_swaps_neighbours() {
        let mut products = vec![
            product(1, "Pan", Some(1)),
            product(2, "Miel", Some(2)),
            product(3, "Avena", Some(3)),
        ];
        let changes = plan_move(&products, 1, Direction::Down).unwrap();
        apply(&mut products, &changes);

        let sorted = sort_by_rank(&products);
        let ids: Vec<i64> = sorted.iter().map(|p| p.id.unwrap()).collect();
        assert_eq!(ids, [2, 1, 3]);
        assert_eq!(ranks_in_display_order(&products), [1, 2, 3]);
    }

    #[test]
    fn test_move_at_boundary_is_noop() {
        let products = vec![product(1, "Pan", Some(1)), product(2, "Miel", Some(2))];
        assert_eq!(plan_move(&products, 1, Direction::Up), Some(Vec::new()));
        assert_eq!(plan_move(&products, 2, Direction::Down), Some(Vec::new()));
    }

    #[test]
    fn test_move_unknown_id() {
        let products = vec![product(1, "Pan", Some(1))];
        assert!(plan_move(&products, 99, Direction::Up).is_none());
    }

    #[test]
    fn test_sequential_moves_keep_ranking_dense() {
        // Property: any sequence of up/down moves leaves a dense,
        // gap-free 1..N ranking with no duplicates.
        let mut products: Vec<Product> = (1..=5)
            .map(|id| product(id, &format!("Prod {id}"), Some(u32::try_from(id).unwrap())))
            .collect();

        let moves = [
            (3, Direction::Up),
            (1, Direction::Down),
            (5, Direction::Up),
            (5, Direction::Up),
            (2, Direction::Down),
        ];

        for (id, direction) in moves {
            if let Some(changes) = plan_move(&products, id, direction) {
                apply(&mut products, &changes);
            }
            let mut ranks = ranks_in_display_order(&products);
            ranks.sort_unstable();
            assert_eq!(ranks, [1, 2, 3, 4, 5]);
        }
    }

    #[test]
    fn test_plan_sequence_dense_over_known_ids() {
        let products = vec![
            product(1, "Pan", Some(1)),
            product(2, "Miel", Some(2)),
            product(3, "Avena", Some(3)),
        ];
        // Drag-drop result: 3, 1, 2 (plus an id the panel no longer has).
        let changes = plan_sequence(&[3, 99, 1, 2], &products);
        assert_eq!(
            changes,
            vec![
                RankChange { id: 3, rank: 1 },
                RankChange { id: 1, rank: 2 },
                RankChange { id: 2, rank: 3 }
            ]
        );
    }
}
