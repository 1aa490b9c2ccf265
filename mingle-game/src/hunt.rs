//! Scavenger-hunt checklist: generation, toggling, and progress tracking.

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::pool::{PoolError, QuestionPool};
use crate::shuffle::shuffled;

/// One checklist entry, independent of the bingo grid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HuntItem {
    pub id: usize,
    pub text: String,
    pub checked: bool,
}

/// Completion counters for the hunt screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HuntProgress {
    pub completed: usize,
    pub total: usize,
    pub percent: f64,
}

/// Build a fresh checklist from the pool's usable prompts, shuffled, with
/// sequential ids and nothing checked.
///
/// # Errors
///
/// Returns [`PoolError::Insufficient`] when the pool has no usable prompts.
pub fn generate_hunt_list(
    pool: &QuestionPool,
    rng: &mut impl Rng,
) -> Result<Vec<HuntItem>, PoolError> {
    let usable: Vec<&str> = pool.usable().collect();
    if usable.is_empty() {
        return Err(PoolError::Insufficient {
            required: 1,
            available: 0,
        });
    }
    Ok(shuffled(&usable, rng)
        .into_iter()
        .enumerate()
        .map(|(id, text)| HuntItem {
            id,
            text: text.to_string(),
            checked: false,
        })
        .collect())
}

/// Return a new list with the matching item's checked flag flipped. An
/// unknown id yields a copy equal to the input.
#[must_use]
pub fn toggle_hunt_item(items: &[HuntItem], id: usize) -> Vec<HuntItem> {
    items
        .iter()
        .map(|item| {
            let mut item = item.clone();
            if item.id == id {
                item.checked = !item.checked;
            }
            item
        })
        .collect()
}

#[must_use]
pub fn hunt_progress(items: &[HuntItem]) -> HuntProgress {
    let total = items.len();
    let completed = items.iter().filter(|item| item.checked).count();
    let percent = if total == 0 {
        0.0
    } else {
        completed as f64 / total as f64 * 100.0
    };
    HuntProgress {
        completed,
        total,
        percent,
    }
}

/// A hunt is complete once every item is checked. An empty list is never
/// complete, so a hunt that has not started cannot pop the completion modal.
#[must_use]
pub fn is_hunt_complete(items: &[HuntItem]) -> bool {
    !items.is_empty() && items.iter().all(|item| item.checked)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::BOARD_PROMPTS;
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use std::collections::HashSet;

    fn test_list() -> Vec<HuntItem> {
        let pool = QuestionPool::default();
        let mut rng = ChaCha20Rng::seed_from_u64(0x5CAF);
        generate_hunt_list(&pool, &mut rng).unwrap()
    }

    #[test]
    fn generated_list_is_an_unchecked_permutation_of_the_pool() {
        let pool = QuestionPool::default();
        let items = test_list();
        assert_eq!(items.len(), BOARD_PROMPTS);
        assert!(items.iter().all(|item| !item.checked));

        let ids: Vec<usize> = items.iter().map(|item| item.id).collect();
        assert_eq!(ids, (0..BOARD_PROMPTS).collect::<Vec<_>>());

        let texts: HashSet<&str> = items.iter().map(|item| item.text.as_str()).collect();
        let prompts: HashSet<&str> = pool.usable().collect();
        assert_eq!(texts, prompts);
    }

    #[test]
    fn generation_fails_on_an_empty_pool() {
        let pool = QuestionPool::new(vec!["FREE".into()], "FREE");
        let mut rng = ChaCha20Rng::seed_from_u64(1);
        assert!(generate_hunt_list(&pool, &mut rng).is_err());
    }

    #[test]
    fn toggle_flips_only_the_matching_item() {
        let items = test_list();
        let toggled = toggle_hunt_item(&items, 5);
        assert!(toggled[5].checked);
        for (a, b) in items.iter().zip(&toggled) {
            if a.id != 5 {
                assert_eq!(a, b);
            }
        }
        assert_eq!(toggle_hunt_item(&toggled, 5), items);
    }

    #[test]
    fn toggle_with_unknown_id_is_a_no_op() {
        let items = test_list();
        assert_eq!(toggle_hunt_item(&items, 999), items);
    }

    #[test]
    fn progress_counts_checked_items() {
        let mut items = test_list();
        for id in 0..6 {
            items = toggle_hunt_item(&items, id);
        }
        let progress = hunt_progress(&items);
        assert_eq!(progress.completed, 6);
        assert_eq!(progress.total, BOARD_PROMPTS);
        let expected = 6.0 / BOARD_PROMPTS as f64 * 100.0;
        assert!((progress.percent - expected).abs() < 1e-9);
    }

    #[test]
    fn progress_of_an_empty_list_is_zero_percent() {
        let progress = hunt_progress(&[]);
        assert_eq!(progress.completed, 0);
        assert_eq!(progress.total, 0);
        assert_eq!(progress.percent, 0.0);
    }

    #[test]
    fn completion_requires_a_non_empty_fully_checked_list() {
        assert!(!is_hunt_complete(&[]));

        let mut items = test_list();
        assert!(!is_hunt_complete(&items));
        for id in 0..items.len() {
            items = toggle_hunt_item(&items, id);
        }
        assert!(is_hunt_complete(&items));

        let one_short = toggle_hunt_item(&items, 0);
        assert!(!is_hunt_complete(&one_short));
    }
}
