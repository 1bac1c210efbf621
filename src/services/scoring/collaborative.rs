use std::collections::{BTreeSet, HashMap, HashSet};

use crate::models::{Interaction, Listing, ListingId, UserId};

use super::{similarity::cosine_similarity, ScoredListing};

/// Neighbour count used when none is configured
pub const DEFAULT_MAX_NEIGHBORS: usize = 10;

/// User × listing interaction counts
///
/// Rows and columns are sorted by id so the matrix is independent of log
/// order. Each log row adds one to its cell regardless of interaction kind.
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionMatrix {
    users: Vec<UserId>,
    listings: Vec<ListingId>,
    counts: Vec<Vec<f64>>,
}

impl InteractionMatrix {
    pub fn from_log(log: &[Interaction]) -> Self {
        let users: Vec<UserId> = log
            .iter()
            .map(|i| i.user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let listings: Vec<ListingId> = log
            .iter()
            .map(|i| i.listing_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let mut counts = vec![vec![0.0; listings.len()]; users.len()];
        for interaction in log {
            // Both ids were collected from this log, so the searches succeed
            if let (Ok(row), Ok(column)) = (
                users.binary_search(&interaction.user_id),
                listings.binary_search(&interaction.listing_id),
            ) {
                counts[row][column] += 1.0;
            }
        }

        Self {
            users,
            listings,
            counts,
        }
    }

    pub fn users(&self) -> &[UserId] {
        &self.users
    }

    pub fn listings(&self) -> &[ListingId] {
        &self.listings
    }

    /// Interaction counts of `user_id`, or `None` if the user has no history
    pub fn row(&self, user_id: UserId) -> Option<&[f64]> {
        self.users
            .binary_search(&user_id)
            .ok()
            .map(|index| self.counts[index].as_slice())
    }

    /// Up to `k` other users ranked by cosine similarity to `user_id`
    ///
    /// Ties are broken by ascending user id. Returns an empty list for users
    /// without history.
    pub fn nearest_neighbors(&self, user_id: UserId, k: usize) -> Vec<(UserId, f64)> {
        let Some(target) = self.row(user_id) else {
            return Vec::new();
        };

        let mut neighbors: Vec<(UserId, f64)> = self
            .users
            .iter()
            .zip(&self.counts)
            .filter(|(other, _)| **other != user_id)
            .map(|(other, row)| (*other, cosine_similarity(target, row)))
            .collect();

        // users are already ascending, so a stable sort keeps id order on ties
        neighbors.sort_by(|a, b| b.1.total_cmp(&a.1));
        neighbors.truncate(k);
        neighbors
    }
}

/// Surfaces listings popular among users with similar interaction patterns
#[derive(Debug, Clone, Copy)]
pub struct CollaborativeScorer {
    max_neighbors: usize,
}

impl Default for CollaborativeScorer {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_NEIGHBORS)
    }
}

impl CollaborativeScorer {
    pub fn new(max_neighbors: usize) -> Self {
        Self { max_neighbors }
    }

    /// Returns at most `n` approved listings favoured by the user's neighbours
    ///
    /// The score of each listing is the number of neighbour interaction rows
    /// that reference it. Listings with equal counts keep the order in which
    /// they first appear in the log. Ids that are missing from the approved
    /// catalog are dropped after truncation, so fewer than `n` may be returned.
    pub fn recommend<'a>(
        &self,
        user_id: UserId,
        log: &[Interaction],
        catalog: &'a [Listing],
        n: usize,
    ) -> Vec<ScoredListing<'a>> {
        if log.is_empty() || catalog.is_empty() || n == 0 {
            return Vec::new();
        }

        let matrix = InteractionMatrix::from_log(log);
        let neighbors = matrix.nearest_neighbors(user_id, self.max_neighbors);
        if neighbors.is_empty() {
            tracing::debug!(user_id, "No interaction history, skipping collaborative scoring");
            return Vec::new();
        }

        let neighbor_ids: HashSet<UserId> = neighbors.iter().map(|(id, _)| *id).collect();

        let mut order: Vec<ListingId> = Vec::new();
        let mut frequency: HashMap<ListingId, usize> = HashMap::new();
        for interaction in log.iter().filter(|i| neighbor_ids.contains(&i.user_id)) {
            let count = frequency.entry(interaction.listing_id).or_insert(0);
            if *count == 0 {
                order.push(interaction.listing_id);
            }
            *count += 1;
        }

        let mut ranked: Vec<(ListingId, usize)> =
            order.into_iter().map(|id| (id, frequency[&id])).collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1));
        ranked.truncate(n);

        let approved: HashMap<ListingId, &'a Listing> = catalog
            .iter()
            .filter(|l| l.is_approved())
            .map(|l| (l.id, l))
            .collect();

        let results: Vec<ScoredListing<'a>> = ranked
            .into_iter()
            .filter_map(|(id, count)| {
                approved.get(&id).copied().map(|listing| ScoredListing {
                    listing,
                    score: count as f64,
                })
            })
            .collect();

        tracing::debug!(
            user_id,
            neighbors = neighbors.len(),
            candidates = results.len(),
            "Collaborative scoring completed"
        );

        results
    }
}
