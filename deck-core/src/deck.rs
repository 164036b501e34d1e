//! The locally-owned deck and its feed synchronizer.
//!
//! The deck is an ordered list of not-yet-swiped profiles with three rules:
//! - The first synchronization copies the incoming feed in order
//! - Later synchronizations only append unseen profiles at the tail
//! - A profile removed by a completed swipe never comes back
//!
//! While a swipe is in flight the deck is *suppressed*: incoming feeds are
//! discarded outright so a refetch triggered mid-animation cannot re-insert
//! the card that is leaving.

use std::collections::{HashSet, VecDeque};
use swipedeck_types::{PersonId, Profile};

/// Proof of a suppression request.
///
/// Only the most recent token can lift suppression, so a late release from
/// an earlier swipe cannot unblock sync while a newer swipe is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SuppressionToken(u64);

impl SuppressionToken {
    /// Numeric value (monotonic per deck).
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Outcome of a [`Deck::reconcile`] call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reconciled {
    /// Suppression was active; the incoming list was discarded.
    Suppressed,
    /// Nothing new to merge.
    Unchanged,
    /// The deck was empty and was filled with this many profiles.
    Filled(usize),
    /// This many unseen profiles were appended to the tail.
    Appended(usize),
}

impl Reconciled {
    /// Whether the deck contents changed.
    pub fn changed(&self) -> bool {
        matches!(self, Self::Filled(_) | Self::Appended(_))
    }
}

/// Ordered, append-only deck of profiles.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    /// Cards in display order; the head is the top card.
    cards: VecDeque<Profile>,
    /// Ids currently in `cards`.
    present: HashSet<PersonId>,
    /// Ids removed by completed swipes.
    swiped: HashSet<PersonId>,
    /// Active suppression, if any.
    suppression: Option<SuppressionToken>,
    /// Next token value to hand out.
    next_token: u64,
}

impl Deck {
    /// Create an empty deck.
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge the flattened feed into the deck.
    ///
    /// No-op while suppressed. An empty `incoming` is nothing to merge.
    pub fn reconcile(&mut self, incoming: &[Profile]) -> Reconciled {
        if self.suppression.is_some() {
            return Reconciled::Suppressed;
        }
        if incoming.is_empty() {
            return Reconciled::Unchanged;
        }

        let was_empty = self.cards.is_empty();
        let mut added = 0;
        for profile in incoming {
            if self.swiped.contains(&profile.id) || self.present.contains(&profile.id) {
                continue;
            }
            self.present.insert(profile.id);
            self.cards.push_back(profile.clone());
            added += 1;
        }

        match (added, was_empty) {
            (0, _) => Reconciled::Unchanged,
            (n, true) => Reconciled::Filled(n),
            (n, false) => Reconciled::Appended(n),
        }
    }

    /// Block reconciliation until the returned token is released.
    pub fn suppress(&mut self) -> SuppressionToken {
        let token = SuppressionToken(self.next_token);
        self.next_token = self.next_token.saturating_add(1);
        self.suppression = Some(token);
        token
    }

    /// Lift suppression if `token` is the most recent one.
    ///
    /// Returns `true` if suppression was lifted.
    pub fn release(&mut self, token: SuppressionToken) -> bool {
        if self.suppression == Some(token) {
            self.suppression = None;
            true
        } else {
            false
        }
    }

    /// Check whether reconciliation is currently blocked.
    pub fn is_suppressed(&self) -> bool {
        self.suppression.is_some()
    }

    /// Remove the top card, remembering its id forever.
    pub fn pop_front(&mut self) -> Option<Profile> {
        let profile = self.cards.pop_front()?;
        self.present.remove(&profile.id);
        self.swiped.insert(profile.id);
        Some(profile)
    }

    /// The top card.
    pub fn top(&self) -> Option<&Profile> {
        self.cards.front()
    }

    /// Number of cards in the deck.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    /// Check if the deck is empty.
    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Check if a profile is currently in the deck.
    pub fn contains(&self, id: &PersonId) -> bool {
        self.present.contains(id)
    }

    /// Check if a profile was removed by a completed swipe.
    pub fn was_swiped(&self, id: &PersonId) -> bool {
        self.swiped.contains(id)
    }

    /// Iterate over the cards in display order.
    pub fn iter(&self) -> impl Iterator<Item = &Profile> {
        self.cards.iter()
    }

    /// Ids in display order.
    pub fn ids(&self) -> Vec<PersonId> {
        self.cards.iter().map(|p| p.id).collect()
    }

    /// Primary photo URLs of the first `window` cards.
    pub fn upcoming_photos(&self, window: usize) -> Vec<String> {
        self.cards
            .iter()
            .take(window)
            .filter_map(|p| p.primary_photo().map(|photo| photo.url.clone()))
            .collect()
    }
}
