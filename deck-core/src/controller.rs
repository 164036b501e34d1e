//! The swipe controller: one owner for the deck and the gesture state.
//!
//! [`SwipeController`] is the single writer of the [`Deck`]. Feed
//! synchronization goes through [`SwipeController::sync`] and swipe
//! completion through [`SwipeController::handle`]; both answer with
//! [`Effect`]s describing what the outside world should do.
//!
//! On completion the effects are always ordered:
//! 1. [`Effect::DeckChanged`] (the head is already gone)
//! 2. [`Effect::ResetVisuals`]
//! 3. [`Effect::Swiped`] (exactly once per swipe)
//! 4. [`Effect::ReleaseSuppressionAfter`]
//! 5. [`Effect::Prefetch`]

use std::time::Duration;

use swipedeck_types::{PersonId, Profile};

use crate::config::SwipeConfig;
use crate::deck::{Deck, SuppressionToken};
use crate::gesture::{
    Action, AnimationId, Direction, Event, GestureContext, GestureState, Offset, SwipeIntent,
    SwipeSource,
};
use crate::motion::{CardPose, ExitMotion, PopMotion};

/// Output of the controller.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// The deck changed.
    DeckChanged {
        /// Cards remaining.
        len: usize,
        /// New top card.
        top: Option<PersonId>,
    },
    /// Draw the top card at this pose.
    Pose(CardPose),
    /// The live intent changed.
    Intent(SwipeIntent),
    /// Start the springback animation; report completion with
    /// [`Event::SpringbackFinished`].
    AnimateSpringback {
        /// Animation id.
        animation: AnimationId,
        /// Start offset.
        from: Offset,
        /// Duration.
        duration: Duration,
    },
    /// Start the exit animation; report completion with
    /// [`Event::ExitFinished`].
    AnimateExit {
        /// Animation id.
        animation: AnimationId,
        /// Exit direction.
        direction: Direction,
        /// Curves to sample.
        motion: ExitMotion,
        /// Duration.
        duration: Duration,
    },
    /// Start the button pop animation; report completion with
    /// [`Event::ExitFinished`].
    AnimatePop {
        /// Animation id.
        animation: AnimationId,
        /// Button direction.
        direction: Direction,
        /// Curve to sample.
        motion: PopMotion,
        /// Duration.
        duration: Duration,
    },
    /// Reset offset, promotion and intent to rest.
    ResetVisuals,
    /// A swipe completed. The profile is no longer in the deck.
    Swiped {
        /// Like or dislike.
        direction: Direction,
        /// Gesture or button.
        source: SwipeSource,
        /// The removed profile.
        profile: Profile,
    },
    /// Call [`SwipeController::release_suppression`] with `token` after
    /// `delay`.
    ReleaseSuppressionAfter {
        /// Token to release.
        token: SuppressionToken,
        /// Delay before release.
        delay: Duration,
    },
    /// Warm these image URLs. Failures are irrelevant.
    Prefetch {
        /// Primary photo URLs of the upcoming cards.
        urls: Vec<String>,
    },
}

/// Owns the deck and drives the gesture state machine.
#[derive(Debug, Clone)]
pub struct SwipeController {
    config: SwipeConfig,
    deck: Deck,
    gesture: GestureState,
    next_animation: AnimationId,
    /// Suppression taken for the swipe in flight.
    in_flight: Option<SuppressionToken>,
}

impl SwipeController {
    /// Create a controller with an empty deck.
    pub fn new(config: SwipeConfig) -> Self {
        Self {
            config,
            deck: Deck::new(),
            gesture: GestureState::new(),
            next_animation: AnimationId::default(),
            in_flight: None,
        }
    }

    /// Thresholds and timings.
    pub fn config(&self) -> &SwipeConfig {
        &self.config
    }

    /// Read-only view of the deck.
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    /// Current gesture state.
    pub fn gesture(&self) -> GestureState {
        self.gesture
    }

    /// Reconcile the flattened feed into the deck.
    pub fn sync(&mut self, incoming: &[Profile]) -> Vec<Effect> {
        if self.deck.reconcile(incoming).changed() {
            self.deck_changed()
        } else {
            vec![]
        }
    }

    /// Feed a gesture event through the state machine.
    pub fn handle(&mut self, event: Event) -> Vec<Effect> {
        let ctx = GestureContext {
            top: self.deck.top().map(|p| p.id),
            next_animation: self.next_animation,
            config: &self.config,
        };
        let (next, actions) = self.gesture.on_event(event, &ctx);
        self.gesture = next;
        if actions.iter().any(Action::starts_animation) {
            self.next_animation = self.next_animation.next();
        }

        let mut effects = Vec::new();
        for action in actions {
            self.execute(action, &mut effects);
        }
        effects
    }

    /// Lift the suppression taken by a completed swipe.
    ///
    /// Returns `true` if sync is re-enabled. A token from an older swipe
    /// is ignored while a newer one is in flight.
    pub fn release_suppression(&mut self, token: SuppressionToken) -> bool {
        self.deck.release(token)
    }

    /// Check if feed sync is currently blocked.
    pub fn is_suppressed(&self) -> bool {
        self.deck.is_suppressed()
    }

    /// Whether the feed should fetch another page now.
    pub fn wants_more(&self, has_more: bool) -> bool {
        has_more && self.deck.len() <= self.config.low_water_mark
    }

    fn execute(&mut self, action: Action, effects: &mut Vec<Effect>) {
        match action {
            Action::UpdatePose { offset } => {
                effects.push(Effect::Pose(CardPose::at(offset, &self.config)));
            }
            Action::SetIntent(intent) => effects.push(Effect::Intent(intent)),
            Action::StartSpringback { animation, from } => {
                effects.push(Effect::AnimateSpringback {
                    animation,
                    from,
                    duration: self.config.springback_duration(),
                });
            }
            Action::SuppressFeed => {
                self.in_flight = Some(self.deck.suppress());
            }
            Action::StartExit {
                animation,
                direction,
                from,
            } => {
                let motion = ExitMotion::new(from, direction, &self.config);
                effects.push(Effect::AnimateExit {
                    animation,
                    direction,
                    motion,
                    duration: motion.duration(),
                });
            }
            Action::StartPop {
                animation,
                direction,
            } => {
                let motion = PopMotion::new(&self.config);
                effects.push(Effect::AnimatePop {
                    animation,
                    direction,
                    motion,
                    duration: motion.duration(),
                });
            }
            Action::CompleteSwipe { pending } => {
                // The deck is suppressed for the whole animation, so the
                // head is still the pending profile.
                let head_matches = self.deck.top().map(|p| p.id) == Some(pending.person);
                let removed = if head_matches {
                    self.deck.pop_front()
                } else {
                    None
                };
                if let Some(profile) = removed {
                    effects.push(Effect::DeckChanged {
                        len: self.deck.len(),
                        top: self.deck.top().map(|p| p.id),
                    });
                    effects.push(Effect::ResetVisuals);
                    effects.push(Effect::Swiped {
                        direction: pending.direction,
                        source: pending.source,
                        profile,
                    });
                } else {
                    effects.push(Effect::ResetVisuals);
                }
                if let Some(token) = self.in_flight.take() {
                    effects.push(Effect::ReleaseSuppressionAfter {
                        token,
                        delay: self.config.release_delay(),
                    });
                }
                effects.push(self.prefetch());
            }
        }
    }

    fn deck_changed(&self) -> Vec<Effect> {
        vec![
            Effect::DeckChanged {
                len: self.deck.len(),
                top: self.deck.top().map(|p| p.id),
            },
            self.prefetch(),
        ]
    }

    fn prefetch(&self) -> Effect {
        Effect::Prefetch {
            urls: self.deck.upcoming_photos(self.config.prefetch_window),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deck::tests::{people, person};

    fn controller(ids: &[i64]) -> SwipeController {
        let mut controller = SwipeController::new(SwipeConfig::default());
        controller.sync(&people(ids));
        controller
    }

    fn swipe(controller: &mut SwipeController, dx: f64, vx: f64) -> Vec<Effect> {
        controller.handle(Event::DragMoved { dx, dy: 0.0 });
        controller.handle(Event::Released { dx, dy: 0.0, vx })
    }

    fn exit_animation(effects: &[Effect]) -> Option<AnimationId> {
        effects.iter().find_map(|e| match e {
            Effect::AnimateExit { animation, .. } | Effect::AnimatePop { animation, .. } => {
                Some(*animation)
            }
            _ => None,
        })
    }

    fn swiped(effects: &[Effect]) -> Vec<(Direction, PersonId)> {
        effects
            .iter()
            .filter_map(|e| match e {
                Effect::Swiped {
                    direction, profile, ..
                } => Some((*direction, profile.id)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn first_sync_reports_deck_and_prefetch() {
        let mut controller = SwipeController::new(SwipeConfig::default());
        let effects = controller.sync(&people(&[1, 2, 3, 4, 5, 6, 7]));

        assert_eq!(
            effects[0],
            Effect::DeckChanged {
                len: 7,
                top: Some(PersonId::new(1)),
            }
        );
        match &effects[1] {
            Effect::Prefetch { urls } => assert_eq!(urls.len(), 5),
            other => panic!("expected prefetch, got {:?}", other),
        }
    }

    #[test]
    fn unchanged_sync_is_silent() {
        let mut controller = controller(&[1, 2]);
        assert!(controller.sync(&people(&[1, 2])).is_empty());
        assert!(controller.sync(&[]).is_empty());
    }

    #[test]
    fn end_to_end_right_swipe() {
        let mut controller = controller(&[1, 2]);

        let effects = swipe(&mut controller, 150.0, 0.0);
        assert!(controller.is_suppressed());
        let animation = exit_animation(&effects).unwrap();
        assert_eq!(controller.deck().len(), 2);

        let effects = controller.handle(Event::ExitFinished { animation });

        assert_eq!(controller.deck().ids(), vec![PersonId::new(2)]);
        assert_eq!(swiped(&effects), vec![(Direction::Right, PersonId::new(1))]);

        let token = effects
            .iter()
            .find_map(|e| match e {
                Effect::ReleaseSuppressionAfter { token, delay } => {
                    assert_eq!(*delay, Duration::from_millis(350));
                    Some(*token)
                }
                _ => None,
            })
            .unwrap();

        // Still suppressed until the delay elapses
        assert!(controller.is_suppressed());
        assert!(controller.release_suppression(token));
        assert!(!controller.is_suppressed());
    }

    #[test]
    fn completion_effects_are_ordered() {
        let mut controller = controller(&[1, 2]);
        let animation = exit_animation(&swipe(&mut controller, -150.0, 0.0)).unwrap();

        let effects = controller.handle(Event::ExitFinished { animation });

        let kinds: Vec<&str> = effects
            .iter()
            .map(|e| match e {
                Effect::DeckChanged { .. } => "deck",
                Effect::ResetVisuals => "reset",
                Effect::Swiped { .. } => "swiped",
                Effect::ReleaseSuppressionAfter { .. } => "release",
                Effect::Prefetch { .. } => "prefetch",
                _ => "other",
            })
            .collect();
        assert_eq!(kinds, vec!["deck", "reset", "swiped", "release", "prefetch"]);
    }

    #[test]
    fn profile_is_gone_when_callback_fires() {
        let mut controller = controller(&[1, 2]);
        let animation = exit_animation(&swipe(&mut controller, 150.0, 0.0)).unwrap();

        let effects = controller.handle(Event::ExitFinished { animation });
        let deck_effect = effects
            .iter()
            .position(|e| matches!(e, Effect::DeckChanged { .. }))
            .unwrap();
        let swiped_effect = effects
            .iter()
            .position(|e| matches!(e, Effect::Swiped { .. }))
            .unwrap();

        assert!(deck_effect < swiped_effect);
        assert!(!controller.deck().contains(&PersonId::new(1)));
    }

    #[test]
    fn refetch_during_swipe_is_discarded() {
        let mut controller = controller(&[1, 2]);
        let animation = exit_animation(&swipe(&mut controller, 150.0, 0.0)).unwrap();

        assert!(controller.sync(&people(&[1, 2, 9])).is_empty());

        let effects = controller.handle(Event::ExitFinished { animation });
        assert!(controller.sync(&people(&[1, 2, 9])).is_empty());
        assert_eq!(controller.deck().ids(), vec![PersonId::new(2)]);

        let token = effects
            .iter()
            .find_map(|e| match e {
                Effect::ReleaseSuppressionAfter { token, .. } => Some(*token),
                _ => None,
            })
            .unwrap();
        controller.release_suppression(token);

        // Late refetch still carries the swiped profile; it stays out
        controller.sync(&people(&[1, 2, 9]));
        assert_eq!(
            controller.deck().ids(),
            vec![PersonId::new(2), PersonId::new(9)]
        );
    }

    #[test]
    fn springback_fires_no_callback() {
        let mut controller = controller(&[1, 2]);
        let effects = swipe(&mut controller, 50.0, 0.1);

        assert!(!controller.is_suppressed());
        let animation = effects
            .iter()
            .find_map(|e| match e {
                Effect::AnimateSpringback { animation, .. } => Some(*animation),
                _ => None,
            })
            .unwrap();

        let effects = controller.handle(Event::SpringbackFinished { animation });
        assert!(swiped(&effects).is_empty());
        assert_eq!(effects, vec![Effect::Pose(CardPose::rest())]);
        assert_eq!(controller.deck().len(), 2);
    }

    #[test]
    fn velocity_release_likes() {
        let mut controller = controller(&[1, 2]);
        let effects = swipe(&mut controller, 50.0, 0.35);
        let direction = effects.iter().find_map(|e| match e {
            Effect::AnimateExit { direction, .. } => Some(*direction),
            _ => None,
        });
        assert_eq!(direction, Some(Direction::Right));
    }

    #[test]
    fn button_swipe_completes_once() {
        let mut controller = controller(&[1, 2, 3]);
        let effects = controller.handle(Event::ButtonPressed {
            direction: Direction::Left,
        });
        let animation = exit_animation(&effects).unwrap();
        assert!(matches!(effects[0], Effect::AnimatePop { .. }));

        let first = controller.handle(Event::ExitFinished { animation });
        let second = controller.handle(Event::ExitFinished { animation });

        assert_eq!(swiped(&first), vec![(Direction::Left, PersonId::new(1))]);
        assert!(second.is_empty());
        assert_eq!(controller.deck().len(), 2);
    }

    #[test]
    fn stale_release_does_not_unblock_newer_swipe() {
        let mut controller = controller(&[1, 2, 3]);

        let animation = exit_animation(&swipe(&mut controller, 150.0, 0.0)).unwrap();
        let effects = controller.handle(Event::ExitFinished { animation });
        let first_token = effects
            .iter()
            .find_map(|e| match e {
                Effect::ReleaseSuppressionAfter { token, .. } => Some(*token),
                _ => None,
            })
            .unwrap();

        // Second swipe starts before the first delay elapses
        swipe(&mut controller, 150.0, 0.0);
        assert!(!controller.release_suppression(first_token));
        assert!(controller.is_suppressed());
    }

    #[test]
    fn animation_ids_are_unique() {
        let mut controller = controller(&[1, 2, 3]);
        let first = exit_animation(&swipe(&mut controller, 150.0, 0.0)).unwrap();
        controller.handle(Event::ExitFinished { animation: first });
        let second = exit_animation(&swipe(&mut controller, 150.0, 0.0)).unwrap();
        assert_ne!(first, second);

        // Completion for the first animation cannot complete the second swipe
        assert!(controller
            .handle(Event::ExitFinished { animation: first })
            .is_empty());
    }

    #[test]
    fn swiping_last_card_empties_deck() {
        let mut controller = controller(&[1]);
        let animation = exit_animation(&swipe(&mut controller, 150.0, 0.0)).unwrap();
        let effects = controller.handle(Event::ExitFinished { animation });

        assert!(effects.contains(&Effect::DeckChanged { len: 0, top: None }));
        assert!(effects.contains(&Effect::Prefetch { urls: vec![] }));

        // No further swipes on an empty deck
        assert!(swipe(&mut controller, 150.0, 0.0).is_empty());
    }

    #[test]
    fn wants_more_at_low_water_mark() {
        let small = controller(&[1, 2]);
        assert!(small.wants_more(true));
        assert!(!small.wants_more(false));

        let big = controller(&[1, 2, 3]);
        assert!(!big.wants_more(true));
    }

    #[test]
    fn drag_reports_pose_and_intent() {
        let mut controller = controller(&[1]);
        let effects = controller.handle(Event::DragMoved { dx: 60.0, dy: 0.0 });

        match &effects[0] {
            Effect::Pose(pose) => assert!((pose.like_opacity - 0.5).abs() < 1e-9),
            other => panic!("expected pose, got {:?}", other),
        }
        assert_eq!(effects[1], Effect::Intent(SwipeIntent::Like));
    }

    #[test]
    fn sync_appends_behind_top() {
        let mut controller = controller(&[1]);
        controller.sync(&[person(2)]);
        assert_eq!(
            controller.deck().ids(),
            vec![PersonId::new(1), PersonId::new(2)]
        );
    }
}
