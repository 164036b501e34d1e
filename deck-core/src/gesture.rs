//! Gesture state machine for the top card.
//!
//! This module turns raw drag input and button presses into a discrete swipe
//! decision. Like the rest of the crate it is pure: [`GestureState::on_event`]
//! takes an event and returns the next state plus the [`Action`]s to execute.
//! Animations are identified by [`AnimationId`]; completion events carrying
//! an id other than the running one are ignored, so each swipe completes
//! exactly once.

use crate::config::SwipeConfig;
use swipedeck_types::{PersonId, SwipeAction};

/// A 2D card offset in layout units.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Offset {
    /// Horizontal displacement; positive is right.
    pub x: f64,
    /// Vertical displacement; positive is down.
    pub y: f64,
}

impl Offset {
    /// The resting position.
    pub const ZERO: Offset = Offset { x: 0.0, y: 0.0 };

    /// Create an offset.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Which way a card leaves the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Dislike.
    Left,
    /// Like.
    Right,
}

impl Direction {
    /// `-1.0` for left, `1.0` for right.
    pub fn sign(&self) -> f64 {
        match self {
            Self::Left => -1.0,
            Self::Right => 1.0,
        }
    }

    /// The backend action recorded for this direction.
    pub fn action(&self) -> SwipeAction {
        match self {
            Self::Left => SwipeAction::Dislike,
            Self::Right => SwipeAction::Like,
        }
    }

    /// The intent shown while swiping this way.
    pub fn intent(&self) -> SwipeIntent {
        match self {
            Self::Left => SwipeIntent::Dislike,
            Self::Right => SwipeIntent::Like,
        }
    }
}

impl From<SwipeAction> for Direction {
    fn from(action: SwipeAction) -> Self {
        match action {
            SwipeAction::Like => Self::Right,
            SwipeAction::Dislike => Self::Left,
        }
    }
}

/// Live, pre-commit direction derived from the drag offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SwipeIntent {
    /// Within the dead zone.
    #[default]
    None,
    /// Dragged right past the intent threshold.
    Like,
    /// Dragged left past the intent threshold.
    Dislike,
}

impl SwipeIntent {
    /// Intent for a horizontal offset.
    pub fn from_offset(dx: f64, threshold: f64) -> Self {
        if dx > threshold {
            Self::Like
        } else if dx < -threshold {
            Self::Dislike
        } else {
            Self::None
        }
    }
}

/// What started a swipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwipeSource {
    /// Drag and release.
    Gesture,
    /// Like/dislike button.
    Button,
}

/// Identity of one running animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct AnimationId(u64);

impl AnimationId {
    /// Create an id from a raw value.
    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// Raw value.
    pub fn value(&self) -> u64 {
        self.0
    }

    /// The id after this one.
    pub fn next(&self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// The swipe being animated out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingAnimation {
    /// Profile leaving the deck.
    pub person: PersonId,
    /// Exit direction.
    pub direction: Direction,
    /// Gesture or button.
    pub source: SwipeSource,
}

/// Gesture state - NO I/O, just state transitions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GestureState {
    /// Card at rest, accepting input.
    #[default]
    Idle,
    /// Finger down, card following the drag.
    Dragging {
        /// Cumulative drag offset.
        offset: Offset,
        /// Live intent for `offset`.
        intent: SwipeIntent,
    },
    /// Released below both thresholds, returning to rest.
    Springback {
        /// Offset the card is returning from.
        from: Offset,
        /// Running animation.
        animation: AnimationId,
    },
    /// Committed swipe, card animating out. Input is ignored.
    AnimatingExit {
        /// The swipe being completed.
        pending: PendingAnimation,
        /// Running animation.
        animation: AnimationId,
    },
}

/// Input to the gesture state machine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// The finger moved; `dx`/`dy` are cumulative since touch start.
    DragMoved {
        /// Horizontal delta.
        dx: f64,
        /// Vertical delta.
        dy: f64,
    },
    /// The finger lifted.
    Released {
        /// Horizontal delta.
        dx: f64,
        /// Vertical delta.
        dy: f64,
        /// Horizontal velocity in units per millisecond.
        vx: f64,
    },
    /// A like or dislike button was pressed.
    ButtonPressed {
        /// Swipe direction for the button.
        direction: Direction,
    },
    /// The springback animation finished.
    SpringbackFinished {
        /// Which animation finished.
        animation: AnimationId,
    },
    /// The exit (or pop) animation finished.
    ExitFinished {
        /// Which animation finished.
        animation: AnimationId,
    },
}

/// Side effects requested by a transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Move the card to this offset.
    UpdatePose {
        /// New card offset.
        offset: Offset,
    },
    /// The live intent changed.
    SetIntent(SwipeIntent),
    /// Animate the card from `from` back to rest.
    StartSpringback {
        /// Animation id to report on completion.
        animation: AnimationId,
        /// Start offset.
        from: Offset,
    },
    /// Block feed synchronization. Always precedes the exit animation.
    SuppressFeed,
    /// Animate the card off-screen.
    StartExit {
        /// Animation id to report on completion.
        animation: AnimationId,
        /// Exit direction.
        direction: Direction,
        /// Start offset.
        from: Offset,
    },
    /// Run the button pop animation.
    StartPop {
        /// Animation id to report on completion.
        animation: AnimationId,
        /// Button direction.
        direction: Direction,
    },
    /// The exit animation completed; remove the head and notify.
    CompleteSwipe {
        /// The swipe that completed.
        pending: PendingAnimation,
    },
}

impl Action {
    /// Check whether this action starts an animation.
    pub fn starts_animation(&self) -> bool {
        matches!(
            self,
            Self::StartSpringback { .. } | Self::StartExit { .. } | Self::StartPop { .. }
        )
    }
}

/// Read-only inputs a transition needs besides the event.
#[derive(Debug, Clone, Copy)]
pub struct GestureContext<'a> {
    /// The top card of the deck, if any.
    pub top: Option<PersonId>,
    /// Id to assign if this transition starts an animation.
    pub next_animation: AnimationId,
    /// Thresholds.
    pub config: &'a SwipeConfig,
}

/// Decide the outcome of a release.
///
/// Either signal is sufficient. Rightward checks win when both directions
/// qualify (e.g. dragged right, flicked left).
pub fn decide_release(dx: f64, vx: f64, config: &SwipeConfig) -> Option<Direction> {
    if dx > config.distance_threshold || vx > config.velocity_threshold {
        Some(Direction::Right)
    } else if dx < -config.distance_threshold || vx < -config.velocity_threshold {
        Some(Direction::Left)
    } else {
        None
    }
}

impl GestureState {
    /// Create a state machine at rest.
    pub fn new() -> Self {
        Self::Idle
    }

    /// Process an event and return the new state plus actions to execute.
    pub fn on_event(self, event: Event, ctx: &GestureContext<'_>) -> (Self, Vec<Action>) {
        match (self, event) {
            // Start or continue a drag
            (Self::Idle | Self::Springback { .. }, Event::DragMoved { dx, dy }) => {
                match ctx.top {
                    Some(_) => drag_to(SwipeIntent::None, Offset::new(dx, dy), ctx.config),
                    None => (self, vec![]),
                }
            }
            (Self::Dragging { offset, intent }, Event::DragMoved { dx, dy }) => match ctx.top {
                Some(_) => drag_to(intent, Offset::new(dx, dy), ctx.config),
                // Deck emptied under the finger
                None => spring_back(offset, intent, ctx),
            },

            // Release
            (Self::Dragging { intent, .. }, Event::Released { dx, dy, vx }) => {
                let offset = Offset::new(dx, dy);
                match (ctx.top, decide_release(dx, vx, ctx.config)) {
                    (Some(person), Some(direction)) => {
                        let pending = PendingAnimation {
                            person,
                            direction,
                            source: SwipeSource::Gesture,
                        };
                        (
                            Self::AnimatingExit {
                                pending,
                                animation: ctx.next_animation,
                            },
                            vec![
                                Action::UpdatePose { offset },
                                Action::SuppressFeed,
                                Action::StartExit {
                                    animation: ctx.next_animation,
                                    direction,
                                    from: offset,
                                },
                            ],
                        )
                    }
                    _ => spring_back(offset, intent, ctx),
                }
            }

            // Buttons
            (Self::Idle | Self::Springback { .. }, Event::ButtonPressed { direction }) => {
                let Some(person) = ctx.top else {
                    return (self, vec![]);
                };
                let mut actions = Vec::new();
                if matches!(self, Self::Springback { .. }) {
                    actions.push(Action::UpdatePose {
                        offset: Offset::ZERO,
                    });
                }
                actions.push(Action::SuppressFeed);
                actions.push(Action::StartPop {
                    animation: ctx.next_animation,
                    direction,
                });
                (
                    Self::AnimatingExit {
                        pending: PendingAnimation {
                            person,
                            direction,
                            source: SwipeSource::Button,
                        },
                        animation: ctx.next_animation,
                    },
                    actions,
                )
            }

            // Completions
            (Self::Springback { animation, .. }, Event::SpringbackFinished { animation: done })
                if animation == done =>
            {
                (
                    Self::Idle,
                    vec![Action::UpdatePose {
                        offset: Offset::ZERO,
                    }],
                )
            }
            (Self::AnimatingExit { pending, animation }, Event::ExitFinished { animation: done })
                if animation == done =>
            {
                (Self::Idle, vec![Action::CompleteSwipe { pending }])
            }

            // Everything else, including input while animating out and
            // completions of superseded animations
            (state, _) => (state, vec![]),
        }
    }

    /// Check if a swipe is committed and animating out.
    pub fn is_animating_exit(&self) -> bool {
        matches!(self, Self::AnimatingExit { .. })
    }

    /// Check if the finger is down.
    pub fn is_dragging(&self) -> bool {
        matches!(self, Self::Dragging { .. })
    }

    /// The current live intent.
    pub fn intent(&self) -> SwipeIntent {
        match self {
            Self::Dragging { intent, .. } => *intent,
            Self::AnimatingExit { pending, .. } if pending.source == SwipeSource::Gesture => {
                pending.direction.intent()
            }
            _ => SwipeIntent::None,
        }
    }
}

fn drag_to(
    previous: SwipeIntent,
    offset: Offset,
    config: &SwipeConfig,
) -> (GestureState, Vec<Action>) {
    let intent = SwipeIntent::from_offset(offset.x, config.intent_threshold);
    let mut actions = vec![Action::UpdatePose { offset }];
    if intent != previous {
        actions.push(Action::SetIntent(intent));
    }
    (GestureState::Dragging { offset, intent }, actions)
}

fn spring_back(
    from: Offset,
    intent: SwipeIntent,
    ctx: &GestureContext<'_>,
) -> (GestureState, Vec<Action>) {
    let mut actions = vec![Action::UpdatePose { offset: from }];
    if intent != SwipeIntent::None {
        actions.push(Action::SetIntent(SwipeIntent::None));
    }
    actions.push(Action::StartSpringback {
        animation: ctx.next_animation,
        from,
    });
    (
        GestureState::Springback {
            from,
            animation: ctx.next_animation,
        },
        actions,
    )
}
