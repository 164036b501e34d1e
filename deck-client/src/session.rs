//! SwipeSession - the running deck behind a single-writer event loop.
//!
//! The session owns a [`SwipeController`] and a [`FeedPages`] and is the only
//! code that touches them. Everything else talks to it through a
//! [`SessionHandle`]: gesture input, refreshes, and the completions of the
//! timers and requests the session itself spawned all arrive as commands on
//! one channel and are applied in order.
//!
//! # Architecture
//!
//! ```text
//! UI input ─┐
//! timers  ──┼─> commands ─> SessionLoop ─> SwipeController (pure)
//! requests ─┘                   │
//!                               └─> SessionEvent stream
//! ```
//!
//! # Example
//!
//! ```ignore
//! let mut session = SwipeSession::spawn(config, Arc::new(api), Arc::new(NoopPrefetcher));
//! let handle = session.handle();
//! handle.refresh()?;
//! handle.drag(150.0, 0.0)?;
//! handle.release(150.0, 0.0, 0.0)?;
//! while let Some(event) = session.next_event().await {
//!     println!("{:?}", event);
//! }
//! ```

use std::sync::Arc;
use std::time::Duration;

use swipedeck_core::{
    AnimationId, CardPose, Direction, Effect, Event, ExitMotion, FeedPages, GestureState, Offset,
    PopMotion, SuppressionToken, SwipeConfig, SwipeController, SwipeIntent, SwipeSource,
};
use swipedeck_types::{DislikeResponse, LikeResponse, Page, PersonId, Profile, SwipeAction};
use thiserror::Error;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::api::{ApiError, PeopleApi};
use crate::prefetch::ImagePrefetcher;

/// Session errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SessionError {
    /// The session loop has stopped.
    #[error("session closed")]
    Closed,
}

/// Which animation started.
#[derive(Debug, Clone, PartialEq)]
pub enum AnimationKind {
    /// Card returning to rest.
    Springback {
        /// Start offset.
        from: Offset,
    },
    /// Card flying off-screen.
    Exit {
        /// Exit direction.
        direction: Direction,
        /// Curves to sample.
        motion: ExitMotion,
    },
    /// Button icon pop.
    Pop {
        /// Button direction.
        direction: Direction,
        /// Curve to sample.
        motion: PopMotion,
    },
}

/// Notifications from the session.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// The deck changed.
    DeckChanged {
        /// Cards remaining.
        len: usize,
        /// Top card.
        top: Option<PersonId>,
    },
    /// Draw the top card at this pose.
    Pose(CardPose),
    /// Live intent changed.
    Intent(SwipeIntent),
    /// An animation started.
    AnimationStarted {
        /// Animation id.
        animation: AnimationId,
        /// What is animating.
        kind: AnimationKind,
        /// How long it runs.
        duration: Duration,
    },
    /// Offset, promotion and intent are back at rest.
    VisualsReset,
    /// A swipe completed; the profile has left the deck.
    Swiped {
        /// Like or dislike.
        direction: Direction,
        /// Gesture or button.
        source: SwipeSource,
        /// The removed profile.
        profile: Profile,
    },
    /// The backend recorded a like.
    Liked {
        /// Who was liked.
        person: PersonId,
        /// Backend response.
        response: LikeResponse,
    },
    /// The backend recorded a dislike.
    Disliked {
        /// Who was disliked.
        person: PersonId,
        /// Backend response.
        response: DislikeResponse,
    },
    /// The like was mutual.
    Matched {
        /// The matched person.
        person: PersonId,
    },
    /// A like/dislike failed or was rejected. The deck is not rolled back.
    ActionFailed {
        /// Target person.
        person: PersonId,
        /// Attempted action.
        action: SwipeAction,
        /// What went wrong.
        error: String,
    },
    /// A feed page arrived.
    FeedLoaded {
        /// Page number.
        page: u32,
        /// Whether more pages exist.
        has_more: bool,
    },
    /// A feed page failed to load.
    FeedFailed {
        /// Page number.
        page: u32,
        /// What went wrong.
        error: String,
    },
    /// Feed sync is enabled again after a swipe.
    SyncResumed,
}

/// Point-in-time view of the session state.
#[derive(Debug, Clone, PartialEq)]
pub struct DeckSnapshot {
    /// Deck ids in display order.
    pub ids: Vec<PersonId>,
    /// Whether feed sync is blocked.
    pub suppressed: bool,
    /// Gesture state.
    pub gesture: GestureState,
    /// Number of feed pages loaded.
    pub loaded_pages: usize,
    /// Whether the feed reported more pages.
    pub has_more: bool,
}

#[derive(Debug)]
enum ActionOutcome {
    Liked(LikeResponse),
    Disliked(DislikeResponse),
}

#[derive(Debug)]
enum Command {
    Input(Event),
    Refresh,
    LoadMore,
    PageLoaded {
        generation: u64,
        page: u32,
        result: Result<Page<Profile>, ApiError>,
    },
    ActionSettled {
        person: PersonId,
        action: SwipeAction,
        result: Result<ActionOutcome, ApiError>,
    },
    ReleaseSuppression(SuppressionToken),
    Snapshot(oneshot::Sender<DeckSnapshot>),
    Shutdown,
}

/// Cloneable sender side of a session.
#[derive(Debug, Clone)]
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<Command>,
}

impl SessionHandle {
    /// Report a finger move (cumulative since touch start).
    pub fn drag(&self, dx: f64, dy: f64) -> Result<(), SessionError> {
        self.send(Command::Input(Event::DragMoved { dx, dy }))
    }

    /// Report the finger lifting, with horizontal velocity in units/ms.
    pub fn release(&self, dx: f64, dy: f64, vx: f64) -> Result<(), SessionError> {
        self.send(Command::Input(Event::Released { dx, dy, vx }))
    }

    /// Press the like (right) or dislike (left) button.
    pub fn press(&self, direction: Direction) -> Result<(), SessionError> {
        self.send(Command::Input(Event::ButtonPressed { direction }))
    }

    /// Invalidate the feed and refetch from page 1.
    pub fn refresh(&self) -> Result<(), SessionError> {
        self.send(Command::Refresh)
    }

    /// Fetch the next feed page, if any and none is in flight.
    pub fn load_more(&self) -> Result<(), SessionError> {
        self.send(Command::LoadMore)
    }

    /// Read the current state.
    pub async fn snapshot(&self) -> Result<DeckSnapshot, SessionError> {
        let (tx, rx) = oneshot::channel();
        self.send(Command::Snapshot(tx))?;
        rx.await.map_err(|_| SessionError::Closed)
    }

    /// Stop the session loop.
    pub fn shutdown(&self) -> Result<(), SessionError> {
        self.send(Command::Shutdown)
    }

    fn send(&self, command: Command) -> Result<(), SessionError> {
        self.commands
            .send(command)
            .map_err(|_| SessionError::Closed)
    }
}

/// A running swipe session.
pub struct SwipeSession {
    handle: SessionHandle,
    events: mpsc::UnboundedReceiver<SessionEvent>,
    task: JoinHandle<()>,
}

impl SwipeSession {
    /// Spawn the session loop on the current tokio runtime.
    ///
    /// The deck starts empty; call [`SessionHandle::refresh`] to load it.
    pub fn spawn(
        config: SwipeConfig,
        api: Arc<dyn PeopleApi>,
        prefetcher: Arc<dyn ImagePrefetcher>,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::unbounded_channel();
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let session = SessionLoop {
            feed: FeedPages::new(config.page_size),
            controller: SwipeController::new(config),
            generation: 0,
            fetching: None,
            api,
            prefetcher,
            commands: command_tx.downgrade(),
            events: event_tx,
        };
        let task = tokio::spawn(session.run(command_rx));

        Self {
            handle: SessionHandle {
                commands: command_tx,
            },
            events: event_rx,
            task,
        }
    }

    /// A handle for sending input.
    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Wait for the next event. `None` once the loop has stopped.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        self.events.recv().await
    }

    /// Take an already-queued event without waiting.
    pub fn try_next_event(&mut self) -> Option<SessionEvent> {
        self.events.try_recv().ok()
    }

    /// Stop the loop and wait for it to exit.
    pub async fn shutdown(self) {
        // Already stopped is fine
        let _ = self.handle.shutdown();
        if let Err(e) = self.task.await {
            warn!(error = %e, "Session task ended abnormally");
        }
    }
}

struct SessionLoop {
    controller: SwipeController,
    feed: FeedPages,
    /// Bumped on every refresh; pages from older generations are dropped.
    generation: u64,
    /// Page currently being fetched.
    fetching: Option<u32>,
    api: Arc<dyn PeopleApi>,
    prefetcher: Arc<dyn ImagePrefetcher>,
    commands: mpsc::WeakUnboundedSender<Command>,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl SessionLoop {
    async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        info!("Swipe session started");
        while let Some(command) = commands.recv().await {
            if !self.dispatch(command) {
                break;
            }
        }
        info!("Swipe session stopped");
    }

    /// Apply one command. Returns `false` to stop the loop.
    fn dispatch(&mut self, command: Command) -> bool {
        match command {
            Command::Input(event) => {
                let effects = self.controller.handle(event);
                if self.apply(effects) {
                    self.maybe_load_more();
                }
            }
            Command::Refresh => self.refresh(),
            Command::LoadMore => self.load_more(),
            Command::PageLoaded {
                generation,
                page,
                result,
            } => self.page_loaded(generation, page, result),
            Command::ActionSettled {
                person,
                action,
                result,
            } => self.action_settled(person, action, result),
            Command::ReleaseSuppression(token) => {
                if self.controller.release_suppression(token) {
                    debug!(token = token.value(), "Feed sync resumed");
                    self.emit(SessionEvent::SyncResumed);
                    let effects = self.controller.sync(&self.feed.flattened());
                    self.apply(effects);
                }
            }
            Command::Snapshot(reply) => {
                let _ = reply.send(self.snapshot());
            }
            Command::Shutdown => return false,
        }
        true
    }

    /// Interpret controller effects. Returns `true` if a swipe completed.
    fn apply(&mut self, effects: Vec<Effect>) -> bool {
        let mut swiped = false;
        for effect in effects {
            match effect {
                Effect::DeckChanged { len, top } => {
                    debug!(len, ?top, "Deck changed");
                    self.emit(SessionEvent::DeckChanged { len, top });
                }
                Effect::Pose(pose) => self.emit(SessionEvent::Pose(pose)),
                Effect::Intent(intent) => self.emit(SessionEvent::Intent(intent)),
                Effect::AnimateSpringback {
                    animation,
                    from,
                    duration,
                } => {
                    self.emit(SessionEvent::AnimationStarted {
                        animation,
                        kind: AnimationKind::Springback { from },
                        duration,
                    });
                    self.after(
                        duration,
                        Command::Input(Event::SpringbackFinished { animation }),
                    );
                }
                Effect::AnimateExit {
                    animation,
                    direction,
                    motion,
                    duration,
                } => {
                    self.emit(SessionEvent::AnimationStarted {
                        animation,
                        kind: AnimationKind::Exit { direction, motion },
                        duration,
                    });
                    self.after(duration, Command::Input(Event::ExitFinished { animation }));
                }
                Effect::AnimatePop {
                    animation,
                    direction,
                    motion,
                    duration,
                } => {
                    self.emit(SessionEvent::AnimationStarted {
                        animation,
                        kind: AnimationKind::Pop { direction, motion },
                        duration,
                    });
                    self.after(duration, Command::Input(Event::ExitFinished { animation }));
                }
                Effect::ResetVisuals => self.emit(SessionEvent::VisualsReset),
                Effect::Swiped {
                    direction,
                    source,
                    profile,
                } => {
                    let person = profile.id;
                    let action = direction.action();
                    info!(%person, %action, "Swipe completed");
                    self.emit(SessionEvent::Swiped {
                        direction,
                        source,
                        profile,
                    });
                    self.submit(person, action);
                    swiped = true;
                }
                Effect::ReleaseSuppressionAfter { token, delay } => {
                    self.after(delay, Command::ReleaseSuppression(token));
                }
                Effect::Prefetch { urls } => self.prefetch(urls),
            }
        }
        swiped
    }

    fn refresh(&mut self) {
        self.feed.invalidate();
        self.generation = self.generation.wrapping_add(1);
        debug!(generation = self.generation, "Feed invalidated");
        self.fetch(1);
    }

    fn load_more(&mut self) {
        if let Some(page) = self.fetching {
            debug!(page, "Fetch already in flight");
            return;
        }
        if let Some(page) = self.feed.next_page() {
            self.fetch(page);
        }
    }

    fn maybe_load_more(&mut self) {
        if self.controller.wants_more(self.feed.has_more()) {
            self.load_more();
        }
    }

    fn fetch(&mut self, page: u32) {
        self.fetching = Some(page);
        let generation = self.generation;
        let limit = self.feed.page_size();
        let api = Arc::clone(&self.api);
        let commands = self.commands.clone();
        tokio::spawn(async move {
            let result = api.fetch_page(page, limit).await;
            if let Some(tx) = commands.upgrade() {
                let _ = tx.send(Command::PageLoaded {
                    generation,
                    page,
                    result,
                });
            }
        });
    }

    fn page_loaded(
        &mut self,
        generation: u64,
        page: u32,
        result: Result<Page<Profile>, ApiError>,
    ) {
        if generation != self.generation {
            debug!(page, generation, "Discarding stale page");
            return;
        }
        self.fetching = None;

        match result {
            Ok(loaded) => {
                let has_more = loaded.has_more;
                debug!(page, items = loaded.data.len(), has_more, "Page loaded");
                self.feed.push(loaded);
                self.emit(SessionEvent::FeedLoaded { page, has_more });
                let effects = self.controller.sync(&self.feed.flattened());
                self.apply(effects);
            }
            Err(e) => {
                warn!(page, error = %e, "Failed to load feed page");
                self.emit(SessionEvent::FeedFailed {
                    page,
                    error: e.to_string(),
                });
            }
        }
    }

    fn submit(&self, person: PersonId, action: SwipeAction) {
        let api = Arc::clone(&self.api);
        let commands = self.commands.clone();
        tokio::spawn(async move {
            let result = match action {
                SwipeAction::Like => api.like(person).await.map(ActionOutcome::Liked),
                SwipeAction::Dislike => api.dislike(person).await.map(ActionOutcome::Disliked),
            };
            if let Some(tx) = commands.upgrade() {
                let _ = tx.send(Command::ActionSettled {
                    person,
                    action,
                    result,
                });
            }
        });
    }

    fn action_settled(
        &mut self,
        person: PersonId,
        action: SwipeAction,
        result: Result<ActionOutcome, ApiError>,
    ) {
        let rejected = match result {
            Ok(ActionOutcome::Liked(response)) if response.success => {
                let matched = response.is_match == Some(true);
                self.emit(SessionEvent::Liked { person, response });
                if matched {
                    info!(%person, "Matched");
                    self.emit(SessionEvent::Matched { person });
                }
                None
            }
            Ok(ActionOutcome::Disliked(response)) if response.success => {
                self.emit(SessionEvent::Disliked { person, response });
                None
            }
            Ok(ActionOutcome::Liked(response)) => Some(response.message),
            Ok(ActionOutcome::Disliked(response)) => Some(response.message),
            Err(e) => Some(e.to_string()),
        };

        match rejected {
            None => self.refresh(),
            Some(error) => {
                warn!(%person, %action, %error, "Swipe action failed");
                self.emit(SessionEvent::ActionFailed {
                    person,
                    action,
                    error,
                });
            }
        }
    }

    fn prefetch(&self, urls: Vec<String>) {
        if urls.is_empty() {
            return;
        }
        let prefetcher = Arc::clone(&self.prefetcher);
        tokio::spawn(async move {
            if let Err(e) = prefetcher.prefetch(&urls).await {
                debug!(error = %e, "Image prefetch failed");
            }
        });
    }

    /// Deliver `command` to this loop after `delay`.
    fn after(&self, delay: Duration, command: Command) {
        let commands = self.commands.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(tx) = commands.upgrade() {
                let _ = tx.send(command);
            }
        });
    }

    fn snapshot(&self) -> DeckSnapshot {
        DeckSnapshot {
            ids: self.controller.deck().ids(),
            suppressed: self.controller.is_suppressed(),
            gesture: self.controller.gesture(),
            loaded_pages: self.feed.page_count(),
            has_more: self.feed.has_more(),
        }
    }

    fn emit(&self, event: SessionEvent) {
        // Nobody listening is fine
        let _ = self.events.send(event);
    }
}
