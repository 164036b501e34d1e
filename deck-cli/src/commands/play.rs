//! Replay a scripted swipe session against the backend.
//!
//! Moves are comma or space separated:
//!
//! | move    | alias | input                                   |
//! |---------|-------|-----------------------------------------|
//! | `like`  | `y`   | like button                             |
//! | `nope`  | `n`   | dislike button                          |
//! | `right` | `r`   | drag right past the distance threshold  |
//! | `left`  | `l`   | drag left past the distance threshold   |
//! | `tease` | `t`   | short slow drag that springs back       |

use anyhow::{Context, Result};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;
use swipedeck_client::{
    AnimationKind, ImagePrefetcher, PeopleApi, SessionEvent, SessionHandle, SwipeSession,
};
use swipedeck_core::{Direction, GestureState, SwipeConfig};
use swipedeck_types::PersonId;

use super::describe;

/// Polling interval while waiting for the deck to settle.
const SETTLE_STEP: Duration = Duration::from_millis(25);

/// Give up on a move after this many polls.
const SETTLE_ROUNDS: u32 = 400;

/// How long to wait for the first feed page.
const FEED_TIMEOUT: Duration = Duration::from_secs(15);

/// One scripted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Move {
    /// Like button.
    Like,
    /// Dislike button.
    Nope,
    /// Drag right and let go.
    SwipeRight,
    /// Drag left and let go.
    SwipeLeft,
    /// Drag a little and let go slowly.
    Tease,
}

impl FromStr for Move {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "like" | "y" => Ok(Self::Like),
            "nope" | "n" => Ok(Self::Nope),
            "right" | "r" => Ok(Self::SwipeRight),
            "left" | "l" => Ok(Self::SwipeLeft),
            "tease" | "t" => Ok(Self::Tease),
            other => anyhow::bail!(
                "Unknown move '{}' (expected like, nope, right, left, tease)",
                other
            ),
        }
    }
}

/// Parse a move script.
pub fn parse_script(script: &str) -> Result<Vec<Move>> {
    script
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(Move::from_str)
        .collect()
}

/// What happened during a replay.
#[derive(Debug, Default, PartialEq)]
pub struct PlaySummary {
    /// Completed swipes in order.
    pub swiped: Vec<(Direction, PersonId)>,
    /// Swipes the backend accepted.
    pub recorded: usize,
    /// Rejections and failures, as printed.
    pub failures: Vec<String>,
    /// Cards left in the deck at the end.
    pub remaining: usize,
}

impl PlaySummary {
    /// Swipes whose backend call has not settled yet.
    fn pending(&self) -> usize {
        self.swiped
            .len()
            .saturating_sub(self.recorded + self.failures.len())
    }

    fn record(&mut self, event: SessionEvent) {
        match event {
            SessionEvent::Swiped {
                direction, profile, ..
            } => {
                let arrow = match direction {
                    Direction::Right => "LIKE ",
                    Direction::Left => "NOPE ",
                };
                println!("{} {}", arrow, describe(&profile));
                self.swiped.push((direction, profile.id));
            }
            SessionEvent::Liked { response, .. } => {
                self.recorded += 1;
                println!("      {}", response.message);
            }
            SessionEvent::Disliked { response, .. } => {
                self.recorded += 1;
                println!("      {}", response.message);
            }
            SessionEvent::Matched { person } => println!("      It's a match with #{}!", person),
            SessionEvent::ActionFailed {
                person,
                action,
                error,
            } => {
                let failure = format!("{} #{}: {}", action, person, error);
                println!("      failed: {}", failure);
                self.failures.push(failure);
            }
            SessionEvent::AnimationStarted {
                kind: AnimationKind::Springback { .. },
                ..
            } => println!("      (card springs back)"),
            SessionEvent::FeedFailed { page, error } => {
                println!("      feed page {} failed: {}", page, error);
            }
            _ => {}
        }
    }

    fn drain(&mut self, session: &mut SwipeSession) {
        while let Some(event) = session.try_next_event() {
            self.record(event);
        }
    }
}

/// Run the play command.
pub async fn run(
    config: SwipeConfig,
    api: Arc<dyn PeopleApi>,
    prefetcher: Arc<dyn ImagePrefetcher>,
    moves: &[Move],
) -> Result<PlaySummary> {
    let mut session = SwipeSession::spawn(config, api, prefetcher);
    let handle = session.handle();
    let mut summary = PlaySummary::default();

    handle.refresh()?;
    wait_for_feed(&mut session).await?;

    for m in moves {
        perform(&handle, *m)?;
        settle(&mut session, &handle, &mut summary)
            .await
            .with_context(|| format!("Deck did not settle after {:?}", m))?;
    }

    summary.remaining = handle.snapshot().await?.ids.len();
    session.shutdown().await;

    println!();
    println!(
        "{} swiped, {} recorded, {} failed, {} left in the deck",
        summary.swiped.len(),
        summary.recorded,
        summary.failures.len(),
        summary.remaining
    );
    Ok(summary)
}

async fn wait_for_feed(session: &mut SwipeSession) -> Result<()> {
    let waited = tokio::time::timeout(FEED_TIMEOUT, async {
        while let Some(event) = session.next_event().await {
            match event {
                SessionEvent::FeedLoaded { page, .. } => {
                    println!("Loaded feed page {}", page);
                    return Ok(());
                }
                SessionEvent::FeedFailed { error, .. } => {
                    anyhow::bail!("Failed to load feed: {}", error)
                }
                _ => {}
            }
        }
        anyhow::bail!("Session closed before the feed loaded")
    })
    .await;

    waited.context("Timed out waiting for the feed")?
}

fn perform(handle: &SessionHandle, m: Move) -> Result<()> {
    match m {
        Move::Like => handle.press(Direction::Right)?,
        Move::Nope => handle.press(Direction::Left)?,
        Move::SwipeRight => drag(handle, 1.0)?,
        Move::SwipeLeft => drag(handle, -1.0)?,
        Move::Tease => {
            handle.drag(30.0, 0.0)?;
            handle.drag(60.0, 2.0)?;
            handle.release(60.0, 2.0, 0.05)?;
        }
    }
    Ok(())
}

fn drag(handle: &SessionHandle, sign: f64) -> Result<()> {
    handle.drag(sign * 40.0, 0.0)?;
    handle.drag(sign * 110.0, 6.0)?;
    handle.drag(sign * 180.0, 10.0)?;
    handle.release(sign * 180.0, 10.0, sign * 0.6)?;
    Ok(())
}

/// Wait until no animation runs, feed sync is enabled and every swipe's
/// backend call has settled.
async fn settle(
    session: &mut SwipeSession,
    handle: &SessionHandle,
    summary: &mut PlaySummary,
) -> Result<()> {
    for _ in 0..SETTLE_ROUNDS {
        tokio::time::sleep(SETTLE_STEP).await;
        summary.drain(session);
        let snapshot = handle.snapshot().await?;
        if snapshot.gesture == GestureState::Idle && !snapshot.suppressed && summary.pending() == 0
        {
            summary.drain(session);
            return Ok(());
        }
    }
    anyhow::bail!("still busy after {:?}", SETTLE_STEP * SETTLE_ROUNDS)
}
