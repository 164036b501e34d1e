//! Like or dislike one person.

use anyhow::{Context, Result};
use swipedeck_client::PeopleApi;
use swipedeck_types::{PersonId, SwipeAction};

/// Run the like/dislike command. Returns whether the backend accepted it.
pub async fn run(api: &dyn PeopleApi, id: PersonId, action: SwipeAction) -> Result<bool> {
    let (success, message) = match action {
        SwipeAction::Like => {
            let resp = api
                .like(id)
                .await
                .with_context(|| format!("Failed to like #{}", id))?;
            if let Some(count) = resp.like_count {
                println!("#{} now has {} like(s)", id, count);
            }
            if resp.is_match == Some(true) {
                println!("It's a match!");
            }
            (resp.success, resp.message)
        }
        SwipeAction::Dislike => {
            let resp = api
                .dislike(id)
                .await
                .with_context(|| format!("Failed to dislike #{}", id))?;
            (resp.success, resp.message)
        }
    };

    if success {
        println!("{}", message);
    } else {
        println!("Rejected: {}", message);
    }
    Ok(success)
}
