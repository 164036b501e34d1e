//! Show a page of the feed.

use anyhow::{Context, Result};
use swipedeck_client::PeopleApi;
use swipedeck_types::{Page, Profile};

use super::print_page;

/// Run the feed command.
pub async fn run(api: &dyn PeopleApi, page: u32, limit: u32) -> Result<Page<Profile>> {
    let result = api
        .fetch_page(page, limit)
        .await
        .context("Failed to fetch feed")?;
    print_page("Feed", &result);
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::demo_profiles;
    use swipedeck_client::MockPeopleApi;
    use swipedeck_types::PersonId;

    #[tokio::test]
    async fn feed_shows_unswiped_people() {
        let api = MockPeopleApi::with_people(demo_profiles());
        api.like(PersonId::new(1)).await.unwrap();

        let page = run(&api, 1, 2).await.unwrap();

        assert_eq!(page.total, 4);
        assert_eq!(page.data[0].name, "Rina");
        assert!(page.has_more);
    }

    #[tokio::test]
    async fn feed_failure_is_an_error() {
        let api = MockPeopleApi::with_people(demo_profiles());
        api.fail_next_fetch("offline");

        assert!(run(&api, 1, 10).await.is_err());
    }
}
