//! Show the people this device likes.

use anyhow::{Context, Result};
use swipedeck_client::PeopleApi;
use swipedeck_types::{Page, Profile};

use super::print_page;

/// Run the liked command.
pub async fn run(api: &dyn PeopleApi, page: u32, limit: u32) -> Result<Page<Profile>> {
    let result = api
        .liked_page(page, limit)
        .await
        .context("Failed to fetch liked people")?;
    print_page("Liked", &result);
    Ok(result)
}
