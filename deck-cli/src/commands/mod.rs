//! CLI command implementations.

pub mod device;
pub mod feed;
pub mod liked;
pub mod play;
pub mod swipe;

use swipedeck_types::{Page, Profile};

/// One-line summary of a profile.
pub fn describe(profile: &Profile) -> String {
    let mut line = format!("#{:<4} {}, {}", profile.id.value(), profile.name, profile.age);
    if let Some(location) = &profile.location {
        line.push_str(&format!(" in {}", location));
    }
    if let Some(distance) = profile.distance {
        line.push_str(&format!(" ({:.1} km)", distance));
    }
    line
}

/// Print a listing page.
pub fn print_page(title: &str, page: &Page<Profile>) {
    println!(
        "{} page {} ({} shown, {} total{})",
        title,
        page.page,
        page.data.len(),
        page.total,
        if page.has_more { ", more available" } else { "" }
    );
    if page.data.is_empty() {
        println!("  (nobody here)");
        return;
    }
    for profile in &page.data {
        println!("  {}", describe(profile));
        if !profile.bio.is_empty() {
            println!("        {}", profile.bio);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::demo::demo_profiles;

    #[test]
    fn describe_includes_optional_parts() {
        let mut profile = demo_profiles().remove(0);
        assert_eq!(describe(&profile), "#1    Ayu, 24 in Jakarta");

        profile.location = None;
        profile.distance = Some(2.04);
        assert_eq!(describe(&profile), "#1    Ayu, 24 (2.0 km)");
    }
}
