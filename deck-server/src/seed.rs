//! Demo people for a fresh database.

use crate::config::SeedConfig;
use crate::error::StorageError;
use crate::storage::{NewPerson, PeopleStorage};
use swipedeck_types::Photo;
use tracing::info;

/// (name, age, location, bio, latitude, longitude)
const DEMO_PEOPLE: [(&str, u32, &str, &str, f64, f64); 5] = [
    ("Ayu", 24, "Jakarta", "Suka kopi susu dan jalan-jalan sore.", -6.2088, 106.8456),
    ("Rina", 27, "Bandung", "Pecinta buku dan hiking di akhir pekan.", -6.9175, 107.6191),
    ("Budi", 30, "Surabaya", "Pecinta olahraga dan kopi pagi.", -7.2575, 112.7521),
    ("Dewi", 22, "Yogyakarta", "Senang membaca dan menulis puisi.", -7.7956, 110.3695),
    ("Andi", 28, "Medan", "Gemar traveling dan fotografi.", 3.5952, 98.6722),
];

/// The five demo people, each with one photo under `asset_base_url`.
pub fn demo_people(config: &SeedConfig) -> Vec<NewPerson> {
    let base = config.asset_base_url.trim_end_matches('/');
    DEMO_PEOPLE
        .iter()
        .enumerate()
        .map(|(index, (name, age, location, bio, latitude, longitude))| NewPerson {
            name: name.to_string(),
            age: *age,
            bio: bio.to_string(),
            location: Some(location.to_string()),
            latitude: Some(*latitude),
            longitude: Some(*longitude),
            photos: vec![Photo {
                url: format!("{}/foto{}.png", base, index + 1),
                order: 0,
            }],
        })
        .collect()
}

/// Insert the demo people unless the database already has people.
///
/// Returns how many were inserted.
pub async fn seed_if_empty<S: PeopleStorage + ?Sized>(
    storage: &S,
    config: &SeedConfig,
) -> Result<usize, StorageError> {
    let existing = storage.count_people().await?;
    if existing > 0 {
        info!(existing, "Database already has people, skipping seed");
        return Ok(0);
    }

    let people = demo_people(config);
    let count = people.len();
    for person in people {
        storage.insert_person(person).await?;
    }
    info!(count, "Seeded demo people");
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;
    use swipedeck_types::DeviceId;

    #[test]
    fn demo_photos_use_asset_base() {
        let config = SeedConfig {
            asset_base_url: "http://cdn.test/assets/".to_string(),
        };

        let people = demo_people(&config);

        assert_eq!(people.len(), 5);
        assert_eq!(people[0].name, "Ayu");
        assert_eq!(people[0].photos[0].url, "http://cdn.test/assets/foto1.png");
        assert_eq!(people[4].photos[0].url, "http://cdn.test/assets/foto5.png");
    }

    #[tokio::test]
    async fn seeding_is_idempotent() {
        let storage = SqliteStorage::in_memory().await.unwrap();
        let config = SeedConfig::default();

        assert_eq!(seed_if_empty(&storage, &config).await.unwrap(), 5);
        assert_eq!(seed_if_empty(&storage, &config).await.unwrap(), 0);

        let device = DeviceId::parse("d1").unwrap();
        let page = storage.unseen_people(&device, 0, 10).await.unwrap();
        assert_eq!(page.total, 5);
        assert_eq!(page.people[3].location.as_deref(), Some("Yogyakarta"));
    }
}
