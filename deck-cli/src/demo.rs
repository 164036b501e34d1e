//! Offline demo data for `--mock`.

use swipedeck_types::{PersonId, Photo, Profile};

/// Five demo people served by the mock backend.
pub fn demo_profiles() -> Vec<Profile> {
    [
        (1, "Ayu", 24, "Jakarta", "Suka kopi susu dan jalan-jalan sore."),
        (2, "Rina", 27, "Bandung", "Pecinta buku dan hiking di akhir pekan."),
        (3, "Budi", 30, "Surabaya", "Pecinta olahraga dan kopi pagi."),
        (4, "Dewi", 22, "Yogyakarta", "Senang membaca dan menulis puisi."),
        (5, "Andi", 28, "Medan", "Gemar traveling dan fotografi."),
    ]
    .into_iter()
    .map(|(id, name, age, location, bio)| Profile {
        id: PersonId::new(id),
        name: name.to_string(),
        age,
        bio: bio.to_string(),
        location: Some(location.to_string()),
        distance: None,
        photos: vec![Photo {
            url: format!("http://localhost:8080/assets/foto{}.png", id),
            order: 0,
        }],
    })
    .collect()
}
