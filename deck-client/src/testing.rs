//! Profile fixtures shared by the unit tests.

use swipedeck_types::{PersonId, Photo, Profile};

pub(crate) fn person(id: i64) -> Profile {
    Profile {
        id: PersonId::new(id),
        name: format!("person-{}", id),
        age: 20 + id as u32,
        bio: String::new(),
        location: None,
        distance: None,
        photos: vec![Photo {
            url: format!("http://img/{}.png", id),
            order: 0,
        }],
    }
}

pub(crate) fn people(ids: &[i64]) -> Vec<Profile> {
    ids.iter().map(|&id| person(id)).collect()
}
