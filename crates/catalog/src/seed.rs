//! Static demo data: four events around Seoul City Hall and a four-stop
//! date course.

use crate::{Event, InMemoryCatalogStore, Place};

const UNSPLASH_QUERY: &str = "?ixlib=rb-4.0.3&auto=format&fit=crop&w=2000&q=80";

fn unsplash(photo: &str) -> String {
    format!("https://images.unsplash.com/{photo}{UNSPLASH_QUERY}")
}

pub fn demo_events() -> Vec<Event> {
    vec![
        Event {
            id: "1".to_string(),
            title: "Community Art Workshop".to_string(),
            description: Some(
                "Join us for a fun and creative art workshop where you can explore your \
                 artistic talents and connect with fellow art enthusiasts. All skill levels \
                 are welcome! We will provide all necessary materials, just bring your \
                 creativity!"
                    .to_string(),
            ),
            location: "Community Center, Room 201".to_string(),
            when: "Today, 14:00 - 16:00".to_string(),
            category: "Workshop".to_string(),
            image_url: unsplash("photo-1508700115892-45ecd05ae2ad"),
            organizer: Some("Seoul Art Collective".to_string()),
            price: Some("Free".to_string()),
            capacity: Some(30),
            registered: 18,
            lat: 37.5665,
            lng: 126.9780,
        },
        Event {
            id: "2".to_string(),
            title: "Jazz Night at Blue Note".to_string(),
            description: None,
            location: "Blue Note Jazz Club".to_string(),
            when: "Tomorrow, 20:00 - 23:00".to_string(),
            category: "Music".to_string(),
            image_url: unsplash("photo-1470229722913-7c0e2dbbafd3"),
            organizer: None,
            price: None,
            capacity: None,
            registered: 0,
            lat: 37.5730,
            lng: 126.9768,
        },
        Event {
            id: "3".to_string(),
            title: "Weekend Farmers Market".to_string(),
            description: None,
            location: "Central Park".to_string(),
            when: "This Saturday, 09:00 - 15:00".to_string(),
            category: "Market".to_string(),
            image_url: unsplash("photo-1556911220-bff31c812dba"),
            organizer: None,
            price: None,
            capacity: None,
            registered: 0,
            lat: 37.5758,
            lng: 126.9734,
        },
        Event {
            id: "4".to_string(),
            title: "Tech Conference 2023".to_string(),
            description: None,
            location: "Convention Center".to_string(),
            when: "June 20, 10:00 - 18:00".to_string(),
            category: "Conference".to_string(),
            image_url: unsplash("photo-1505373877841-8d25f7d46678"),
            organizer: None,
            price: None,
            capacity: None,
            registered: 0,
            lat: 37.5700,
            lng: 126.9775,
        },
    ]
}

pub fn demo_places() -> Vec<Place> {
    let place = |id: &str, name: &str, category: &str, address: &str, minutes: u32, lat: f64, lng: f64| Place {
        id: id.to_string(),
        name: name.to_string(),
        category: category.to_string(),
        address: address.to_string(),
        minutes,
        lat,
        lng,
    };
    vec![
        place("1", "Café Miel", "Coffee", "123 Coffee Street, Seoul", 45, 37.5665, 126.9780),
        place("2", "Art Gallery", "Museum", "456 Art Avenue, Seoul", 90, 37.5730, 126.9768),
        place("3", "Riverside Park", "Outdoor", "789 Riverside Road, Seoul", 60, 37.5758, 126.9734),
        place("4", "Italian Restaurant", "Dining", "101 Pasta Street, Seoul", 90, 37.5770, 126.9710),
    ]
}

pub fn demo_store() -> InMemoryCatalogStore {
    InMemoryCatalogStore::from_events(demo_events())
}

#[cfg(test)]
mod tests {
    use super::{demo_events, demo_places, demo_store};
    use crate::CatalogStore;

    #[test]
    fn ids_are_unique_and_listed_in_order() {
        let ids: Vec<String> = demo_store().list().unwrap().into_iter().map(|e| e.id).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        assert_eq!(demo_events().len(), 4);
    }

    #[test]
    fn course_has_four_stops() {
        let places = demo_places();
        assert_eq!(places.len(), 4);
        assert_eq!(places[0].name, "Café Miel");
        assert_eq!(places.iter().map(|p| p.minutes).sum::<u32>(), 285);
    }
}
