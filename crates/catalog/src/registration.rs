use crate::{CatalogError, CatalogStore, Event};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationError {
    NotFound(String),
    Full { id: String, capacity: u32 },
    Store(CatalogError),
}

impl std::fmt::Display for RegistrationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationError::NotFound(id) => write!(f, "event {id} not found"),
            RegistrationError::Full { id, capacity } => {
                write!(f, "event {id} is full ({capacity} places)")
            }
            RegistrationError::Store(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for RegistrationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RegistrationError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CatalogError> for RegistrationError {
    fn from(e: CatalogError) -> Self {
        RegistrationError::Store(e)
    }
}

/// Takes one place at event `id` and returns the updated event.
pub fn register<S: CatalogStore + ?Sized>(
    store: &mut S,
    id: &str,
) -> Result<Event, RegistrationError> {
    let Some(mut event) = store.get(id)? else {
        return Err(RegistrationError::NotFound(id.to_string()));
    };
    if let Some(capacity) = event.capacity
        && event.registered >= capacity
    {
        return Err(RegistrationError::Full {
            id: id.to_string(),
            capacity,
        });
    }
    event.registered += 1;
    store.upsert(event.clone())?;
    Ok(event)
}

#[cfg(test)]
mod tests {
    use super::{RegistrationError, register};
    use crate::CatalogStore;
    use crate::seed::demo_store;

    #[test]
    fn registering_takes_a_place() {
        let mut store = demo_store();
        let e = register(&mut store, "1").unwrap();
        assert_eq!(e.registered, 19);
        assert_eq!(e.spots_left(), Some(11));
        assert_eq!(store.get("1").unwrap().unwrap().registered, 19);
    }

    #[test]
    fn full_event_is_refused() {
        let mut store = demo_store();
        for _ in 0..12 {
            register(&mut store, "1").unwrap();
        }
        assert_eq!(
            register(&mut store, "1"),
            Err(RegistrationError::Full {
                id: "1".to_string(),
                capacity: 30
            })
        );
    }

    #[test]
    fn unlimited_and_unknown_events() {
        let mut store = demo_store();
        assert_eq!(register(&mut store, "2").unwrap().registered, 1);
        assert_eq!(
            register(&mut store, "nope"),
            Err(RegistrationError::NotFound("nope".to_string()))
        );
    }
}
