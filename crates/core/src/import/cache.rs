//! Run-scoped memoisation of remote lookups
//!
//! One cache lives for one batch run and is passed explicitly into the
//! pipeline. Room names are matched exactly; email addresses are matched
//! case-insensitively together with the address type. "No staff owner" is
//! cached as well, failed room lookups are not.

use std::collections::HashMap;

use roombook_domain::{RemoteId, RoomRef};

#[derive(Debug, Clone)]
pub struct LookupCache {
    enabled: bool,
    rooms: HashMap<String, RoomRef>,
    owners: HashMap<(String, String), Option<RemoteId>>,
    hits: usize,
    misses: usize,
}

impl Default for LookupCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupCache {
    pub fn new() -> Self {
        Self::with_enabled(true)
    }

    /// A cache that never remembers anything, so every lookup goes remote.
    pub fn disabled() -> Self {
        Self::with_enabled(false)
    }

    pub fn with_enabled(enabled: bool) -> Self {
        Self { enabled, rooms: HashMap::new(), owners: HashMap::new(), hits: 0, misses: 0 }
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn room(&mut self, room_name: &str) -> Option<RoomRef> {
        let found = self.rooms.get(room_name).cloned();
        self.count(found.is_some());
        found
    }

    pub fn remember_room(&mut self, room_name: &str, room: RoomRef) {
        if self.enabled {
            self.rooms.insert(room_name.to_string(), room);
        }
    }

    /// `Some(None)` means "looked up before, no staff owner".
    pub fn owner(&mut self, email: &str, address_type: &str) -> Option<Option<RemoteId>> {
        let found = self.owners.get(&owner_key(email, address_type)).cloned();
        self.count(found.is_some());
        found
    }

    pub fn remember_owner(&mut self, email: &str, address_type: &str, owner: Option<RemoteId>) {
        if self.enabled {
            self.owners.insert(owner_key(email, address_type), owner);
        }
    }

    pub const fn hits(&self) -> usize {
        self.hits
    }

    pub const fn misses(&self) -> usize {
        self.misses
    }

    fn count(&mut self, hit: bool) {
        if !self.enabled {
            return;
        }
        if hit {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
    }
}

fn owner_key(email: &str, address_type: &str) -> (String, String) {
    (email.trim().to_lowercase(), address_type.to_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hall() -> RoomRef {
        RoomRef {
            id: RemoteId::from(96),
            room_name: "Main Hall".into(),
            short_name: None,
            site_name: None,
        }
    }

    #[test]
    fn remembers_rooms_by_exact_name() {
        let mut cache = LookupCache::new();
        assert!(cache.room("Main Hall").is_none());

        cache.remember_room("Main Hall", hall());
        assert_eq!(cache.room("Main Hall"), Some(hall()));
        assert!(cache.room("main hall").is_none());
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.misses(), 2);
    }

    #[test]
    fn owner_lookup_ignores_email_case() {
        let mut cache = LookupCache::new();
        cache.remember_owner("B.Dobbs@School.org", "work", Some(RemoteId::from(7)));

        assert_eq!(cache.owner("b.dobbs@school.org", "WORK"), Some(Some(RemoteId::from(7))));
    }

    #[test]
    fn negative_owner_results_are_cached() {
        let mut cache = LookupCache::new();
        cache.remember_owner("nobody@school.org", "WORK", None);
        assert_eq!(cache.owner("nobody@school.org", "WORK"), Some(None));
    }

    #[test]
    fn disabled_cache_stores_nothing() {
        let mut cache = LookupCache::disabled();
        cache.remember_room("Main Hall", hall());
        cache.remember_owner("a@b.c", "WORK", None);

        assert!(cache.room("Main Hall").is_none());
        assert!(cache.owner("a@b.c", "WORK").is_none());
        assert_eq!(cache.hits() + cache.misses(), 0);
    }
}
