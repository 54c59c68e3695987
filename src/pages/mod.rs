// Page containers: each owns the state one page needs, fetches it on load
// (concurrently where the calls are independent) and applies the local
// mutation rules from `feed` on user actions.

pub mod chat;
pub mod course;
pub mod home;
pub mod profile;

pub use chat::ChatPage;
pub use course::CoursePage;
pub use home::HomePage;
pub use profile::ProfilePage;

use std::collections::HashSet;

/// Tracks actions with a request outstanding so the triggering control can
/// stay disabled and a duplicate submission from the same control is
/// rejected locally. There is no cross-request ordering guarantee beyond
/// this; racing responses are applied last-write-wins.
#[derive(Default)]
pub struct InFlight {
    keys: HashSet<String>,
}

impl InFlight {
    /// Claim an action key. Returns false when that action already has a
    /// request outstanding.
    pub fn try_begin(&mut self, key: &str) -> bool {
        self.keys.insert(key.to_string())
    }

    pub fn finish(&mut self, key: &str) {
        self.keys.remove(key);
    }

    pub fn is_active(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}
