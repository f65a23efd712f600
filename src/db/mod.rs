//! Database layer (Firestore).

pub mod firestore;

pub use firestore::FirestoreDb;

/// Collection names as constants.
pub mod collections {
    pub const USERS: &str = "users";
    pub const PROFILES: &str = "profiles";
    pub const EVENTS: &str = "events";
    pub const HACKFINDER_POSTS: &str = "hackfinder_posts";
}
