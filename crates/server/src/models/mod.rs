//! Domain models for the Data Store.
//!
//! - [`user::User`] - account record (never serialized; see [`SessionUser`])
//! - [`store::Store`] - rated store with its derived aggregate
//! - [`rating::Rating`] - one user's star rating of one store
//! - [`session::SessionUser`] - password-stripped user kept in the session

pub mod rating;
pub mod session;
pub mod store;
pub mod user;

pub use rating::Rating;
pub use session::{SessionUser, keys as session_keys};
pub use store::{NewStore, Store, StorePatch};
pub use user::{NewUser, User, UserPatch};
