pub mod interaction;
pub mod listing;
pub mod preferences;
pub mod session;

pub use interaction::{Favorite, Interaction, InteractionKind};
pub use listing::{ApprovalStatus, Listing, ListingId, Location, PropertyType, UserId};
pub use preferences::{PreferenceProfile, ResolvedPreferences};
pub use session::{Role, Session};
