pub mod contact;
pub mod message;
pub mod selectors;
pub mod user;

pub use contact::Contact;
pub use message::{Message, RecipientPosition};
pub use selectors::{BinEdge, BinarySource, CategoryMatcher, IdentitySource, NumericSource};
pub use user::{User, UserId};
