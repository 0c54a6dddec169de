pub mod board;
pub mod card;
pub mod column;
pub mod user;

pub use board::{Board, BoardInput, BoardUpdate};
pub use card::{Card, CardInput, CardPriority, CardQuery, CardUpdate};
pub use column::{Column, ColumnInput, ColumnUpdate};
pub use user::{PublicUser, Theme, UpdateProfileInput, User};
