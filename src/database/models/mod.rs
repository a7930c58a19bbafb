pub mod lookup;
pub mod menu;
pub mod status;
pub mod user;

pub use lookup::{Lookup, ReportingLevel, UserTranslander};
pub use menu::UserMenu;
pub use status::SaveStatus;
pub use user::{NewUser, User, UserDetails};
