pub mod add;
pub mod dates;
pub mod delete;
pub mod list;
pub mod search;
pub mod show;
pub mod upcoming;
