pub mod auth;
pub mod author;
pub mod course;
pub mod document;
pub mod folder;
pub mod item;
pub mod shared;
