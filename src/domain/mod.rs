//! Request classification and image URL policy, independent of the HTTP layer

pub mod image;
pub mod request;
