pub(crate) mod access;
pub(crate) mod error;
pub(crate) mod listing;
pub(crate) mod post;
pub(crate) mod timestamp;
