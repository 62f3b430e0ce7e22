pub mod access;
pub mod protected;
pub mod public;
