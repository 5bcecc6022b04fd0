pub mod filename;
pub mod jwt;
