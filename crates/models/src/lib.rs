pub mod banner;
pub mod db;
pub mod errors;
