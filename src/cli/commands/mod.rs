pub mod db;
pub mod password;
pub mod schema;
pub mod user;
