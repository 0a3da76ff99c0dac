// handlers/protected/mod.rs - Console screens behind the privilege gate
//
// Every route here runs after `middleware::require_admin`, which places the
// caller's `CurrentSession` in the request extensions.

pub mod entity;
