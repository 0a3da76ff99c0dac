// handlers/public/auth/mod.rs - Session login and logout
//
// A successful login creates a `UiSession` and hands its token to the browser
// in the session cookie; logout destroys it.

pub mod login; // GET/POST /login
pub mod logout; // POST /logout

pub use login::{login_get, login_post};
pub use logout::logout_post;
