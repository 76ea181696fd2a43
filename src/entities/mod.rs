pub mod prelude;

pub mod todos;
pub mod user_tokens;
pub mod users;
