pub use super::todos::Entity as Todos;
pub use super::user_tokens::Entity as UserTokens;
pub use super::users::Entity as Users;
