pub mod credentials;
pub use credentials::{CredentialError, TokenSigner};

pub mod todo_service;
pub mod todo_service_impl;
pub use todo_service::{TodoError, TodoService};
pub use todo_service_impl::SeaOrmTodoService;

pub mod user_service;
pub mod user_service_impl;
pub use user_service::{Session, UserError, UserService};
pub use user_service_impl::SeaOrmUserService;
