//! Domain records and API payloads

pub mod category;
pub mod todo;
pub mod user;

pub use category::{Category, CategoryInput, CategoryResponse};
pub use todo::{Status, ToDo, ToDoDraft, ToDoInput, ToDoResponse, UnknownStatus};
pub use user::{User, UserInput, UserResponse};
