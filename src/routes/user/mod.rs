mod handler;

pub use handler::{create_user, delete_user, get_all_users, get_user_by_id, update_user};
