pub mod db;
pub mod queries;
pub mod insertions;

pub use db::{init_db, init_schema, open_connection};
pub use insertions::{add_to_cart, remove_from_cart, sign_in, sign_out};
pub use queries::{is_signed_in, load_registration_snapshot, verify_credentials};
