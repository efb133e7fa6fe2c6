mod admin;
mod digest;

pub use admin::cmd_set_admin;
pub use digest::cmd_send_digest;
