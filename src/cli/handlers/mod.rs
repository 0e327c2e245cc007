//! Command handlers
//!
//! Each command gets its own module; [`common::HandlerContext`] wires the
//! lifecycle engine from configuration so handlers stay thin.

pub mod common;
mod create;
mod init;
mod list;
mod message;
mod reply;
mod show;
mod update;

pub use common::HandlerContext;
pub use create::{CreateParams, StaffEntryParams, handle_create_command};
pub use init::handle_init_command;
pub use list::handle_list_command;
pub use message::handle_message_command;
pub use reply::handle_reply_command;
pub use show::handle_show_command;
pub use update::handle_update_command;
