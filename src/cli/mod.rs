pub mod app;
pub mod chat;
pub mod commands;
pub mod context;
pub mod dispatch;
pub mod env;
pub mod perceive;
pub mod runtime;
pub mod serve;

pub use app::run;
pub use chat::{cmd_chat, ChatArgs};
pub use perceive::{cmd_perceive, PerceiveArgs};
pub use serve::{cmd_serve, ServeArgs};
