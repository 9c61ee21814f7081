//! Console front-end: command parsing, rendering and the session loop.

pub mod command;
pub mod config;
pub mod render;
pub mod session;

pub use command::{CommandError, ShopCommand};
pub use config::ShopArgs;
pub use render::Renderer;
pub use session::{Reply, Session, SessionError, SessionEvent, SessionState};
