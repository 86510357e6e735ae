pub mod protocol;
mod server;
mod session;

pub use server::Server;
pub use session::Session;
