mod session;
mod share;

pub use session::Session;
pub use share::{NewShareRecord, Share};
