pub mod daemon;
pub mod health;
pub mod init;
pub mod share;
pub mod version;

pub use daemon::Daemon;
pub use health::Health;
pub use init::Init;
pub use share::Share;
pub use version::Version;
