pub mod host_entry;
pub mod loopback;

pub use host_entry::HostEntry;
pub use loopback::{LoopbackAlias, Platform};
