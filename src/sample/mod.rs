//! Random sources shared by every scenario: time windows and host subsets

pub mod fleet;
pub mod interval;

pub use fleet::{random_host, sample_hosts, HostSet};
pub use interval::{TimeInterval, Window};
