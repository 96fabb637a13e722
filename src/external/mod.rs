pub mod ssdweb;

pub use ssdweb::*;
