//! Infrastructure Layer
//!
//! Cross-cutting concerns and infrastructure components.

pub mod public_ip;
pub mod shutdown;

pub use public_ip::{discover_public_ip, DEFAULT_PUBLIC_IP_URL};
pub use shutdown::{shutdown_signal, ShutdownController};
