//! Tunnel side of the service: device access, the read loop and per-frame
//! dispatch.

pub mod context;
pub mod dispatcher;
#[cfg(target_os = "linux")]
pub mod linux;
pub mod tunnel_loop;

pub use context::ServiceContext;
pub use dispatcher::PacketDispatcher;
#[cfg(target_os = "linux")]
pub use linux::LinuxTun;
pub use tunnel_loop::TunnelLoop;
