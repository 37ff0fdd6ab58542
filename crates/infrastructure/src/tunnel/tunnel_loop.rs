use crate::tunnel::context::ServiceContext;
use crate::tunnel::dispatcher::PacketDispatcher;
use ferrous_shield_application::ports::TunnelDevice;
use ferrous_shield_domain::DomainError;
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use tracing::{error, info};

pub const TUNNEL_THREAD_NAME: &str = "tunnel-loop";

/// Blocking read loop over the tunnel device.
///
/// Runs until the context is stopped or the device fails. A device error is
/// returned to whoever joins the thread; the loop never retries on its own.
pub struct TunnelLoop {
    device: Arc<dyn TunnelDevice>,
    dispatcher: PacketDispatcher,
    ctx: Arc<ServiceContext>,
    buffer_size: usize,
}

impl TunnelLoop {
    pub fn new(
        device: Arc<dyn TunnelDevice>,
        dispatcher: PacketDispatcher,
        ctx: Arc<ServiceContext>,
        buffer_size: usize,
    ) -> Self {
        Self {
            device,
            dispatcher,
            ctx,
            buffer_size,
        }
    }

    pub fn run(&self) -> Result<(), DomainError> {
        let mut buf = vec![0u8; self.buffer_size];
        info!(buffer_size = self.buffer_size, "Tunnel loop started");

        while self.ctx.is_running() {
            match self.device.read_frame(&mut buf) {
                Ok(Some(len)) if len > 0 => self.dispatcher.dispatch(&buf[..len]),
                Ok(_) => {}
                Err(e) => {
                    error!(error = %e, "Tunnel read failed, stopping loop");
                    return Err(e);
                }
            }
        }

        info!("Tunnel loop stopped");
        Ok(())
    }

    /// Moves the loop onto its own named thread.
    pub fn spawn(self) -> io::Result<JoinHandle<Result<(), DomainError>>> {
        thread::Builder::new()
            .name(TUNNEL_THREAD_NAME.to_string())
            .spawn(move || self.run())
    }
}
