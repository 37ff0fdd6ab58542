#[cfg(unix)]
use tokio::signal::unix::{signal, Signal, SignalKind};

/// A process signal the service reacts to besides Ctrl-C. Never fires on
/// platforms without Unix signals.
pub struct ServiceSignal {
    #[cfg(unix)]
    inner: Signal,
}

impl ServiceSignal {
    pub fn terminate() -> std::io::Result<Self> {
        #[cfg(unix)]
        return Ok(Self {
            inner: signal(SignalKind::terminate())?,
        });
        #[cfg(not(unix))]
        return Ok(Self {});
    }

    pub fn hangup() -> std::io::Result<Self> {
        #[cfg(unix)]
        return Ok(Self {
            inner: signal(SignalKind::hangup())?,
        });
        #[cfg(not(unix))]
        return Ok(Self {});
    }

    pub async fn recv(&mut self) {
        #[cfg(unix)]
        self.inner.recv().await;
        #[cfg(not(unix))]
        std::future::pending::<()>().await;
    }
}
