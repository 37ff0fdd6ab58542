use ferrous_shield_application::ports::TunnelDevice;
use ferrous_shield_domain::DomainError;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Write};
use std::os::fd::AsRawFd;
use std::time::Duration;
use tracing::info;

const TUN_PATH: &str = "/dev/net/tun";

/// `_IOW('T', 202, int)`
const TUNSETIFF: u64 = 0x4004_54ca;
const IFF_TUN: libc::c_short = 0x0001;
const IFF_NO_PI: libc::c_short = 0x1000;

/// `struct ifreq` as TUNSETIFF reads it: name, flags, then the rest of the
/// union.
#[repr(C)]
struct IfReq {
    name: [libc::c_char; libc::IFNAMSIZ],
    flags: libc::c_short,
    _pad: [u8; 22],
}

/// A Linux TUN interface opened without packet information headers, so
/// every read and write is exactly one IP datagram.
pub struct LinuxTun {
    file: File,
    name: String,
    poll_timeout_ms: libc::c_int,
}

impl LinuxTun {
    /// Attaches to (or creates) the interface `name`. Addressing and routes
    /// are left to the host.
    pub fn open(name: &str, poll_interval: Duration) -> Result<Self, DomainError> {
        if name.is_empty() || name.len() >= libc::IFNAMSIZ {
            return Err(DomainError::TunnelError(format!(
                "invalid interface name '{name}'"
            )));
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .open(TUN_PATH)
            .map_err(|e| DomainError::TunnelError(format!("{TUN_PATH}: {e}")))?;

        let mut req = IfReq {
            name: [0; libc::IFNAMSIZ],
            flags: IFF_TUN | IFF_NO_PI,
            _pad: [0; 22],
        };
        for (dst, src) in req.name.iter_mut().zip(name.bytes()) {
            *dst = src as libc::c_char;
        }

        // SAFETY: the fd is open and `req` matches the kernel's ifreq layout.
        let ret = unsafe { libc::ioctl(file.as_raw_fd(), TUNSETIFF as _, &mut req as *mut IfReq) };
        if ret < 0 {
            return Err(DomainError::TunnelError(format!(
                "TUNSETIFF {name}: {}",
                io::Error::last_os_error()
            )));
        }

        info!(interface = %name, "Tunnel device attached");

        Ok(Self {
            file,
            name: name.to_string(),
            poll_timeout_ms: poll_interval.as_millis().clamp(1, i32::MAX as u128) as libc::c_int,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Waits up to the poll interval for the fd to become readable.
    fn wait_readable(&self) -> io::Result<bool> {
        let mut pfd = libc::pollfd {
            fd: self.file.as_raw_fd(),
            events: libc::POLLIN,
            revents: 0,
        };

        // SAFETY: one valid pollfd, count matches.
        let ret = unsafe { libc::poll(&mut pfd, 1, self.poll_timeout_ms) };
        if ret < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(false);
            }
            return Err(err);
        }
        if ret == 0 {
            return Ok(false);
        }
        if pfd.revents & (libc::POLLERR | libc::POLLHUP | libc::POLLNVAL) != 0 {
            return Err(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "tunnel device closed",
            ));
        }
        Ok(true)
    }
}

impl TunnelDevice for LinuxTun {
    fn read_frame(&self, buf: &mut [u8]) -> Result<Option<usize>, DomainError> {
        let tunnel_error = |e: io::Error| DomainError::TunnelError(format!("{}: {e}", self.name));

        if !self.wait_readable().map_err(tunnel_error)? {
            return Ok(None);
        }

        match (&self.file).read(buf) {
            Ok(len) => Ok(Some(len)),
            Err(e)
                if matches!(
                    e.kind(),
                    io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock
                ) =>
            {
                Ok(None)
            }
            Err(e) => Err(tunnel_error(e)),
        }
    }

    fn write_frame(&self, frame: &[u8]) -> Result<(), DomainError> {
        let written = (&self.file)
            .write(frame)
            .map_err(|e| DomainError::TunnelError(format!("{}: {e}", self.name)))?;
        if written != frame.len() {
            return Err(DomainError::TunnelError(format!(
                "{}: short write ({written} of {} bytes)",
                self.name,
                frame.len()
            )));
        }
        Ok(())
    }
}
