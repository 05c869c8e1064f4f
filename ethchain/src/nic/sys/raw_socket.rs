// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
use core::mem;
use std::io;
use std::os::unix::io::{RawFd, AsRawFd};
use std::time::{Duration, Instant};

use libc;
use super::{linux, wait, Errno, FdResult, LibcResult, IoLenResult};

use crate::nic::{Interface, Sender};
use crate::wire::ETHERNET_HEADER_LEN;

/// Configuration of a raw socket sender.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// The longest a search for a response blocks before reporting that no frame arrived.
    pub timeout: Duration,
    /// The size of the receive buffer, frames longer than this are truncated.
    pub buffer_len: usize,
}

/// A raw `AF_PACKET` socket, usable as a blocking sender.
///
/// The socket is not bound to a single interface. Each transmission names the interface in its
/// link-layer address and each reception filters on the interface it arrived on. Frames that the
/// host itself sent are echoed back by the kernel on such sockets; these are skipped.
///
/// Opening the socket requires `CAP_NET_RAW`.
#[derive(Debug)]
pub struct RawSocket {
    lower: libc::c_int,
    config: Config,
    buffer: Vec<u8>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            timeout: Duration::from_secs(2),
            buffer_len: 1 << 14,
        }
    }
}

impl AsRawFd for RawSocket {
    fn as_raw_fd(&self) -> RawFd {
        self.lower
    }
}

impl RawSocket {
    /// Open a raw socket with the default configuration.
    pub fn new() -> io::Result<Self> {
        Self::with_config(Config::default())
    }

    /// Open a raw socket with a custom configuration.
    pub fn with_config(config: Config) -> io::Result<Self> {
        let lower = unsafe {
            libc::socket(
                libc::AF_PACKET,
                libc::SOCK_RAW | libc::SOCK_NONBLOCK | libc::SOCK_CLOEXEC,
                linux::ETH_P_ALL.to_be() as i32)
        };

        FdResult(lower).errno()?;

        Ok(RawSocket {
            lower,
            config,
            buffer: vec![0; config.buffer_len],
        })
    }

    /// Get the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get a mutable reference to the configuration.
    ///
    /// Changes take effect with the next receive.
    pub fn config_mut(&mut self) -> &mut Config {
        &mut self.config
    }

    fn link_addr(iface: Interface, dst: &[u8]) -> libc::sockaddr_ll {
        let mut sll_addr = [0; 8];
        sll_addr[..6].copy_from_slice(dst);

        libc::sockaddr_ll {
            sll_family:   libc::AF_PACKET as u16,
            sll_protocol: linux::ETH_P_ALL.to_be() as u16,
            sll_ifindex:  iface.index() as libc::c_int,
            sll_hatype:   0,
            sll_pkttype:  0,
            sll_halen:    6,
            sll_addr,
        }
    }

    /// The instant a receive gives up, the caller's deadline if there is one.
    fn deadline(&self, deadline: Option<Instant>) -> Instant {
        deadline.unwrap_or_else(|| Instant::now() + self.config.timeout)
    }

    /// Receive a single frame into the buffer, with the link address it arrived from.
    fn recv_from(&mut self) -> Result<(usize, libc::sockaddr_ll), Errno> {
        let mut addr: libc::sockaddr_ll = unsafe { mem::zeroed() };
        let mut addr_len = mem::size_of::<libc::sockaddr_ll>() as libc::socklen_t;

        let len = unsafe {
            libc::recvfrom(
                self.lower,
                self.buffer.as_mut_ptr() as *mut libc::c_void,
                self.buffer.len(),
                0,
                &mut addr as *mut libc::sockaddr_ll as *mut libc::sockaddr,
                &mut addr_len)
        };
        IoLenResult(len).errno()?;
        Ok((len as usize, addr))
    }
}

impl Sender for RawSocket {
    fn send(&mut self, iface: Interface, frame: &[u8]) -> io::Result<()> {
        if frame.len() < ETHERNET_HEADER_LEN {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, "frame shorter than link header"));
        }

        let sockaddr = Self::link_addr(iface, &frame[..6]);
        let len = unsafe {
            libc::sendto(
                self.lower,
                frame.as_ptr() as *const libc::c_void,
                frame.len(),
                0,
                &sockaddr as *const libc::sockaddr_ll as *const libc::sockaddr,
                mem::size_of::<libc::sockaddr_ll>() as u32)
        };

        IoLenResult(len).errno()?;
        net_trace!("raw socket sent {} bytes on {}", len, iface);
        Ok(())
    }

    fn recv(&mut self, iface: Interface, deadline: Option<Instant>) -> io::Result<Option<Vec<u8>>> {
        if self.buffer.len() != self.config.buffer_len {
            self.buffer.resize(self.config.buffer_len, 0);
        }

        let deadline = self.deadline(deadline);
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match wait(self.lower, remaining) {
                Ok(true) => (),
                Ok(false) => {
                    net_debug!("raw socket receive on {} timed out", iface);
                    return Ok(None);
                },
                Err(err) if err.is_transient() => continue,
                Err(err) => return Err(err.into()),
            }

            let (len, addr) = match self.recv_from() {
                Ok(received) => received,
                Err(err) if err.is_transient() => continue,
                Err(err) => return Err(err.into()),
            };

            if addr.sll_pkttype == linux::PACKET_OUTGOING {
                net_trace!("raw socket skipped own outgoing frame");
            } else if !iface.is_unset() && addr.sll_ifindex as u32 != iface.index() {
                net_trace!("raw socket skipped frame from if#{}", addr.sll_ifindex);
            } else {
                return Ok(Some(self.buffer[..len].to_vec()));
            }

            if Instant::now() >= deadline {
                return Ok(None);
            }
        }
    }

    fn timeout(&self) -> Option<Duration> {
        Some(self.config.timeout)
    }
}

impl Drop for RawSocket {
    fn drop(&mut self) {
        unsafe { libc::close(self.lower); }
    }
}
