//! Encapsulates a network interface card.
//!
//! The layers in this crate never touch a device themselves. Transmission and reception of fully
//! serialized frames is delegated to a [`Sender`], which may be a raw socket on a real interface,
//! the in-memory [`Loopback`] or any user implementation. The length of a timeout is the business
//! of the sender. A layer waiting for a response turns it into a single deadline for its whole
//! search, so unrelated traffic can not extend the wait. A receive that yields nothing before the
//! deadline reports `Ok(None)`.
//!
//! [`Sender`]: trait.Sender.html
//! [`Loopback`]: loopback/struct.Loopback.html
use core::fmt;
use std::io;
use std::time::{Duration, Instant};

pub mod loopback;

#[cfg(feature = "sys")]
#[path="sys/mod.rs"]
mod sys_internal;

pub use self::loopback::Loopback;

#[cfg(feature = "sys")]
pub use self::sys_internal::exports as sys;

/// A handle identifying a local network interface.
///
/// This is only a value for comparison, in practice the OS interface index. The unset sentinel is
/// used for frames that were only parsed and are not bound to any interface.
#[derive(Clone, Copy, Debug, Default, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Interface(u32);

impl Interface {
    /// The sentinel for no interface at all.
    pub const UNSET: Interface = Interface(0);

    /// Wrap an OS interface index.
    pub const fn from_index(index: u32) -> Self {
        Interface(index)
    }

    /// The OS interface index, `0` when unset.
    pub fn index(self) -> u32 {
        self.0
    }

    /// Query whether this is the unset sentinel.
    pub fn is_unset(self) -> bool {
        self == Self::UNSET
    }
}

impl fmt::Display for Interface {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.is_unset() {
            f.write_str("if#unset")
        } else {
            write!(f, "if#{}", self.0)
        }
    }
}

/// A blocking transmitter and receiver of serialized frames.
///
/// Errors are plain I/O errors and are passed on unchanged by the layers in this crate.
pub trait Sender {
    /// Transmit one complete frame on an interface.
    fn send(&mut self, iface: Interface, frame: &[u8]) -> io::Result<()>;

    /// Receive the next frame from an interface.
    ///
    /// Blocks until `deadline` at the latest, or for at most the sender's own [`timeout`] when no
    /// deadline is given. Returns `Ok(None)` when no frame arrived in time or no more frames will
    /// ever arrive. An unset interface accepts frames from any interface.
    ///
    /// [`timeout`]: #method.timeout
    fn recv(&mut self, iface: Interface, deadline: Option<Instant>) -> io::Result<Option<Vec<u8>>>;

    /// How long a search for a response may take in total.
    ///
    /// `None` for senders that never block, these report exhaustion instead.
    fn timeout(&self) -> Option<Duration> {
        None
    }
}

impl<S: Sender + ?Sized> Sender for &'_ mut S {
    fn send(&mut self, iface: Interface, frame: &[u8]) -> io::Result<()> {
        (**self).send(iface, frame)
    }

    fn recv(&mut self, iface: Interface, deadline: Option<Instant>) -> io::Result<Option<Vec<u8>>> {
        (**self).recv(iface, deadline)
    }

    fn timeout(&self) -> Option<Duration> {
        (**self).timeout()
    }
}

impl<S: Sender + ?Sized> Sender for Box<S> {
    fn send(&mut self, iface: Interface, frame: &[u8]) -> io::Result<()> {
        (**self).send(iface, frame)
    }

    fn recv(&mut self, iface: Interface, deadline: Option<Instant>) -> io::Result<Option<Vec<u8>>> {
        (**self).recv(iface, deadline)
    }

    fn timeout(&self) -> Option<Duration> {
        (**self).timeout()
    }
}

/// Some base types for other tests.
#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// A sender on which every operation fails with a fixed error kind.
    pub(crate) struct Broken(pub io::ErrorKind);

    impl Sender for Broken {
        fn send(&mut self, _: Interface, _: &[u8]) -> io::Result<()> {
            Err(io::Error::new(self.0, "broken sender"))
        }

        fn recv(&mut self, _: Interface, _: Option<Instant>) -> io::Result<Option<Vec<u8>>> {
            Err(io::Error::new(self.0, "broken sender"))
        }
    }

    #[test]
    fn unset_interface() {
        assert!(Interface::UNSET.is_unset());
        assert!(Interface::default().is_unset());
        assert!(!Interface::from_index(3).is_unset());
        assert_eq!(Interface::from_index(3).index(), 3);
        assert_eq!(Interface::from_index(3).to_string(), "if#3");
        assert_eq!(Interface::UNSET.to_string(), "if#unset");
    }

    #[test]
    fn forwarding_impls() {
        let mut broken = Broken(io::ErrorKind::NotConnected);
        let mut by_ref: &mut dyn Sender = &mut broken;
        let err = Sender::send(&mut by_ref, Interface::UNSET, &[]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotConnected);

        let mut boxed: Box<dyn Sender> = Box::new(Broken(io::ErrorKind::TimedOut));
        let err = boxed.recv(Interface::UNSET, None).unwrap_err();
        assert_eq!(boxed.timeout(), None);
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
    }
}
