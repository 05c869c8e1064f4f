//! Implementation of a software loop-back device.
use std::collections::VecDeque;
use std::io;
use std::time::Instant;

use super::{Interface, Sender};

/// A software loop-back device.
///
/// Every transmitted frame is queued and handed out again by later receives, in order. Frames can
/// also be injected directly, as if they had arrived from the wire. A receive on an empty queue
/// reports exhaustion with `Ok(None)` instead of blocking, so a response search ends once all
/// queued frames have been inspected.
#[derive(Debug, Default)]
pub struct Loopback {
    queue: VecDeque<(Interface, Vec<u8>)>,
    capacity: Option<usize>,
    sent: usize,
}

impl Loopback {
    /// Create an unbounded loop-back device.
    pub fn new() -> Self {
        Loopback::default()
    }

    /// Create a loop-back device holding at most `capacity` frames in flight.
    ///
    /// Sending on a full device fails with `io::ErrorKind::WouldBlock`.
    pub fn with_capacity(capacity: usize) -> Self {
        Loopback {
            queue: VecDeque::with_capacity(capacity),
            capacity: Some(capacity),
            sent: 0,
        }
    }

    /// Queue a frame as if it had been received on `iface`.
    pub fn inject(&mut self, iface: Interface, frame: &[u8]) {
        self.queue.push_back((iface, frame.to_vec()));
    }

    /// The number of frames currently queued.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// The number of frames sent so far.
    pub fn sent(&self) -> usize {
        self.sent
    }
}

impl Sender for Loopback {
    fn send(&mut self, iface: Interface, frame: &[u8]) -> io::Result<()> {
        if let Some(capacity) = self.capacity {
            if self.queue.len() >= capacity {
                return Err(io::Error::new(io::ErrorKind::WouldBlock, "loopback queue full"));
            }
        }

        self.queue.push_back((iface, frame.to_vec()));
        self.sent += 1;
        Ok(())
    }

    /// Never blocks, the deadline has no effect.
    fn recv(&mut self, iface: Interface, _: Option<Instant>) -> io::Result<Option<Vec<u8>>> {
        let position = self.queue
            .iter()
            .position(|(queued, _)| iface.is_unset() || *queued == iface);

        match position.and_then(|idx| self.queue.remove(idx)) {
            Some((_, frame)) => Ok(Some(frame)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_loopback() {
        let iface = Interface::from_index(1);
        let mut loopback = Loopback::new();
        assert_eq!(loopback.send(iface, &[1, 2, 3]).unwrap(), ());
        assert_eq!(loopback.send(iface, &[4, 5]).unwrap(), ());
        assert_eq!(loopback.sent(), 2);
        assert_eq!(loopback.pending(), 2);
        assert_eq!(loopback.recv(iface, None).unwrap(), Some(vec![1, 2, 3]));
        assert_eq!(loopback.recv(iface, None).unwrap(), Some(vec![4, 5]));
        assert_eq!(loopback.recv(iface, None).unwrap(), None);
    }

    #[test]
    fn per_interface() {
        let one = Interface::from_index(1);
        let two = Interface::from_index(2);
        let mut loopback = Loopback::new();
        loopback.inject(one, &[1]);
        loopback.inject(two, &[2]);
        assert_eq!(loopback.recv(two, None).unwrap(), Some(vec![2]));
        assert_eq!(loopback.recv(two, None).unwrap(), None);
        assert_eq!(loopback.recv(Interface::UNSET, None).unwrap(), Some(vec![1]));
        assert_eq!(loopback.sent(), 0);
    }

    #[test]
    fn bounded() {
        let mut loopback = Loopback::with_capacity(1);
        loopback.send(Interface::UNSET, &[0]).unwrap();
        let err = loopback.send(Interface::UNSET, &[0]).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::WouldBlock);
        assert_eq!(loopback.sent(), 1);
    }
}
