use core::any::Any;
use core::fmt;
use std::io;
use std::time::Instant;

use crate::nic::{Interface, Sender};
use crate::pdu::{check_buffer, Pdu, PduType, Raw, Registry};
use crate::wire::{ethernet_frame, EthernetAddress, EthernetProtocol, Result, ETHERNET_HEADER_LEN};

/// A link-layer frame with a fixed 14-byte header.
///
/// Owns at most one inner PDU. The length/type field is kept in host order and only converted to
/// network order when the header is written.
#[derive(Clone, Debug)]
pub struct Frame {
    dst_addr: EthernetAddress,
    src_addr: EthernetAddress,
    length: u16,
    iface: Interface,
    inner: Option<Box<dyn Pdu>>,
}

impl Frame {
    /// The length of the header, independent of content.
    pub const HEADER_LEN: usize = ETHERNET_HEADER_LEN;

    /// The broadcast address.
    pub const BROADCAST: EthernetAddress = EthernetAddress::BROADCAST;

    /// Create a frame to be sent on `iface`.
    ///
    /// Ownership of `inner` moves into the frame. The length field starts out as zero, set it
    /// explicitly or with [`update_length`](#method.update_length).
    pub fn new(
        iface: Interface,
        dst_addr: EthernetAddress,
        src_addr: EthernetAddress,
        inner: Option<Box<dyn Pdu>>,
    ) -> Self {
        Frame {
            dst_addr,
            src_addr,
            length: 0,
            iface,
            inner,
        }
    }

    /// Parse a frame, keeping everything after the header as opaque payload.
    ///
    /// Fails with `Error::Format` for buffers shorter than the header. A buffer of exactly the
    /// header length yields a frame without inner PDU.
    pub fn parse(buffer: &[u8]) -> Result<Self> {
        Self::parse_with(buffer, &Registry::new())
    }

    /// Parse a frame, building the inner PDU through a registry.
    ///
    /// The registry is consulted with the length/type field. Bytes it does not recognize are kept
    /// as a `Raw` inner PDU so that the frame serializes back to the original buffer.
    pub fn parse_with(buffer: &[u8], registry: &Registry) -> Result<Self> {
        let frame = ethernet_frame::new_checked(buffer)?;
        let mut parsed = Frame::from_header(frame, Interface::UNSET);
        parsed.inner = registry.parse_or_raw(parsed.length, frame.payload_slice());
        Ok(parsed)
    }

    fn from_header(frame: &ethernet_frame, iface: Interface) -> Self {
        Frame {
            dst_addr: frame.dst_addr(),
            src_addr: frame.src_addr(),
            length: frame.length(),
            iface,
            inner: None,
        }
    }

    /// Return the destination address.
    pub fn dst_addr(&self) -> EthernetAddress {
        self.dst_addr
    }

    /// Return the source address.
    pub fn src_addr(&self) -> EthernetAddress {
        self.src_addr
    }

    /// Return the interface the frame is sent and answered on.
    pub fn iface(&self) -> Interface {
        self.iface
    }

    /// Return the length/type field, in host order.
    pub fn length(&self) -> u16 {
        self.length
    }

    /// Return the length/type field as an EtherType.
    pub fn ethertype(&self) -> EthernetProtocol {
        EthernetProtocol::from(self.length)
    }

    /// Set the destination address.
    pub fn set_dst_addr(&mut self, value: EthernetAddress) {
        self.dst_addr = value;
    }

    /// Set the source address.
    pub fn set_src_addr(&mut self, value: EthernetAddress) {
        self.src_addr = value;
    }

    /// Set the interface.
    pub fn set_iface(&mut self, value: Interface) {
        self.iface = value;
    }

    /// Set the length/type field from a host order value.
    pub fn set_length(&mut self, value: u16) {
        self.length = value;
    }

    /// Set the length/type field from an EtherType.
    pub fn set_ethertype(&mut self, value: EthernetProtocol) {
        self.length = value.into();
    }

    /// Set the length field to the size of the inner chain.
    ///
    /// Sizes that do not fit the field saturate at `u16::MAX`.
    pub fn update_length(&mut self) {
        let payload = self.inner.as_ref().map_or(0, |inner| inner.size());
        self.length = if payload > usize::from(u16::MAX) {
            u16::MAX
        } else {
            payload as u16
        };
    }

    /// The address relation of a response: it is addressed to us and, unless we sent to a group,
    /// comes from whom we sent to.
    fn is_reply(&self, frame: &ethernet_frame) -> bool {
        if frame.dst_addr() != self.src_addr {
            return false;
        }

        self.dst_addr.is_multicast() || frame.src_addr() == self.dst_addr
    }
}

impl Pdu for Frame {
    fn pdu_type(&self) -> PduType {
        PduType::Ethernet
    }

    fn header_size(&self) -> usize {
        Self::HEADER_LEN
    }

    fn inner_pdu(&self) -> Option<&(dyn Pdu + 'static)> {
        self.inner.as_deref()
    }

    fn inner_pdu_mut(&mut self) -> Option<&mut (dyn Pdu + 'static)> {
        self.inner.as_deref_mut()
    }

    fn replace_inner_pdu(&mut self, inner: Option<Box<dyn Pdu>>) -> Option<Box<dyn Pdu>> {
        core::mem::replace(&mut self.inner, inner)
    }

    fn write_serialization(&self, buffer: &mut [u8], _: Option<&(dyn Pdu + 'static)>)
        -> Result<()>
    {
        let split = check_buffer(self, buffer)?;
        let (header, payload) = buffer.split_at_mut(split);

        let frame = ethernet_frame::new_unchecked_mut(header);
        frame.set_dst_addr(self.dst_addr);
        frame.set_src_addr(self.src_addr);
        frame.set_length(self.length);

        if let Some(inner) = &self.inner {
            inner.write_serialization(payload, Some(self))?;
        }

        Ok(())
    }

    /// With an inner chain, the payload must be accepted by it. An empty payload is only accepted
    /// by an inner chain that serializes to nothing itself.
    fn matches_response(&self, buffer: &[u8]) -> bool {
        let frame = match ethernet_frame::new_checked(buffer) {
            Ok(frame) => frame,
            Err(_) => return false,
        };

        if !self.is_reply(frame) {
            return false;
        }

        match &self.inner {
            None => true,
            Some(inner) => {
                let payload = frame.payload_slice();
                if payload.is_empty() && inner.size() > 0 {
                    return false;
                }
                inner.matches_response(payload)
            },
        }
    }

    /// Parse a new frame, using this frame's inner chain as the template for the payload.
    ///
    /// The new frame is bound to this frame's interface. Payload the template does not accept, or
    /// any payload when there is no template, is kept as `Raw`.
    fn clone_packet(&self, buffer: &[u8]) -> Result<Box<dyn Pdu>> {
        let frame = ethernet_frame::new_checked(buffer)?;
        let mut cloned = Frame::from_header(frame, self.iface);

        let payload = frame.payload_slice();
        if !payload.is_empty() {
            let inner: Box<dyn Pdu> = match &self.inner {
                Some(template) => match template.clone_packet(payload) {
                    Ok(inner) => inner,
                    Err(err) => {
                        net_debug!("template {:?} rejected payload: {}", template.pdu_type(), err);
                        Box::new(Raw::new(payload))
                    },
                },
                None => Box::new(Raw::new(payload)),
            };
            cloned.inner = Some(inner);
        }

        Ok(Box::new(cloned))
    }

    fn clone_pdu(&self) -> Box<dyn Pdu> {
        Box::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn send(&self, sender: &mut dyn Sender) -> io::Result<()> {
        let buffer = self.serialize()
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        net_trace!("sending {} on {}, {} bytes", self, self.iface, buffer.len());
        sender.send(self.iface, &buffer)
    }

    /// Receive until a response matches or the sender's timeout elapsed.
    ///
    /// The timeout bounds the search as a whole. Frames that do not match do not extend it.
    fn recv_response(&self, sender: &mut dyn Sender) -> io::Result<Option<Box<dyn Pdu>>> {
        let deadline = sender.timeout().map(|timeout| Instant::now() + timeout);

        loop {
            if deadline.map_or(false, |deadline| Instant::now() >= deadline) {
                net_debug!("no response to {} on {} before the deadline", self, self.iface);
                return Ok(None);
            }

            let buffer = match sender.recv(self.iface, deadline)? {
                Some(buffer) => buffer,
                None => {
                    net_debug!("no response to {} on {}", self, self.iface);
                    return Ok(None);
                },
            };

            if !self.matches_response(&buffer) {
                net_trace!("skipping {} byte frame, not a response", buffer.len());
                continue;
            }

            match self.clone_packet(&buffer) {
                Ok(response) => return Ok(Some(response)),
                Err(err) => net_debug!("dropping matched frame: {}", err),
            }
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Frame::new(Interface::UNSET, EthernetAddress::default(), EthernetAddress::default(), None)
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "802.3 src={} dst={} len={}",
               self.src_addr, self.dst_addr, self.ethertype())
    }
}
