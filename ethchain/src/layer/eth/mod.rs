//! The ethernet layer.
//!
//! A [`Frame`] is the outermost layer of a chain on a raw link. Its header is a fixed 14 bytes:
//! destination address, source address and a 16-bit length/type field, in that order and with the
//! field in network byte order. Everything after the header belongs to the inner PDU.
//!
//! The frame is also the layer that knows where it goes. It carries the [`Interface`] it is sent
//! on and that responses are awaited on, so it is the one layer of a chain that implements
//! [`send`] and [`recv_response`].
//!
//! [`Frame`]: struct.Frame.html
//! [`Interface`]: ../../nic/struct.Interface.html
//! [`send`]: ../../pdu/trait.Pdu.html#method.send
//! [`recv_response`]: ../../pdu/trait.Pdu.html#method.recv_response
mod frame;

pub use self::frame::Frame;
