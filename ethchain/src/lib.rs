//! Composable protocol data units on a raw link layer.
//!
//! ## Table of contents
//!
//! 1. [Design](#design-and-relevant-core-concepts)
//! 2. [The wire module](wire/index.html)
//! 3. [Protocol data units](pdu/index.html)
//!    1. [Chains](pdu/index.html#chains)
//!    1. [Serialization](pdu/index.html#serialization)
//!    1. [Responses](pdu/index.html#responses)
//! 4. [The layers](layer/index.html)
//!    1. [The eth layer](layer/eth/index.html)
//! 5. [Network interfaces](nic/index.html)
//!
//! ## Design and relevant core concepts
//!
//! A packet is a chain of layers, each a [`Pdu`], where every layer exclusively owns the layer it
//! encapsulates. The outermost layer is usually a link-layer [`Frame`]. A chain can be built by
//! hand, parsed from bytes with a [`Registry`] deciding which layer follows which discriminator, and
//! deep-copied at any point.
//!
//! Building and transmitting a request, then waiting for the answer, looks like this:
//!
//! ```
//! use ethchain::layer::eth::Frame;
//! use ethchain::nic::{Interface, Loopback};
//! use ethchain::pdu::{Pdu, Raw};
//! use ethchain::wire::{EthernetAddress, EthernetProtocol};
//!
//! let host = EthernetAddress([0x02, 0, 0, 0, 0, 1]);
//! let peer = EthernetAddress([0x02, 0, 0, 0, 0, 2]);
//! let iface = Interface::from_index(1);
//!
//! let mut request = Frame::new(iface, peer, host, Some(Box::new(Raw::new(b"ping"))));
//! request.set_ethertype(EthernetProtocol::Experimental);
//!
//! let mut nic = Loopback::new();
//! request.send(&mut nic).unwrap();
//!
//! // Pretend the peer answered.
//! let mut answer = Frame::new(iface, host, peer, Some(Box::new(Raw::new(b"pong"))));
//! answer.set_ethertype(EthernetProtocol::Experimental);
//! nic.inject(iface, &answer.serialize().unwrap());
//!
//! let response = request.recv_response(&mut nic).unwrap().expect("answer was queued");
//! assert_eq!(response.find::<Raw>().unwrap().payload(), b"pong");
//! ```
//!
//! [`Pdu`]: pdu/trait.Pdu.html
//! [`Frame`]: layer/eth/struct.Frame.html
//! [`Registry`]: pdu/struct.Registry.html
#![warn(missing_docs)]
#![warn(unreachable_pub)]

#[macro_use] mod macros;
pub mod layer;
pub mod nic;
pub mod pdu;
pub mod wire;
