//! Concrete protocol layers.
//!
//! Each layer is a [`Pdu`] implementation owning its header fields and, optionally, the next
//! encapsulated layer. Layers know how to write themselves, how to recognize a response to what
//! they represent, and how to build a fresh instance of themselves from bytes.
//!
//! Only the link layer is provided here. Further layers are defined by implementing [`Pdu`] and
//! registering a prototype in a [`Registry`] under the discriminator of the enclosing layer.
//!
//! [`Pdu`]: ../pdu/trait.Pdu.html
//! [`Registry`]: ../pdu/struct.Registry.html
pub mod eth;
