//! The capability contract shared by every protocol layer.
//!
//! ## Chains
//!
//! A protocol data unit (PDU) is one layer's header together with its behaviour: parsing,
//! serialization, response matching and duplication. Each PDU exclusively owns at most one inner
//! PDU, the next encapsulated layer, through a `Box<dyn Pdu>`. The outermost PDU thus owns the
//! whole chain. Moving a chain moves ownership, and there is no way to make two chains share a
//! node: [`clone_pdu`] always produces a structurally fresh copy of everything below.
//!
//! ## Serialization
//!
//! The serialized size of a chain is the sum of all header sizes, computed by [`size`]. Each layer
//! writes its own header into the front of the buffer it is handed and delegates the remainder to
//! its inner PDU, passing itself down as the parent context. Layers whose fields depend on the
//! enclosing layer, such as pseudo-header checksums, inspect that parent. There are no back
//! pointers, the context only lives for the duration of the call.
//!
//! ## Responses
//!
//! A layer decides whether a received buffer is the response to the packet it represents with
//! [`matches_response`], usually by comparing its own fields and then deferring the remainder of
//! the buffer to its inner PDU. [`clone_packet`] then builds a chain of the same shape from the
//! matching buffer.
//!
//! [`clone_pdu`]: trait.Pdu.html#tymethod.clone_pdu
//! [`size`]: trait.Pdu.html#method.size
//! [`matches_response`]: trait.Pdu.html#tymethod.matches_response
//! [`clone_packet`]: trait.Pdu.html#tymethod.clone_packet
use core::any::Any;
use core::fmt;
use std::io;

use crate::nic::Sender;
use crate::wire::{Error, Result};

mod raw;
mod registry;

pub use self::raw::Raw;
pub use self::registry::Registry;

/// Identifies the kind of a layer without downcasting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PduType {
    /// Opaque payload bytes, see [`Raw`](struct.Raw.html).
    Raw,
    /// The link-layer frame of [`layer::eth`](../layer/eth/index.html).
    Ethernet,
    /// A layer defined outside of this crate, with a tag chosen by its implementor.
    User(u16),
}

/// The capability set of one protocol layer.
///
/// Implementations own their inner PDU, if any. The trait is object safe, chains are built from
/// `Box<dyn Pdu>` nodes. Generic chain helpers are available as inherent methods on `dyn Pdu`.
pub trait Pdu: fmt::Debug + Send {
    /// The kind of this layer.
    fn pdu_type(&self) -> PduType;

    /// The number of bytes this layer occupies before its inner PDU.
    fn header_size(&self) -> usize;

    /// The next encapsulated layer.
    fn inner_pdu(&self) -> Option<&(dyn Pdu + 'static)>;

    /// Mutable access to the next encapsulated layer.
    fn inner_pdu_mut(&mut self) -> Option<&mut (dyn Pdu + 'static)>;

    /// Replace the next encapsulated layer, returning the previous one.
    ///
    /// Ownership of `inner` moves into this layer, the old inner chain moves out to the caller.
    fn replace_inner_pdu(&mut self, inner: Option<Box<dyn Pdu>>) -> Option<Box<dyn Pdu>>;

    /// Write this layer and its whole inner chain into `buffer`.
    ///
    /// The buffer must be at least [`size`](#method.size) bytes long, otherwise
    /// `Error::Serialization` is returned. `parent` is the layer enclosing this one, if any. The
    /// only effect is on the contents of `buffer`.
    fn write_serialization(&self, buffer: &mut [u8], parent: Option<&(dyn Pdu + 'static)>)
        -> Result<()>;

    /// Decide whether `buffer` is plausibly the direct response to this packet.
    ///
    /// The buffer starts at this layer's header.
    fn matches_response(&self, buffer: &[u8]) -> bool;

    /// Build a fresh PDU of this layer's concrete type from raw bytes.
    ///
    /// This is the factory used when a registry maps a discriminator onto this layer, and when a
    /// response is reconstructed. The receiver acts as a template and is not modified.
    fn clone_packet(&self, buffer: &[u8]) -> Result<Box<dyn Pdu>>;

    /// A structurally independent copy of this layer and its entire inner chain.
    fn clone_pdu(&self) -> Box<dyn Pdu>;

    /// Upcast for downcasting to the concrete layer.
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the concrete layer.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Transmit the serialized chain with a sender.
    ///
    /// Only layers that know where to transmit, link layers in practice, can do this. The default
    /// fails with `io::ErrorKind::Unsupported`.
    fn send(&self, sender: &mut dyn Sender) -> io::Result<()> {
        let _ = sender;
        Err(io::Error::new(io::ErrorKind::Unsupported, "layer can not be sent on its own"))
    }

    /// Receive frames from a sender until one matches as a response to this packet.
    ///
    /// Returns `Ok(None)` when the sender reports that no more frames arrived in time. The default
    /// never receives anything.
    fn recv_response(&self, sender: &mut dyn Sender) -> io::Result<Option<Box<dyn Pdu>>> {
        let _ = sender;
        Ok(None)
    }

    /// The serialized size of this layer and its entire inner chain.
    fn size(&self) -> usize {
        let inner = self.inner_pdu().map_or(0, |inner| inner.size());
        self.header_size() + inner
    }

    /// Serialize the whole chain into a new buffer of exactly [`size`](#method.size) bytes.
    fn serialize(&self) -> Result<Vec<u8>> {
        let mut buffer = vec![0; self.size()];
        self.write_serialization(&mut buffer, None)?;
        Ok(buffer)
    }
}

/// An iterator over a chain, from the outermost layer inwards.
#[derive(Clone, Debug)]
pub struct Chain<'a> {
    next: Option<&'a (dyn Pdu + 'static)>,
}

impl dyn Pdu {
    /// Iterate this layer and all layers it encapsulates.
    pub fn iter(&self) -> Chain<'_> {
        Chain { next: Some(self) }
    }

    /// Query whether this layer is of the concrete type `T`.
    pub fn is<T: Pdu + 'static>(&self) -> bool {
        self.as_any().is::<T>()
    }

    /// Downcast this layer to its concrete type.
    pub fn downcast_ref<T: Pdu + 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Mutably downcast this layer to its concrete type.
    pub fn downcast_mut<T: Pdu + 'static>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }

    /// Find the outermost layer of type `T` in the chain, starting with this one.
    pub fn find<T: Pdu + 'static>(&self) -> Option<&T> {
        self.iter().find_map(|pdu| pdu.downcast_ref::<T>())
    }

    /// Find the outermost layer of type `T` in the chain for modification.
    pub fn find_mut<T: Pdu + 'static>(&mut self) -> Option<&mut T> {
        if self.is::<T>() {
            return self.downcast_mut::<T>();
        }

        self.inner_pdu_mut()?.find_mut::<T>()
    }

    /// Append a layer at the end of the chain, below the current innermost layer.
    pub fn push_innermost(&mut self, pdu: Box<dyn Pdu>) {
        if let Some(inner) = self.inner_pdu_mut() {
            return inner.push_innermost(pdu);
        }

        self.replace_inner_pdu(Some(pdu));
    }

    /// Release ownership of the inner chain, leaving this layer without one.
    pub fn take_inner_pdu(&mut self) -> Option<Box<dyn Pdu>> {
        self.replace_inner_pdu(None)
    }

    /// The number of layers in the chain, including this one.
    pub fn depth(&self) -> usize {
        self.iter().count()
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn Pdu + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.inner_pdu();
        Some(current)
    }
}

impl Clone for Box<dyn Pdu> {
    fn clone(&self) -> Self {
        self.clone_pdu()
    }
}

/// Check the destination buffer of `write_serialization` against the chain size.
///
/// Returns the split point after this layer's header.
pub(crate) fn check_buffer(pdu: &dyn Pdu, buffer: &[u8]) -> Result<usize> {
    let needed = pdu.size();
    if buffer.len() < needed {
        return Err(Error::Serialization { needed, available: buffer.len() });
    }

    Ok(pdu.header_size())
}
