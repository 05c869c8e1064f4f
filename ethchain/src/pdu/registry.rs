use std::collections::HashMap;

use super::{Pdu, Raw};

/// Maps a discriminator onto the layer that parses the bytes it announces.
///
/// Each entry is a prototype PDU whose [`clone_packet`] builds the next layer. The discriminator is
/// the raw 16-bit field value of the enclosing layer, such as the link layer's length/type field;
/// anything convertible into a `u16`, including `EthernetProtocol`, can be used as a key.
///
/// [`clone_packet`]: trait.Pdu.html#tymethod.clone_packet
#[derive(Clone, Debug, Default)]
pub struct Registry {
    prototypes: HashMap<u16, Box<dyn Pdu>>,
}

impl Registry {
    /// Create a registry that recognizes nothing.
    pub fn new() -> Self {
        Registry::default()
    }

    /// Register a prototype for a discriminator, returning the previous one.
    pub fn register(&mut self, discriminator: impl Into<u16>, prototype: Box<dyn Pdu>)
        -> Option<Box<dyn Pdu>>
    {
        self.prototypes.insert(discriminator.into(), prototype)
    }

    /// Remove the prototype of a discriminator.
    pub fn unregister(&mut self, discriminator: impl Into<u16>) -> Option<Box<dyn Pdu>> {
        self.prototypes.remove(&discriminator.into())
    }

    /// Query whether a discriminator is recognized.
    pub fn contains(&self, discriminator: impl Into<u16>) -> bool {
        self.prototypes.contains_key(&discriminator.into())
    }

    /// The number of registered discriminators.
    pub fn len(&self) -> usize {
        self.prototypes.len()
    }

    /// Query whether no discriminator is registered.
    pub fn is_empty(&self) -> bool {
        self.prototypes.is_empty()
    }

    /// Try to build the layer announced by `discriminator` from `buffer`.
    ///
    /// Returns `None` when the discriminator is unrecognized or its prototype rejects the bytes.
    pub fn parse(&self, discriminator: impl Into<u16>, buffer: &[u8]) -> Option<Box<dyn Pdu>> {
        let discriminator = discriminator.into();
        let prototype = self.prototypes.get(&discriminator)?;
        match prototype.clone_packet(buffer) {
            Ok(pdu) => Some(pdu),
            Err(err) => {
                net_debug!("registered layer for 0x{:04x} rejected payload: {}", discriminator, err);
                None
            },
        }
    }

    /// Build the announced layer, or keep the bytes as opaque payload.
    ///
    /// Only an empty buffer yields `None`, there is nothing to preserve then.
    pub fn parse_or_raw(&self, discriminator: impl Into<u16>, buffer: &[u8])
        -> Option<Box<dyn Pdu>>
    {
        if buffer.is_empty() {
            return None;
        }

        let discriminator = discriminator.into();
        self.parse(discriminator, buffer).or_else(|| {
            net_trace!("keeping {} bytes after 0x{:04x} as raw payload", buffer.len(), discriminator);
            let raw: Box<dyn Pdu> = Box::new(Raw::new(buffer));
            Some(raw)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pdu::PduType;
    use crate::wire::EthernetProtocol;

    #[test]
    fn unrecognized() {
        let registry = Registry::new();
        assert!(registry.is_empty());
        assert!(registry.parse(0x0800u16, &[1, 2, 3]).is_none());

        let raw = registry.parse_or_raw(0x0800u16, &[1, 2, 3]).unwrap();
        assert_eq!(raw.pdu_type(), PduType::Raw);
        assert_eq!(raw.serialize().unwrap(), [1, 2, 3]);
        assert!(registry.parse_or_raw(0x0800u16, &[]).is_none());
    }

    #[test]
    fn typed_and_raw_keys() {
        let mut registry = Registry::new();
        assert!(registry.register(EthernetProtocol::Experimental, Box::new(Raw::default())).is_none());
        assert!(registry.contains(0x88b5u16));
        assert!(registry.contains(EthernetProtocol::Unknown(0x88b5)));
        assert_eq!(registry.len(), 1);

        let parsed = registry.parse(0x88b5u16, &[4, 5]).unwrap();
        assert_eq!(parsed.serialize().unwrap(), [4, 5]);

        assert!(registry.unregister(EthernetProtocol::Experimental).is_some());
        assert!(!registry.contains(EthernetProtocol::Experimental));
    }
}
