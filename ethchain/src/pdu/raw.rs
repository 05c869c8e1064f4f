use core::any::Any;

use super::{check_buffer, Pdu, PduType};
use crate::wire::Result;

/// Opaque payload bytes.
///
/// Holds the remainder of a buffer that no registered layer recognized, so that a parsed chain
/// always serializes back to exactly the bytes it was parsed from. Its header is the payload.
#[derive(Clone, Debug, Default)]
pub struct Raw {
    payload: Vec<u8>,
    inner: Option<Box<dyn Pdu>>,
}

impl Raw {
    /// Copy bytes into a new opaque payload.
    pub fn new(payload: &[u8]) -> Self {
        Raw::from_vec(payload.to_vec())
    }

    /// Take ownership of bytes as an opaque payload.
    pub fn from_vec(payload: Vec<u8>) -> Self {
        Raw {
            payload,
            inner: None,
        }
    }

    /// The payload bytes.
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Mutable access to the payload, which may also be resized.
    pub fn payload_mut(&mut self) -> &mut Vec<u8> {
        &mut self.payload
    }

    /// Unwrap the payload bytes.
    pub fn into_payload(self) -> Vec<u8> {
        self.payload
    }
}

impl Pdu for Raw {
    fn pdu_type(&self) -> PduType {
        PduType::Raw
    }

    fn header_size(&self) -> usize {
        self.payload.len()
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
        let (header, rest) = buffer.split_at_mut(split);
        header.copy_from_slice(&self.payload);

        if let Some(inner) = &self.inner {
            inner.write_serialization(rest, Some(self))?;
        }

        Ok(())
    }

    /// Opaque bytes carry nothing to correlate with, any response matches.
    fn matches_response(&self, _: &[u8]) -> bool {
        true
    }

    fn clone_packet(&self, buffer: &[u8]) -> Result<Box<dyn Pdu>> {
        Ok(Box::new(Raw::new(buffer)))
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
}

impl From<Vec<u8>> for Raw {
    fn from(payload: Vec<u8>) -> Self {
        Raw::from_vec(payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wire::Error;

    #[test]
    fn header_is_payload() {
        let raw = Raw::new(b"opaque");
        assert_eq!(raw.pdu_type(), PduType::Raw);
        assert_eq!(raw.header_size(), 6);
        assert_eq!(raw.size(), 6);
        assert_eq!(raw.serialize().unwrap(), b"opaque");
        assert!(raw.matches_response(&[]));
    }

    #[test]
    fn serialize_into_larger_buffer() {
        let raw = Raw::from(vec![1, 2, 3]);
        let mut buffer = [0xaa; 5];
        raw.write_serialization(&mut buffer, None).unwrap();
        assert_eq!(buffer, [1, 2, 3, 0xaa, 0xaa]);

        let mut short = [0; 2];
        assert_eq!(raw.write_serialization(&mut short, None),
                   Err(Error::Serialization { needed: 3, available: 2 }));
    }

    #[test]
    fn clone_packet_takes_everything() {
        let template = Raw::new(&[0; 4]);
        let cloned = template.clone_packet(&[9, 8, 7]).unwrap();
        assert_eq!(cloned.pdu_type(), PduType::Raw);
        assert!(cloned.inner_pdu().is_none());
        assert_eq!(cloned.downcast_ref::<Raw>().unwrap().payload(), &[9, 8, 7]);
        assert_eq!(template.payload(), &[0; 4]);
    }
}
