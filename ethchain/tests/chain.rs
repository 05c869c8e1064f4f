use proptest::prelude::*;

use ethchain::layer::eth::Frame;
use ethchain::nic::{Interface, Loopback};
use ethchain::pdu::{Pdu, PduType, Raw, Registry};
use ethchain::wire::{EthernetAddress, EthernetProtocol, Error};

fn address() -> impl Strategy<Value = EthernetAddress> {
    any::<[u8; 6]>().prop_map(EthernetAddress)
}

fn bridging() -> Registry {
    let mut registry = Registry::new();
    registry.register(EthernetProtocol::Bridged, Box::new(Frame::default()));
    registry
}

proptest! {
    #[test]
    fn parse_serialize_identity(data in prop::collection::vec(any::<u8>(), 14..1514)) {
        let frame = Frame::parse(&data).unwrap();
        prop_assert_eq!(frame.size(), data.len());
        prop_assert_eq!(frame.serialize().unwrap(), data.clone());

        let frame = Frame::parse_with(&data, &bridging()).unwrap();
        prop_assert_eq!(frame.serialize().unwrap(), data);
    }

    #[test]
    fn short_buffers_rejected(data in prop::collection::vec(any::<u8>(), 0..14)) {
        let err = Frame::parse(&data).unwrap_err();
        prop_assert_eq!(err, Error::Format { len: data.len(), needed: 14 });
    }

    #[test]
    fn fields_survive(
        dst in address(),
        src in address(),
        length in any::<u16>(),
        payload in prop::collection::vec(any::<u8>(), 0..64),
    ) {
        let inner: Option<Box<dyn Pdu>> = if payload.is_empty() {
            None
        } else {
            Some(Box::new(Raw::from_vec(payload.clone())))
        };

        let mut frame = Frame::new(Interface::UNSET, dst, src, inner);
        frame.set_length(length);
        prop_assert_eq!(frame.header_size(), 14);

        let bytes = frame.serialize().unwrap();
        prop_assert_eq!(&bytes[12..14], &length.to_be_bytes()[..]);

        let parsed = Frame::parse(&bytes).unwrap();
        prop_assert_eq!(parsed.dst_addr(), dst);
        prop_assert_eq!(parsed.src_addr(), src);
        prop_assert_eq!(parsed.length(), length);
        prop_assert_eq!(&bytes[14..], &payload[..]);
    }

    #[test]
    fn swapped_response_matches(
        host in address(),
        peer in address(),
    ) {
        prop_assume!(host != peer);
        let request = Frame::new(Interface::UNSET, peer, host, None);
        let response = Frame::new(Interface::UNSET, host, peer, None);
        prop_assert!(request.matches_response(&response.serialize().unwrap()));
        prop_assert!(!request.matches_response(&request.serialize().unwrap()));
    }
}

#[test]
fn nested_frames() {
    let outer_dst = EthernetAddress([0x02, 0, 0, 0, 0, 1]);
    let inner_dst = EthernetAddress([0x02, 0, 0, 0, 0, 3]);

    let mut inner = Frame::new(Interface::UNSET, inner_dst, outer_dst, Some(Box::new(Raw::new(b"hi"))));
    inner.update_length();
    let mut outer = Frame::new(Interface::UNSET, outer_dst, outer_dst, Some(Box::new(inner)));
    outer.set_ethertype(EthernetProtocol::Bridged);

    let bytes = outer.serialize().unwrap();
    assert_eq!(bytes.len(), 30);

    let parsed: Box<dyn Pdu> = Box::new(Frame::parse_with(&bytes, &bridging()).unwrap());
    let types: Vec<_> = parsed.iter().map(|pdu| pdu.pdu_type()).collect();
    assert_eq!(types, [PduType::Ethernet, PduType::Ethernet, PduType::Raw]);

    let nested = parsed.inner_pdu().unwrap().downcast_ref::<Frame>().unwrap();
    assert_eq!(nested.dst_addr(), inner_dst);
    assert_eq!(nested.length(), 2);
    assert_eq!(parsed.serialize().unwrap(), bytes);
}

#[test]
fn request_response_on_loopback() {
    let host = EthernetAddress([0x02, 0, 0, 0, 0, 1]);
    let peer = EthernetAddress([0x02, 0, 0, 0, 0, 2]);
    let iface = Interface::from_index(1);

    // The encapsulated frame expects the same address relation as the outer one.
    let bridged = Frame::new(iface, peer, host, None);
    let mut request = Frame::new(iface, peer, host, Some(Box::new(bridged)));
    request.set_ethertype(EthernetProtocol::Bridged);

    let mut nic = Loopback::new();
    request.send(&mut nic).unwrap();

    let mut answer = Frame::new(iface, host, peer, Some(Box::new(
        Frame::new(iface, host, peer, Some(Box::new(Raw::new(&[7; 8])))))));
    answer.set_ethertype(EthernetProtocol::Bridged);
    nic.inject(iface, &answer.serialize().unwrap());

    let response = request.recv_response(&mut nic).unwrap().unwrap();
    assert_eq!(response.depth(), 3);
    assert_eq!(response.find::<Raw>().unwrap().payload(), &[7; 8]);
    assert!(request.recv_response(&mut nic).unwrap().is_none());
}
