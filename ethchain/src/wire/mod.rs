/*! Low-level access to the link-layer header.

The `wire` module deals with the packet *representation* of the one layer this crate fully
implements. It provides functions to extract fields from sequences of octets and to insert fields
into sequences of octets, through the lowercase byte wrapper [`ethernet_frame`]. Everything above
single fields, owning a decoded header and an encapsulated chain of further layers, lives in
[`pdu`] and [`layer`].

[`ethernet_frame`]: struct.ethernet_frame.html
[`pdu`]: ../pdu/index.html
[`layer`]: ../layer/index.html

The wrapper guarantees that, if `ethernet_frame::check_len()` returned `Ok(())`, then no field
accessor or setter method will panic. Use `new_checked` when parsing untrusted input. When
emitting, the buffer must have been sized by the caller, usually through the chain's `size()`.

All multi-byte fields are big-endian on the wire and exposed in host order; the conversion
happens in the accessors through `byteorder::NetworkEndian`.

# Examples

```rust
use ethchain::wire::*;
let mut buffer = [0u8; 14];
{ // emission
    let frame = ethernet_frame::new_unchecked_mut(&mut buffer);
    frame.set_dst_addr(EthernetAddress::BROADCAST);
    frame.set_src_addr(EthernetAddress([0x02, 0, 0, 0, 0, 1]));
    frame.set_length(0x0806);
}
{ // parsing
    let frame = ethernet_frame::new_checked(&buffer)
        .expect("truncated frame");
    assert!(frame.dst_addr().is_broadcast());
    assert_eq!(frame.ethertype(), EthernetProtocol::Arp);
}
```
*/
// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD

mod field {
    pub(crate) type Field = ::core::ops::Range<usize>;
    pub(crate) type Rest  = ::core::ops::RangeFrom<usize>;
}

mod ethernet;
mod error;

pub use self::ethernet::{
    ethernet as ethernet_frame,
    EtherType as EthernetProtocol,
    Address as EthernetAddress,
    ParseAddressError,
    HEADER_LEN as ETHERNET_HEADER_LEN};

pub use self::error::{
    Error,
    Result};
