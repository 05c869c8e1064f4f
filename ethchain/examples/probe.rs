//! Sends one frame on a raw socket and prints the first response.
//!
//! # Usage
//!
//! The example opens an `AF_PACKET` socket, which requires root or `CAP_NET_RAW`. It transmits a
//! single frame with the given addresses, length/type field and hex payload on the named interface
//! and then waits for a frame that is addressed back to the source and comes from the destination
//! (or from anyone, when the destination is a group address).
//!
//! 1. Pick an interface and the addresses, for example a veth pair with a peer answering on the
//!    experimental EtherType 0x88b5:
//!
//!   > $ cargo run --example probe -- veth0 02:00:00:00:00:02 02:00:00:00:00:01 --ethertype 88b5 --payload deadbeef
//! 2. Increase the log level for details on skipped frames:
//!
//!   > $ RUST_LOG=ethchain=trace cargo run --example probe -- ...
use std::io::{stdout, Write};
use std::time::Duration;
use structopt::StructOpt;

use ethchain::layer::eth::Frame;
use ethchain::nic::sys::{self, RawSocket};
use ethchain::pdu::{Pdu, Raw};
use ethchain::wire::EthernetAddress;

fn main() {
    env_logger::init();

    let Config {
        name,
        dst,
        src,
        ethertype,
        payload,
        timeout,
    } = Config::from_args();

    let iface = sys::interface_by_name(&name)
        .expect("Couldn't find interface");

    let mut socket = RawSocket::with_config(sys::Config {
        timeout: Duration::from_millis(timeout),
        .. sys::Config::default()
    }).expect("Couldn't open raw socket");

    let inner: Option<Box<dyn Pdu>> = match payload {
        Some(Hex(bytes)) if !bytes.is_empty() => Some(Box::new(Raw::from_vec(bytes))),
        _ => None,
    };

    let mut frame = Frame::new(iface, dst, src, inner);
    match ethertype {
        Some(value) => frame.set_length(value),
        None => frame.update_length(),
    }

    let out = stdout();
    let mut out = out.lock();

    writeln!(out, "> {}", frame).unwrap();
    frame.send(&mut socket).expect("Couldn't send frame");

    match frame.recv_response(&mut socket).expect("Error during receive") {
        Some(response) => {
            writeln!(out, "< {}", response.downcast_ref::<Frame>().unwrap()).unwrap();
            if let Some(raw) = response.find::<Raw>() {
                writeln!(out, "  {}", Hex(raw.payload().to_vec())).unwrap();
            }
        },
        None => writeln!(out, "no response within {}ms", timeout).unwrap(),
    }
}

#[derive(StructOpt)]
struct Config {
    /// The interface to send on, such as `eth0`.
    name: String,
    dst: EthernetAddress,
    src: EthernetAddress,
    /// The length/type field in hex, the payload length if absent.
    #[structopt(long, parse(try_from_str = parse_hex_u16))]
    ethertype: Option<u16>,
    /// The payload in hex.
    #[structopt(long)]
    payload: Option<Hex>,
    /// How long to wait for a response, in milliseconds.
    #[structopt(long, default_value = "2000")]
    timeout: u64,
}

/// Bytes given as a string of hex digits.
struct Hex(Vec<u8>);

impl std::str::FromStr for Hex {
    type Err = String;

    fn from_str(src: &str) -> Result<Self, Self::Err> {
        let digits = src.strip_prefix("0x").unwrap_or(src);
        if digits.len() % 2 != 0 {
            return Err(format!("odd number of hex digits in {:?}", src));
        }

        (0..digits.len())
            .step_by(2)
            .map(|idx| digits.get(idx..idx + 2)
                .and_then(|pair| u8::from_str_radix(pair, 16).ok())
                .ok_or_else(|| format!("invalid hex digits in {:?}", src)))
            .collect::<Result<_, _>>()
            .map(Hex)
    }
}

impl std::fmt::Display for Hex {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for byte in &self.0 {
            write!(f, "{:02x}", byte)?;
        }
        Ok(())
    }
}

fn parse_hex_u16(src: &str) -> Result<u16, std::num::ParseIntError> {
    u16::from_str_radix(src.strip_prefix("0x").unwrap_or(src), 16)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_payload() {
        let Hex(bytes) = "deadbeef".parse().unwrap();
        assert_eq!(bytes, [0xde, 0xad, 0xbe, 0xef]);
        let Hex(bytes) = "0x00ff".parse().unwrap();
        assert_eq!(bytes, [0x00, 0xff]);
        assert!("abc".parse::<Hex>().is_err());
        assert!("0x0x00".parse::<Hex>().is_err());
        assert!("zz".parse::<Hex>().is_err());
    }

    #[test]
    fn hex_ethertype() {
        assert_eq!(parse_hex_u16("88b5"), Ok(0x88b5));
        assert_eq!(parse_hex_u16("0x0806"), Ok(0x0806));
        assert!(parse_hex_u16("0x0x0806").is_err());
    }
}
