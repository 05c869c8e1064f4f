// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
use std::io;

use super::{ifreq, Errno, FdResult, LibcResult, IoctlResult};
use crate::nic::Interface;
use libc;

pub(crate) const ETH_P_ALL:       libc::c_short = 0x0003;
pub(crate) const PACKET_OUTGOING: libc::c_uchar = 4;

pub(crate) trait IfIndex {
    fn get_if_index(&mut self, fd: libc::c_int) -> Result<libc::c_int, Errno>;
}

impl ifreq {
    pub(crate) const SIOCGIFINDEX: libc::Ioctl = 0x8933;
}

/// The `SIOCGIFINDEX` request, laid out as a full `struct ifreq`.
///
/// The kernel copies the whole struct in and out, including the unused part of its union.
#[repr(C)]
struct IndexRequest {
    interface: ifreq,
    ifr_ifindex: libc::c_int,
    _pad: [u8; 20],
}

impl IfIndex for ifreq {
    fn get_if_index(&mut self, fd: libc::c_int) -> Result<libc::c_int, Errno> {
        let mut request = IndexRequest {
            interface: *self,
            ifr_ifindex: 0,
            _pad: [0; 20],
        };

        let res = unsafe {
            libc::ioctl(fd, Self::SIOCGIFINDEX, &mut request as *mut _)
        };

        IoctlResult(res).errno()?;

        Ok(request.ifr_ifindex)
    }
}

/// Look up the interface handle of a named local interface.
///
/// Uses an unprivileged datagram socket for the query, no capabilities are required.
pub fn interface_by_name(name: &str) -> io::Result<Interface> {
    let mut request = ifreq::new(name)?;

    let fd = unsafe {
        libc::socket(libc::AF_INET, libc::SOCK_DGRAM | libc::SOCK_CLOEXEC, 0)
    };
    FdResult(fd).errno()?;

    let index = request.get_if_index(fd);
    unsafe { libc::close(fd); }

    Ok(Interface::from_index(index? as u32))
}
