#![allow(unsafe_code)]
// Copyright (C) 2016 whitequark@whitequark.org
// Copyright (C) 2019 Andreas Molzer <andreas.molzer@tum.de>
//
// in large parts from `smoltcp` originally distributed under 0-clause BSD
//
// Applies to files in this folder unless otherwise noted. These are:
// * `linux.rs`
// * `mod.rs`
// * `raw_socket.rs`
use core::{mem, ptr};
use std::io;
use std::os::unix::io::RawFd;
use std::time::Duration;

use libc;

#[cfg(target_os = "linux")]
mod linux;

#[cfg(target_os = "linux")]
mod raw_socket;

/// Module importing all types that should be exported.
///
/// Allows keeping all the `cfg` bits inside this module by enabling a controlled glob import from
/// the super module.
pub mod exports {
    #[cfg(target_os = "linux")]
    pub use super::raw_socket::{Config, RawSocket};
    #[cfg(target_os = "linux")]
    pub use super::linux::interface_by_name;
}

/// Wait until given file descriptor becomes readable, but no longer than given timeout.
///
/// Returns `Ok(false)` when the timeout elapsed first.
pub(crate) fn wait(fd: RawFd, duration: Duration) -> Result<bool, Errno> {
    let mut readfds;

    unsafe {
        let mut readfds_init = mem::MaybeUninit::<libc::fd_set>::uninit();
        libc::FD_ZERO(readfds_init.as_mut_ptr());
        libc::FD_SET(fd, readfds_init.as_mut_ptr());
        readfds = readfds_init.assume_init();
    }

    let mut timeout = libc::timeval {
        tv_sec: duration.as_secs() as libc::time_t,
        tv_usec: duration.subsec_micros() as libc::suseconds_t,
    };

    let res = unsafe {
        libc::select(
            fd + 1,
            &mut readfds,
            ptr::null_mut(),
            ptr::null_mut(),
            &mut timeout)
    };

    FdResult(res).errno()?;
    Ok(res > 0)
}

/// An errno value.
///
/// This is used as the error representation of raw libc calls. It converts into a
/// `std::io::Error` which carries much more extensive error information.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct Errno(pub(crate) libc::c_int);

#[derive(Clone, Copy)]
struct FdResult(pub libc::c_int);

#[derive(Clone, Copy)]
struct IoLenResult(pub libc::ssize_t);

type IoctlResult = FdResult;
#[allow(non_snake_case)] // Emulate type alias also importing constructor.
fn IoctlResult(val: libc::c_int) -> IoctlResult { FdResult(val) }

/// Base for an if ioctl request.
///
/// Contains the name of the interface.
#[repr(C)]
#[derive(Clone, Copy, Debug)]
#[allow(non_camel_case_types)]
struct ifreq {
    ifr_name: [libc::c_char; libc::IF_NAMESIZE],
}

/// Trait for interpreting integer return values.
///
/// Failure signals may vary between:
/// * `-1`
/// * arbitrary negative values
/// * non-zero
trait LibcResult: Copy {
    fn is_fail(self) -> bool;

    fn errno(self) -> Result<(), Errno> {
        if self.is_fail() {
            Err(Errno::new())
        } else {
            Ok(())
        }
    }
}

impl Errno {
    /// Capture the calling thread's current errno.
    pub(crate) fn new() -> Errno {
        Errno(unsafe { *libc::__errno_location() })
    }

    /// Query whether the call was interrupted or would have blocked, and may simply be retried.
    pub(crate) fn is_transient(&self) -> bool {
        self.0 == libc::EINTR || self.0 == libc::EWOULDBLOCK || self.0 == libc::EAGAIN
    }
}

impl LibcResult for FdResult {
    fn is_fail(self) -> bool {
        self.0 == -1
    }
}

impl LibcResult for IoLenResult {
    fn is_fail(self) -> bool {
        self.0 == -1
    }
}

impl From<Errno> for io::Error {
    fn from(err: Errno) -> io::Error {
        io::Error::from_raw_os_error(err.0 as i32)
    }
}

impl ifreq {
    /// Prepare a request for the named interface.
    ///
    /// The name must leave room for the terminating nul and contain none itself.
    fn new(name: &str) -> Result<Self, Errno> {
        let bytes = name.as_bytes();
        if bytes.is_empty() || bytes.len() >= libc::IF_NAMESIZE || bytes.contains(&0) {
            return Err(Errno(libc::EINVAL));
        }

        let mut ifr_name = [0; libc::IF_NAMESIZE];
        for (i, byte) in bytes.iter().enumerate() {
            ifr_name[i] = *byte as libc::c_char
        }

        Ok(ifreq {
            ifr_name,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ifreq_names() {
        assert!(ifreq::new("eth0").is_ok());
        assert_eq!(ifreq::new("").unwrap_err(), Errno(libc::EINVAL));
        assert_eq!(ifreq::new("a-very-long-interface-name").unwrap_err(), Errno(libc::EINVAL));
        assert_eq!(ifreq::new("eth\0").unwrap_err(), Errno(libc::EINVAL));
    }

    #[test]
    fn errno_into_io() {
        let err: io::Error = Errno(libc::ENODEV).into();
        assert_eq!(err.raw_os_error(), Some(libc::ENODEV));
        assert!(Errno(libc::EINTR).is_transient());
        assert!(!Errno(libc::ENODEV).is_transient());
    }
}
