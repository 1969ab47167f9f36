//! Free TCP port discovery for the CARLA world server and traffic manager.

use std::net::{Ipv4Addr, TcpListener};
use std::ops::Range;

use log::debug;

use crate::error::{VizError, VizResult};

pub const WORLD_PORT_RANGE: Range<u16> = 10000..20000;
pub const TM_PORT_RANGE: Range<u16> = 30000..40000;

/// First port in `range` that can be bound on localhost.
///
/// The probe listener is dropped before returning, so another process may
/// still grab the port before the evaluator does.
pub fn find_available_port(range: Range<u16>) -> VizResult<u16> {
    for port in range.clone() {
        match TcpListener::bind((Ipv4Addr::LOCALHOST, port)) {
            Ok(_) => return Ok(port),
            Err(e) => debug!("port {} unavailable: {}", port, e),
        }
    }
    Err(VizError::config(
        "port",
        format!("{}..{}", range.start, range.end),
        "no free port in range",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skips_bound_port() {
        // hold a port, then ask for a range starting at it
        let held = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).unwrap();
        let port = held.local_addr().unwrap().port();
        if port == u16::MAX {
            return;
        }
        let found = find_available_port(port..port.saturating_add(64)).unwrap();
        assert_ne!(found, port);
        assert!(found > port);
    }

    #[test]
    fn test_empty_range_is_an_error() {
        assert!(find_available_port(20000..20000).is_err());
    }
}
