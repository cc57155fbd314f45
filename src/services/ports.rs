use crate::error::StudioError;
use std::collections::HashSet;
use std::net::TcpListener;
use std::ops::RangeInclusive;

/// Probe deciding whether a host port can be bound
pub type PortProbe = fn(u16) -> bool;

/// Hands out free host ports from a fixed range
///
/// Ports are probed in ascending order. A port handed out or reserved once is
/// skipped on later calls of the same allocator. Nothing is held open: another
/// process may grab the port before docker binds it.
pub struct PortAllocator {
    range: RangeInclusive<u16>,
    handed_out: HashSet<u16>,
    probe: PortProbe,
}

impl PortAllocator {
    pub fn new(range: RangeInclusive<u16>) -> Self {
        Self::with_probe(range, is_port_free)
    }

    pub fn with_probe(range: RangeInclusive<u16>, probe: PortProbe) -> Self {
        Self {
            range,
            handed_out: HashSet::new(),
            probe,
        }
    }

    /// Mark a port chosen elsewhere as taken
    pub fn reserve(&mut self, port: u16) {
        self.handed_out.insert(port);
    }

    pub fn allocate(&mut self) -> Result<u16, StudioError> {
        for port in self.range.clone() {
            if self.handed_out.contains(&port) {
                continue;
            }
            if (self.probe)(port) {
                self.handed_out.insert(port);
                return Ok(port);
            }
        }
        Err(StudioError::PortsExhausted {
            start: *self.range.start(),
            end: *self.range.end(),
        })
    }
}

/// A port is free when it can be bound on localhost
pub fn is_port_free(port: u16) -> bool {
    TcpListener::bind(("127.0.0.1", port)).is_ok()
}
