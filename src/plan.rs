//! The launch planner: maps metadata instances onto hosts with finite
//! per-host client capacity.

use log::debug;

use crate::config::{HostSlot, LaunchError};

/// Where one metadata instance's client group runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Metadata instance index, `0..num_meta`.
    pub instance: usize,
    /// Index into the host list.
    pub host: usize,
    /// First CPU of the client group on that host.
    pub cpu_start: usize,
    /// Number of CPUs, one per client.
    pub cpu_len: usize,
}

/// Assign each instance a run of `clients_per_meta` CPUs, sweeping the host
/// list left to right without backtracking.
///
/// A host whose capacity is an exact multiple of `clients_per_meta` is
/// consumed with no leftover offset; the next instance starts cleanly on the
/// next host. A zero-capacity host still receives one nominal placement
/// before the cursor moves past it, mirroring the legacy launcher scripts.
/// If the host list runs out while instances remain, the whole plan is
/// rejected so that no partial launch is ever attempted.
pub fn plan(
    hosts: &[HostSlot],
    num_meta: usize,
    clients_per_meta: usize,
) -> Result<Vec<Placement>, LaunchError> {
    let mut placements = Vec::with_capacity(num_meta);
    let mut host = 0;
    let mut offset = 0;

    for instance in 0..num_meta {
        if host >= hosts.len() {
            return Err(LaunchError::CapacityError {
                placed: instance,
                requested: num_meta,
            });
        }

        debug!(
            "instance {} -> host {} ({}) cpus {}..{}",
            instance,
            host,
            hosts[host].address,
            offset,
            offset + clients_per_meta,
        );

        placements.push(Placement {
            instance,
            host,
            cpu_start: offset,
            cpu_len: clients_per_meta,
        });

        offset += clients_per_meta;
        if offset >= hosts[host].capacity {
            host += 1;
            offset = 0;
        }
    }

    Ok(placements)
}
