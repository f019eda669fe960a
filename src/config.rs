//! Launch configuration and host-list parsing.

use failure_derive::Fail;

/// Errors that abort a launch. All of them are fatal before any command is
/// submitted; a partial launch is never attempted from an invalid plan.
#[derive(Debug, Fail)]
pub enum LaunchError {
    /// A `--hosts` entry is missing its `:capacity` suffix or carries a
    /// non-integer capacity.
    #[fail(display = "malformed host entry {:?}: {}", entry, reason)]
    ParseError { entry: String, reason: String },

    /// A numeric option is outside its valid range.
    #[fail(display = "invalid configuration: {}", reason)]
    ConfigError { reason: String },

    /// The requested instances do not fit on the given host list.
    #[fail(
        display = "host list exhausted: only {} of {} instances fit",
        placed, requested
    )]
    CapacityError { placed: usize, requested: usize },
}

/// One `address:capacity` entry from `--hosts`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostSlot {
    pub address: String,
    /// Client slots available on this host.
    pub capacity: usize,
}

/// Parse a comma-separated list of `address:capacity` entries.
pub fn parse_hosts(list: &str) -> Result<Vec<HostSlot>, LaunchError> {
    list.split(',').map(parse_host).collect()
}

fn parse_host(entry: &str) -> Result<HostSlot, LaunchError> {
    // The capacity suffix starts at the last colon, so IPv6-style addresses
    // with embedded colons still parse.
    let sep = entry.rfind(':').ok_or_else(|| LaunchError::ParseError {
        entry: entry.to_owned(),
        reason: "missing `:capacity` suffix".to_owned(),
    })?;

    let (address, suffix) = entry.split_at(sep);

    if address.is_empty() {
        return Err(LaunchError::ParseError {
            entry: entry.to_owned(),
            reason: "empty host address".to_owned(),
        });
    }

    let capacity = suffix[1..]
        .parse::<usize>()
        .map_err(|e| LaunchError::ParseError {
            entry: entry.to_owned(),
            reason: format!("bad capacity: {}", e),
        })?;

    Ok(HostSlot {
        address: address.to_owned(),
        capacity,
    })
}

/// Static parameters of one invocation. Built once from the command line and
/// passed by value into the planner and formatter; never read back from
/// ambient process state.
#[derive(Debug, Clone)]
pub struct LaunchConfig {
    /// Base address of the metadata servers.
    pub ip: String,
    /// Port of instance 0; instance `i` listens on `base_port + i`.
    pub base_port: usize,
    pub clients_per_meta: usize,
    pub num_meta: usize,
    /// Worker threads per client, forwarded to the hook library.
    pub client_threads: usize,
    /// Forwarded verbatim to the mdtest binary.
    pub mdtest_args: String,
    /// Forwarded verbatim to the mpirun invocation.
    pub extra_mpi_args: String,
    /// Emit a `--cpu-list` pinning for each client group.
    pub cpu_affinity: bool,
}

impl LaunchConfig {
    pub fn validate(&self) -> Result<(), LaunchError> {
        if self.clients_per_meta == 0 {
            return Err(LaunchError::ConfigError {
                reason: "--clients_per_meta must be positive".to_owned(),
            });
        }
        if self.num_meta == 0 {
            return Err(LaunchError::ConfigError {
                reason: "--num_meta must be positive".to_owned(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn host_round_trip() {
        let hosts = parse_hosts("10.0.0.1:8").unwrap();
        assert_eq!(hosts.len(), 1);
        assert_eq!(hosts[0].address, "10.0.0.1");
        assert_eq!(hosts[0].capacity, 8);
    }

    #[test]
    fn host_list_order_preserved() {
        let hosts = parse_hosts("h1:4,h2:2,h3:0").unwrap();
        assert_eq!(
            hosts,
            vec![
                HostSlot {
                    address: "h1".to_owned(),
                    capacity: 4
                },
                HostSlot {
                    address: "h2".to_owned(),
                    capacity: 2
                },
                HostSlot {
                    address: "h3".to_owned(),
                    capacity: 0
                },
            ]
        );
    }

    #[test]
    fn missing_capacity_suffix_is_named() {
        match parse_hosts("h1:4,badhost").unwrap_err() {
            LaunchError::ParseError { entry, .. } => assert_eq!(entry, "badhost"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn non_integer_capacity_is_named() {
        match parse_hosts("h1:lots").unwrap_err() {
            LaunchError::ParseError { entry, .. } => assert_eq!(entry, "h1:lots"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn zero_counts_rejected() {
        let mut cfg = LaunchConfig {
            ip: "10.10.1.7".to_owned(),
            base_port: 10101,
            clients_per_meta: 0,
            num_meta: 1,
            client_threads: 1,
            mdtest_args: String::new(),
            extra_mpi_args: String::new(),
            cpu_affinity: false,
        };
        assert!(cfg.validate().is_err());

        cfg.clients_per_meta = 1;
        cfg.num_meta = 0;
        assert!(cfg.validate().is_err());

        cfg.num_meta = 1;
        assert!(cfg.validate().is_ok());
    }
}
