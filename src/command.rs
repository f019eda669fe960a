//! Rendering of the `mpirun` command line for one metadata instance.

use crate::config::{HostSlot, LaunchConfig};
use crate::plan::Placement;

/// Preload library that redirects mdtest's filesystem calls to the metadata
/// service client.
const HOOK_LIB: &str = "/usr/local/lib/libdeltafs-hook.so";

const MPI_LAUNCHER: &str = "mpirun";
const MDTEST_BIN: &str = "~/mdtest";

/// Commands joined with this separator run as concurrent background jobs of
/// one shell.
pub const CONCURRENT_SEP: &str = " & ";

/// Render the launch command for one placement.
///
/// The environment variable names are read by name by the hook library and
/// the metadata server; they must not change. Each client group sees exactly
/// one server, so `DELTAFS_NumOfMetadataSrvs` is always 1 and the address
/// list is the single `ip:port` of the group's instance.
pub fn render(host: &HostSlot, p: &Placement, cfg: &LaunchConfig) -> String {
    let mut cmd = format!(
        "{} -np {} --host {}",
        MPI_LAUNCHER, cfg.clients_per_meta, host.address
    );

    if cfg.cpu_affinity {
        let cpus = (p.cpu_start..p.cpu_start + p.cpu_len)
            .map(|c| c.to_string())
            .collect::<Vec<_>>()
            .join(",");
        cmd.push_str(&format!(" --cpu-list {}", cpus));
    }

    if !cfg.extra_mpi_args.is_empty() {
        cmd.push_str(&format!(" {}", cfg.extra_mpi_args));
    }

    cmd.push_str(&format!(
        " env LD_PRELOAD={} DELTAFS_NumOfMetadataSrvs=1 \
         DELTAFS_NumOfClientThreads={} DELTAFS_MetadataSrvAddrs={}:{} \
         DELTAFS_InstanceId={}",
        HOOK_LIB,
        cfg.client_threads,
        cfg.ip,
        cfg.base_port + p.instance,
        p.instance,
    ));

    cmd.push_str(&format!(" {} {}", MDTEST_BIN, cfg.mdtest_args));

    cmd
}

/// Join rendered commands so that each starts without waiting for the
/// previous one to finish.
pub fn join_concurrent(cmds: &[String]) -> String {
    cmds.join(CONCURRENT_SEP)
}
