//! Plan and launch parallel `mdtest` benchmark runs against a DeltaFS-style
//! distributed metadata service.
//!
//! The tool splits `num_meta * clients_per_meta` client processes across the
//! given hosts, points each client group at its own metadata server instance
//! through the hook library's environment variables, and starts all groups as
//! concurrent background jobs of a single shell. It does not wait for or
//! inspect the spawned MPI jobs.

mod command;
mod config;
mod plan;
mod runner;

use clap::clap_app;

use crate::config::{parse_hosts, LaunchConfig};

fn run() -> Result<(), failure::Error> {
    let matches = clap_app! { mdtest_launcher =>
        (about: "Plans and launches parallel mdtest runs against a distributed \
                 metadata service, one group of clients per server instance.")
        (@arg HOSTS: --hosts +required +takes_value
         "Comma-separated address:capacity entries (e.g. 10.0.0.1:8,10.0.0.2:8)")
        (@arg CLIENTS_PER_META: --clients_per_meta +takes_value {is_usize}
         "Clients launched per metadata instance [default: 1]")
        (@arg NUM_META: --num_meta +takes_value {is_usize}
         "Number of metadata server instances [default: 1]")
        (@arg IP: --ip +takes_value
         "Base address of the metadata servers [default: 10.10.1.7]")
        (@arg BASE_PORT: --base_port +takes_value {is_usize}
         "Port of instance 0; instance i listens on base_port + i [default: 10101]")
        (@arg CLIENT_THREADS: --client_threads +takes_value {is_usize}
         "Worker threads per client [default: 1]")
        (@arg MDTEST_ARGS: --mdtest_args +takes_value
         "Arguments forwarded verbatim to mdtest [default: -d /dfs/mdtest -n 10 -u]")
        (@arg EXTRA_MPI_ARGS: --extra_mpi_args +takes_value
         "Arguments forwarded verbatim to the mpirun invocation")
        (@arg CPU_AFFINITY: --cpu_affinity
         "Pin each client group to a --cpu-list range on its host")
        (@arg DRY: --dry_run
         "Don't actually launch anything. Just print the commands that would run.")
    }
    .get_matches();

    let hosts = parse_hosts(matches.value_of("HOSTS").unwrap())?;

    let cfg = LaunchConfig {
        ip: matches.value_of("IP").unwrap_or("10.10.1.7").to_owned(),
        base_port: matches
            .value_of("BASE_PORT")
            .map(|s| s.parse().unwrap())
            .unwrap_or(10101),
        clients_per_meta: matches
            .value_of("CLIENTS_PER_META")
            .map(|s| s.parse().unwrap())
            .unwrap_or(1),
        num_meta: matches
            .value_of("NUM_META")
            .map(|s| s.parse().unwrap())
            .unwrap_or(1),
        client_threads: matches
            .value_of("CLIENT_THREADS")
            .map(|s| s.parse().unwrap())
            .unwrap_or(1),
        mdtest_args: matches
            .value_of("MDTEST_ARGS")
            .unwrap_or("-d /dfs/mdtest -n 10 -u")
            .to_owned(),
        extra_mpi_args: matches.value_of("EXTRA_MPI_ARGS").unwrap_or("").to_owned(),
        cpu_affinity: matches.is_present("CPU_AFFINITY"),
    };
    cfg.validate()?;

    let placements = plan::plan(&hosts, cfg.num_meta, cfg.clients_per_meta)?;

    let cmds: Vec<String> = placements
        .iter()
        .map(|p| command::render(&hosts[p.host], p, &cfg))
        .collect();

    if matches.is_present("DRY") {
        for cmd in &cmds {
            println!("{}", cmd);
        }
        return Ok(());
    }

    let code = runner::submit(&command::join_concurrent(&cmds))?;
    if code != 0 {
        // Pass the shell's exit code through untouched.
        std::process::exit(code);
    }

    Ok(())
}

fn main() {
    use console::style;

    env_logger::init();

    if let Err(err) = run() {
        println!(
            "{}",
            style("mdtest-launcher failed before submitting any command.")
                .red()
                .bold()
        );
        println!("{}", err);

        std::process::exit(101);
    }
}

fn is_usize(s: String) -> Result<(), String> {
    s.as_str()
        .parse::<usize>()
        .map(|_| ())
        .map_err(|e| format!("{:?}", e))
}
