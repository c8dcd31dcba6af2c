use clap::{Arg, Command};

pub fn parse_args() -> clap::ArgMatches {
    Command::new("srrinfo")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Inspect SRR/SRS scene-release reconstruction files")
        .arg(
            Arg::new("files")
                .help("SRR or SRS files to inspect")
                .required(true)
                .num_args(1..)
                .value_parser(clap::value_parser!(String)),
        )
        .get_matches()
}
