// SPDX-FileCopyrightText: 2026 The segbang developers
//
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A command line tool to shift a byte out to a 7-segment display shift
//! register by bit-banging two GPIO lines.

use clap::Parser;
use std::process::ExitCode;

mod common;
mod info;
mod run;

fn main() -> ExitCode {
    match Opts::try_parse() {
        Ok(opt) => {
            if let Err(e) = common::init_tracing(&opt.trace) {
                eprintln!("{e:#}");
                return ExitCode::FAILURE;
            }
            let res = match opt.cmd {
                Command::Info(cfg) => info::cmd(&cfg),
                Command::Run(cfg) => run::cmd(&cfg),
            };
            return if res {
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            };
        }
        // help and version requests are not failures
        Err(e) if !e.use_stderr() => e.exit(),
        Err(e) => eprintln!("{e}"),
    }
    ExitCode::FAILURE
}

#[derive(Parser)]
#[command(
    name = "segbang",
    about = "A utility to bit-bang a byte into a shift register over GPIO lines.",
    version,
    propagate_version = true
)]
struct Opts {
    /// Provide more detailed error messages.
    #[arg(short = 'v', long, global = true, display_order = 800)]
    pub verbose: bool,

    /// The tracing filter controlling diagnostic output to stderr.
    ///
    /// e.g. `debug` or `warn,segbang=trace,pigpiod_client=trace`
    #[arg(
        long = "trace",
        value_name = "filter",
        global = true,
        env = "SEGBANG_TRACE",
        default_value = "warn",
        display_order = 801
    )]
    pub trace: String,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Parser)]
enum Command {
    /// Get information about the pigpio daemon.
    Info(info::Opts),

    /// Shift the pattern out to the shift register.
    Run(run::Opts),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Opts::command().debug_assert();
    }

    #[test]
    fn run_defaults() {
        let opts = Opts::try_parse_from(["segbang", "run"]).unwrap();
        assert!(!opts.verbose);
        assert_eq!(opts.trace, "warn");
        assert!(matches!(opts.cmd, Command::Run(_)));
    }

    #[test]
    fn help_and_version_are_not_errors() {
        for arg in ["--help", "--version"] {
            let e = Opts::try_parse_from(["segbang", arg]).err().unwrap();
            assert!(!e.use_stderr(), "{arg}");
        }
        let e = Opts::try_parse_from(["segbang", "run", "--bogus"])
            .err()
            .unwrap();
        assert!(e.use_stderr());
    }

    #[test]
    fn info_alias() {
        let opts = Opts::try_parse_from(["segbang", "-v", "i", "--port", "9000"]).unwrap();
        assert!(opts.verbose);
        assert!(matches!(opts.cmd, Command::Info(_)));
    }
}
