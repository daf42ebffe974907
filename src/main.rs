use adb_wireless::adb::AdbError;
use adb_wireless::args::Args;
use adb_wireless::wireless::{self, StdConsole};
use adb_wireless::{AdbShell, Config};
use clap::Parser;
use std::process::ExitCode;

fn main() -> ExitCode {
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            // --help / --version are not failures.
            return if e.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_level()))
        .format_timestamp(None)
        .init();
    log::debug!("Parsed CLI arguments: {args:?}");

    let config = match Config::from_args(&args) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {e}");
            return ExitCode::FAILURE;
        }
    };

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("❌ Failed to start runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = rt.block_on(async {
        let bridge = AdbShell::new(config.adb_program.clone());
        let mut console = StdConsole::new();
        tokio::select! {
            result = wireless::run(&bridge, &mut console, &config) => result.map(|_| ()),
            Ok(()) = tokio::signal::ctrl_c() => {
                eprintln!();
                Err(AdbError::InteractionAborted)
            }
        }
    });
    // A pending stdin read must not keep the process alive.
    rt.shutdown_background();

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("Exiting with {:?}", e.kind());
            eprintln!("❌ {e}");
            ExitCode::FAILURE
        }
    }
}
