// src/main.rs

use cronwrap::config::Config;
use cronwrap::errors::Result;
use cronwrap::types::WRAPPER_ERROR_EXIT_CODE;
use cronwrap::{cli, logging, run};

// One thread: the niceness set before spawning is per-thread on Linux and
// must be on the thread that forks the job.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let code = match run_main().await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err}");
            err.exit_code()
        }
    };
    std::process::exit(code);
}

async fn run_main() -> Result<i32> {
    let args = cli::try_parse().unwrap_or_else(|e| {
        // --help and --version go through clap's own exit path (status 0).
        if e.use_stderr() {
            let _ = e.print();
            std::process::exit(WRAPPER_ERROR_EXIT_CODE);
        }
        e.exit()
    });

    logging::init_logging(args.log_level, args.debug)?;
    let config = Config::try_from(args)?;
    run(config).await
}
