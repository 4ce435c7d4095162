use std::{io, process::ExitCode};

use lsadump_lib::{cli, util};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = match cli::parse_from(std::env::args_os()) {
        Ok(cli::Invocation::Dump(config)) => config,
        Ok(cli::Invocation::Usage) => {
            println!("{}", cli::USAGE);
            return ExitCode::SUCCESS;
        }
        Err(err) => err.exit(),
    };

    match lsadump_lib::dump(&config, &mut io::stdout()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            util::error(&err.to_string());
            ExitCode::FAILURE
        }
    }
}
