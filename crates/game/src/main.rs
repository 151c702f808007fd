use std::env;
use std::process::ExitCode;

mod app;

fn main() -> ExitCode {
    let args = env::args().skip(1).collect::<Vec<_>>();
    let options = match app::parse_cli_args(&args) {
        Ok(options) if options.help => {
            println!("{}", app::USAGE);
            return ExitCode::SUCCESS;
        }
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}\n{}", app::USAGE);
            return ExitCode::from(2);
        }
    };

    match app::build_app(options) {
        Ok(wiring) => app::run(wiring),
        Err(err) => {
            tracing::error!(error = %err, "startup_failed");
            ExitCode::FAILURE
        }
    }
}
