mod cli;

fn main() {
    // Logging is initialized inside the CLI once the level flag is known.
    if let Err(err) = cli::run_from_args() {
        cli::report_failure(&err, &mut std::io::stderr());
        std::process::exit(1);
    }
}
