use std::process::ExitCode;

fn main() -> ExitCode {
    classmap_cli::main_entry()
}
