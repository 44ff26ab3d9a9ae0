use std::process;

fn main() {
    match defaults_table_cli::run() {
        Ok(code) => process::exit(code),
        Err(err) => {
            eprintln!("defaults-table error: {err:#}");
            process::exit(1);
        }
    }
}
