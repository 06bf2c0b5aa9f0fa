fn main() {
    if let Err(error) = audit_stamp_cli::run() {
        eprintln!("error: {error}");
        std::process::exit(1);
    }
}
