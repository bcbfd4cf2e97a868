fn main() {
    if let Err(err) = tabular::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
