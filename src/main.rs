fn main() {
    if let Err(e) = notewarden::run() {
        eprintln!("{e}");
        std::process::exit(1);
    }
}
