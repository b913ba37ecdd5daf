mod app;

fn main() {
    #[cfg(feature = "logging")]
    let _ = env_logger::try_init();
    if let Err(err) = app::run() {
        eprintln!("selector-demo: {err}");
        std::process::exit(1);
    }
}
