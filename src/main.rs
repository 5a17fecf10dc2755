fn main() {
    akchars::init_tracing();
    std::process::exit(akchars::cli::run_with_args(std::env::args_os()));
}
