fn main() {
    proxsave::app::cli::run();
}
