#[tokio::main]
async fn main() {
    if let Err(e) = angio_request_lib::run().await {
        eprintln!("angio-request: {e}");
        std::process::exit(1);
    }
}
