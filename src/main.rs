#[tokio::main]
async fn main() {
    if let Err(err) = fittime_api::run().await {
        eprintln!("server error: {err}");
        std::process::exit(1);
    }
}
