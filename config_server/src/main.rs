#[tokio::main]
async fn main() {
    config_server::run().await;
}
