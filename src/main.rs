use stockmovers::{cli, utils};

#[tokio::main]
async fn main() {
    utils::init_tracing();
    cli::run().await;
}
