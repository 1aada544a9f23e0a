use grube_feed_lib::core::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load();
    grube_feed_lib::init_tracing(&config);
    grube_feed_lib::run(config).await
}
