#[tokio::main]
async fn main() {
  if let Err(e) = trainer_metrics_lib::run().await {
    eprintln!("trainer-metrics: {}", e);
    std::process::exit(1);
  }
}
