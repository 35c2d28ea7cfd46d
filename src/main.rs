#[tokio::main]
async fn main() {
    booking_scheduler::run().await;
}
