use mock_fub::MockFub;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let port = std::env::var("PORT").unwrap_or_else(|_| "4010".to_string());
    let api_key = std::env::var("FUB_API_KEY").unwrap_or_else(|_| "test-key".to_string());
    let addr = format!("127.0.0.1:{port}");
    let listener = TcpListener::bind(&addr).await?;
    println!("mock Follow Up Boss listening on {addr}");
    mock_fub::run(listener, MockFub::new(&api_key)).await
}
