use guesswho::{Catalog, GuessWhoServer};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| {
                    tracing_subscriber::EnvFilter::new("info")
                }),
        )
        .init();

    let port: u16 = match std::env::var("PORT") {
        Ok(value) => value.parse()?,
        Err(_) => 3000,
    };

    // A JSON array of {imageUrl, name} objects replaces the built-in
    // catalog.
    let catalog = match std::env::var("CHARACTERS") {
        Ok(json) => Catalog::from_json(&json)?,
        Err(_) => Catalog::default(),
    };

    let server = GuessWhoServer::builder()
        .bind(&format!("0.0.0.0:{port}"))
        .catalog(catalog)
        .build()
        .await?;

    tracing::info!(port, "guesswho server listening");
    server.run().await?;
    Ok(())
}
