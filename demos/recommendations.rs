use std::io;

use hingesdk::{AuthToken, HingeClient};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let token = std::env::var("HINGE_TOKEN").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "HINGE_TOKEN environment variable is required",
        )
    })?;

    let client = HingeClient::with_token(AuthToken::new(token)?);
    let recommendations = client.get_recommendations(false, false).await?;
    println!("{recommendations:#}");

    Ok(())
}
