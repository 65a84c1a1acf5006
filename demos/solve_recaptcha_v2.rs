use std::io;
use std::time::Duration;

use twocaptcha::{ApiKey, CaptchaSolver, CaptchaTask};

fn required_env(name: &str) -> Result<String, io::Error> {
    std::env::var(name).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("{name} environment variable is required"),
        )
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let api_key = required_env("TWOCAPTCHA_API_KEY")?;
    let site_key = required_env("TWOCAPTCHA_SITE_KEY")?;
    let page_url = required_env("TWOCAPTCHA_PAGE_URL")?;

    let task = CaptchaTask::recaptcha_v2(site_key, page_url)?;
    let solver = CaptchaSolver::builder(ApiKey::new(api_key)?, task)
        .poll_interval(Duration::from_secs(5))
        .deadline(Duration::from_secs(300))
        .timeout(Duration::from_secs(30))
        .build()
        .await?;

    let solution = solver.solve().await?;
    println!("token: {}", solution.as_str());

    Ok(())
}
