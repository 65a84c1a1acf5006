use std::collections::HashMap;
use std::io;

use twocaptcha::CaptchaSolver;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt::init();

    let api_key = std::env::var("TWOCAPTCHA_API_KEY").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "TWOCAPTCHA_API_KEY environment variable is required",
        )
    })?;

    let params = HashMap::from([
        ("site-key".to_owned(), "6LfB5_IbAAAAAMCtsjEHEHKqcB9iQocwwxTiihJu".to_owned()),
        ("site-url".to_owned(), "https://2captcha.com/demo/recaptcha-v3".to_owned()),
        ("action".to_owned(), "demo_action".to_owned()),
        ("min-score".to_owned(), "0.9".to_owned()),
    ]);
    let settings = HashMap::from([
        ("poll-interval".to_owned(), "5".to_owned()),
        ("max-attempts".to_owned(), "60".to_owned()),
    ]);

    let solver = CaptchaSolver::construct(&api_key, "recaptcha-v3", &params, &settings).await?;
    let solution = solver.solve().await?;
    println!("token: {}", solution.as_str());

    Ok(())
}
