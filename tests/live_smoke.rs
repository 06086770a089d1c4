use business_ru_check::auth::Credentials;
use business_ru_check::rest::{CheckRestClient, ListFilter};

fn live_tests_enabled() -> bool {
    std::env::var("BUSINESS_RU_LIVE_TESTS").ok().as_deref() == Some("1")
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[tokio::test]
#[ignore]
async fn live_check_smoke() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenv::dotenv();
    if !live_tests_enabled() {
        return Ok(());
    }
    init_tracing();

    let credentials = match Credentials::from_env() {
        Some(creds) => creds,
        None => return Ok(()),
    };
    let client = CheckRestClient::builder(credentials).build()?;

    let token = client.get_token().await?;
    assert!(!token.is_empty());

    let _state = client.get_system_state().await?;
    let _shifts = client.get_shifts(&ListFilter::new()).await?;

    Ok(())
}
