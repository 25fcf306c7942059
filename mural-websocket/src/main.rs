use mural_shared::{
    settings::get_settings,
    telemetry::{get_subscriber, init_subscriber},
};
use mural_websocket::application::Application;

#[tokio::main]
async fn main() -> Result<(), std::io::Error> {
    let subscriber = get_subscriber("mural-websocket".into(), "info".into(), std::io::stdout);
    init_subscriber(subscriber);

    let settings = get_settings().expect("Failed to read settings");
    let application = Application::build(settings).await?;

    application.run_until_stopped().await;

    Ok(())
}
