use std::sync::Arc;

use tokio::net::TcpListener;

use daily_diction::email_client::EmailClient;
use daily_diction::scheduler::DailyScheduler;
use daily_diction::{configuration, startup, telemetry};

#[tokio::main]
async fn main() {
    let subscriber =
        telemetry::get_subscriber("daily_diction".into(), "info".into(), std::io::stdout);
    telemetry::initialize_subscriber(subscriber);

    let configuration = configuration::get_configuration().expect("Failed to read configuration");

    let state = startup::get_app_state(&configuration).await;

    let sender = configuration
        .email_client
        .sender()
        .expect("Invalid sender email in configuration");
    let email_client = EmailClient::new(
        configuration.email_client.access_url.clone(),
        sender,
        configuration.email_client.authorization_token.clone(),
        configuration.email_client.timeout(),
    );
    let scheduler = Arc::new(DailyScheduler::new(
        state.store.clone(),
        email_client,
        &configuration.dispatch,
    ));
    tokio::spawn(async move { scheduler.run_forever().await });

    let listener = TcpListener::bind((
        configuration.application.host.as_str(),
        configuration.application.port,
    ))
    .await
    .expect("Failed to bind a port for application");

    startup::run(listener, state).await
}
