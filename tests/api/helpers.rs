use std::net::SocketAddr;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use reqwest::{Client, Method, Response};
use serde::Serialize;
use tempfile::TempDir;
use tokio::net::TcpListener;
use wiremock::MockServer;

use daily_diction::{configuration, startup, telemetry};

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".to_string();
    let subscriber_name = "test".to_string();

    if std::env::var("TEST_LOG").is_ok() {
        let subscriber =
            telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        telemetry::initialize_subscriber(subscriber);
    } else {
        let subscriber =
            telemetry::get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        telemetry::initialize_subscriber(subscriber);
    };
});

pub struct App {
    pub address: SocketAddr,
    pub client: Client,
    pub store_path: PathBuf,
    pub word_server: MockServer,
    _store_directory: TempDir,
}

impl App {
    pub async fn new() -> Self {
        Lazy::force(&TRACING);

        // configure listener
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to start an test application");
        let address = listener.local_addr().unwrap();

        // run a mock word provider
        let word_server = MockServer::start().await;

        // get configuration, point the store at a fresh temp file and
        // the word client at the mock provider
        let store_directory = tempfile::tempdir().expect("Failed to create a temp directory");
        let store_path = store_directory.path().join("subscribers.json");

        let mut configuration =
            configuration::get_configuration().expect("Failed to read configuration");
        configuration.subscriber_store.path = store_path.clone();
        configuration.word_provider.access_url = word_server.uri();

        // configure app state
        let app_state = startup::get_app_state(&configuration).await;

        // start a server
        tokio::spawn(startup::run(listener, app_state));

        // provide a reqwest client
        let client = Client::new();

        App {
            address,
            client,
            store_path,
            word_server,
            _store_directory: store_directory,
        }
    }
}

impl App {
    pub fn build_request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("http://{}{}", self.address, path);

        if method == Method::GET {
            self.client.get(url)
        } else if method == Method::POST {
            self.client.post(url)
        } else {
            panic!("No implementation for this request method {}", method)
        }
    }

    pub async fn get_health_check(&self) -> Response {
        self.build_request(Method::GET, "/health_check")
            .send()
            .await
            .unwrap()
    }

    pub async fn post_subscriptions<T: Serialize + ?Sized>(&self, body: &T) -> Response {
        self.build_request(Method::POST, "/subscriptions")
            .json(body)
            .send()
            .await
            .unwrap()
    }

    pub async fn get_word_of_the_day(&self) -> Response {
        self.build_request(Method::GET, "/word-of-the-day")
            .send()
            .await
            .unwrap()
    }

    /// Emails currently persisted on disk, as a later process restart
    /// would see them.
    pub fn persisted_subscribers(&self) -> Vec<String> {
        let contents = std::fs::read_to_string(&self.store_path).unwrap();
        serde_json::from_str(&contents).unwrap()
    }
}
