use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;
use crate::{
    config::AppConfig,
    github::GitHubClient,
    publish::Publisher,
    store::{Post, Store},
};

#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub http: reqwest::Client,
    pub publisher: Arc<dyn Publisher>,
    pub posts: Arc<dyn Store<Post>>,
    pub shutdown_sender: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        publisher: Arc<dyn Publisher>,
        posts: Arc<dyn Store<Post>>,
        shutdown_sender: Option<oneshot::Sender<()>>,
    ) -> Self {
        Self {
            config,
            http: reqwest::Client::new(),
            publisher,
            posts,
            shutdown_sender: Arc::new(Mutex::new(shutdown_sender)),
        }
    }

    /// Cliente de GitHub para la credencial de una petición concreta.
    pub fn github(&self, token: &str) -> GitHubClient {
        GitHubClient::new(
            self.http.clone(),
            &self.config.github_api_url,
            &self.config.github_user_agent,
            token,
        )
    }
}
