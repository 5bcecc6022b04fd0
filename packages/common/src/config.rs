use serde::Deserialize;

/// Upload server settings shared by the API and the file store client.
#[derive(Debug, Deserialize, Clone)]
pub struct UploadConfig {
    /// Prefix prepended to storage keys when recipes are presented to clients
    /// (e.g. "https://cdn.example.com/uploads/"). Default: "" (keys are returned bare).
    #[serde(default)]
    pub public_url: String,
    /// Base URL of the upload server API. Default: "http://localhost:3002/api/v1".
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Upper bound for a single file deletion request, in seconds. Default: 10.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_server_url() -> String {
    "http://localhost:3002/api/v1".into()
}
fn default_timeout_secs() -> u64 {
    10
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            public_url: String::new(),
            server_url: default_server_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl UploadConfig {
    pub fn timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.timeout_secs)
    }
}
