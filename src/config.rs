/// Immutable description of one stack deployment: container
/// images, host ports, and network exposure. Built once at
/// startup and passed explicitly into every component.
///
/// # Example
///
/// ```
/// use photodock::StackConfig;
///
/// let config = StackConfig::new()
///     .api_port(9080)
///     .expose_public();
///
/// assert_eq!(config.api_port, 9080);
/// assert_eq!(config.bind_address(), "0.0.0.0");
/// ```
#[derive(Debug, Clone)]
pub struct StackConfig {
    pub api_image: String,
    pub web_image: String,
    pub postgres_image: String,
    pub minio_image: String,
    pub api_port: u16,
    pub web_port: u16,
    pub albums_port: u16,
    pub minio_port: u16,
    pub minio_console_port: u16,
    /// Bind ports on all interfaces instead of loopback only.
    pub public: bool,
}

impl Default for StackConfig {
    fn default() -> Self {
        Self {
            api_image: "photodock/api:latest".to_string(),
            web_image: "photodock/web:latest".to_string(),
            postgres_image: "postgres:15-alpine".to_string(),
            minio_image: "minio/minio:latest".to_string(),
            api_port: 8080,
            web_port: 3000,
            albums_port: 3001,
            minio_port: 3200,
            minio_console_port: 3201,
            public: false,
        }
    }
}

impl StackConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn api_image(mut self, image: &str) -> Self {
        self.api_image = image.to_string();
        self
    }

    #[must_use]
    pub fn web_image(mut self, image: &str) -> Self {
        self.web_image = image.to_string();
        self
    }

    #[must_use]
    pub fn postgres_image(mut self, image: &str) -> Self {
        self.postgres_image = image.to_string();
        self
    }

    #[must_use]
    pub fn minio_image(mut self, image: &str) -> Self {
        self.minio_image = image.to_string();
        self
    }

    #[must_use]
    pub const fn api_port(mut self, port: u16) -> Self {
        self.api_port = port;
        self
    }

    #[must_use]
    pub const fn web_port(mut self, port: u16) -> Self {
        self.web_port = port;
        self
    }

    #[must_use]
    pub const fn albums_port(mut self, port: u16) -> Self {
        self.albums_port = port;
        self
    }

    #[must_use]
    pub const fn minio_port(mut self, port: u16) -> Self {
        self.minio_port = port;
        self
    }

    #[must_use]
    pub const fn minio_console_port(mut self, port: u16) -> Self {
        self.minio_console_port = port;
        self
    }

    #[must_use]
    pub const fn expose_public(mut self) -> Self {
        self.public = true;
        self
    }

    /// Host address the published ports bind to.
    #[must_use]
    pub const fn bind_address(&self) -> &'static str {
        if self.public { "0.0.0.0" } else { "127.0.0.1" }
    }

    /// API liveness endpoint, probed after startup.
    #[must_use]
    pub fn api_health_url(&self) -> String {
        format!("http://localhost:{}/ping", self.api_port)
    }

    /// Object-storage endpoint as seen from the host.
    #[must_use]
    pub fn minio_endpoint(&self) -> String {
        format!("http://localhost:{}", self.minio_port)
    }
}
