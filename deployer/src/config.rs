//! Deployment configuration

use deployer_api::models::DeployRequest;
use secrecy::{ExposeSecret, SecretString};

/// Image tag used until one is set explicitly
pub const DEFAULT_IMAGE_TAG: &str = "master";

/// Parameters of a single deployment run
///
/// Credentials are wrapped in [`SecretString`] so that `Debug` output never
/// carries them.
#[derive(Debug)]
pub struct DeployConfig {
    deploy_key: SecretString,
    service: String,
    image: String,
    host: String,
    token: SecretString,
    repo: String,
    registry: String,
    login: String,
    password: SecretString,
    email: String,
    extra_vars: String,
}

impl DeployConfig {
    /// Create a configuration with every field empty except the image tag
    pub fn new() -> Self {
        Self {
            deploy_key: empty_secret(),
            service: String::new(),
            image: DEFAULT_IMAGE_TAG.to_string(),
            host: String::new(),
            token: empty_secret(),
            repo: String::new(),
            registry: String::new(),
            login: String::new(),
            password: empty_secret(),
            email: String::new(),
            extra_vars: String::new(),
        }
    }

    pub fn set_deploy_key(&mut self, value: impl Into<String>) {
        self.deploy_key = SecretString::from(value.into());
    }

    pub fn set_service(&mut self, value: impl Into<String>) {
        self.service = value.into();
    }

    pub fn set_image(&mut self, value: impl Into<String>) {
        self.image = value.into();
    }

    pub fn set_host(&mut self, value: impl Into<String>) {
        self.host = value.into();
    }

    pub fn set_token(&mut self, value: impl Into<String>) {
        self.token = SecretString::from(value.into());
    }

    pub fn set_repo(&mut self, value: impl Into<String>) {
        self.repo = value.into();
    }

    pub fn set_extra_vars(&mut self, value: impl Into<String>) {
        self.extra_vars = value.into();
    }

    /// Replace all four registry fields in one call
    pub fn set_registry(
        &mut self,
        host: impl Into<String>,
        login: impl Into<String>,
        password: impl Into<String>,
        email: impl Into<String>,
    ) {
        self.registry = host.into();
        self.login = login.into();
        self.password = SecretString::from(password.into());
        self.email = email.into();
    }

    pub fn deploy_key(&self) -> &SecretString {
        &self.deploy_key
    }

    pub fn service(&self) -> &str {
        &self.service
    }

    pub fn image(&self) -> &str {
        &self.image
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn token(&self) -> &SecretString {
        &self.token
    }

    pub fn repo(&self) -> &str {
        &self.repo
    }

    pub fn registry(&self) -> &str {
        &self.registry
    }

    pub fn registry_login(&self) -> &str {
        &self.login
    }

    pub fn registry_password(&self) -> &SecretString {
        &self.password
    }

    pub fn registry_email(&self) -> &str {
        &self.email
    }

    pub fn extra_vars(&self) -> &str {
        &self.extra_vars
    }

    /// Build the wire payload for `POST /deploy`
    pub fn to_payload(&self) -> DeployRequest {
        DeployRequest {
            git_url: self.repo.clone(),
            deploy_key: self.deploy_key.expose_secret().to_string(),
            registry: self.registry.clone(),
            registry_login: self.login.clone(),
            registry_password: self.password.expose_secret().to_string(),
            registry_email: self.email.clone(),
            image_name: self.service.clone(),
            image_version: self.image.clone(),
            webhook_token: self.token.expose_secret().to_string(),
            extra_vars: self.extra_vars.clone(),
        }
    }
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn empty_secret() -> SecretString {
    SecretString::from(String::new())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_config_defaults() {
        let config = DeployConfig::new();
        assert_eq!(config.image(), DEFAULT_IMAGE_TAG);
        assert!(!config.image().is_empty());

        assert!(config.deploy_key().expose_secret().is_empty());
        assert!(config.token().expose_secret().is_empty());
        assert!(config.registry_password().expose_secret().is_empty());
        for value in [
            config.service(),
            config.host(),
            config.repo(),
            config.registry(),
            config.registry_login(),
            config.registry_email(),
            config.extra_vars(),
        ] {
            assert!(value.is_empty());
        }
    }

    #[test]
    fn test_setters_overwrite() {
        let mut config = DeployConfig::new();
        config.set_image("v1");
        config.set_image("v2");
        config.set_host("deploy.acme.io");
        config.set_host("");
        assert_eq!(config.image(), "v2");
        assert_eq!(config.host(), "");
    }

    #[test]
    fn test_set_registry_replaces_all_fields() {
        let mut config = DeployConfig::new();
        config.set_registry("registry.one", "alice", "pw1", "alice@one");
        config.set_registry("registry.two", "", "pw2", "");

        assert_eq!(config.registry(), "registry.two");
        assert_eq!(config.registry_login(), "");
        assert_eq!(config.registry_password().expose_secret(), "pw2");
        assert_eq!(config.registry_email(), "");
    }

    #[test]
    fn test_payload_mapping() {
        let mut config = DeployConfig::new();
        config.set_repo("git@github.com:acme/shop.git");
        config.set_deploy_key("key");
        config.set_registry("registry.acme.io", "ci", "secret", "ci@acme.io");
        config.set_service("shop");
        config.set_image("v1.4.2");
        config.set_token("whk");
        config.set_extra_vars("A=1");
        config.set_host("deploy.acme.io");

        let payload = config.to_payload();
        assert_eq!(payload.git_url, "git@github.com:acme/shop.git");
        assert_eq!(payload.deploy_key, "key");
        assert_eq!(payload.registry, "registry.acme.io");
        assert_eq!(payload.registry_login, "ci");
        assert_eq!(payload.registry_password, "secret");
        assert_eq!(payload.registry_email, "ci@acme.io");
        assert_eq!(payload.image_name, "shop");
        assert_eq!(payload.image_version, "v1.4.2");
        assert_eq!(payload.webhook_token, "whk");
        assert_eq!(payload.extra_vars, "A=1");
    }

    #[test]
    fn test_debug_hides_secrets() {
        let mut config = DeployConfig::new();
        config.set_deploy_key("very-private-key");
        config.set_registry("r", "l", "very-private-password", "e");
        let debug = format!("{:?}", config);
        assert!(!debug.contains("very-private-key"));
        assert!(!debug.contains("very-private-password"));
    }
}
