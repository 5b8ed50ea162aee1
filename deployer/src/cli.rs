//! CLI definitions for the deployer
//!
//! Every flag can also be given through a `DEPLOYER_*` environment variable.

use std::path::PathBuf;
use std::time::Duration;

use clap::{ArgAction, Args, Parser};
use secrecy::ExposeSecret;

use crate::app::options::ClientOptions;
use crate::config::DeployConfig;
use crate::logs::LogLevel;
use crate::storage::settings::Settings;

#[derive(Parser)]
#[command(
    name = "deployer",
    version,
    about = "Trigger a deployment on a remote deployer service"
)]
pub struct Cli {
    /// JSON settings file, applied before flags
    #[arg(long, env = "DEPLOYER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Hostname of the deployment service
    #[arg(long, env = "DEPLOYER_HOST")]
    pub host: Option<String>,

    /// Service (image) name
    #[arg(long, env = "DEPLOYER_SERVICE")]
    pub service: Option<String>,

    /// Image tag to deploy
    #[arg(long, env = "DEPLOYER_IMAGE")]
    pub image: Option<String>,

    /// Git URL of the repository to deploy
    #[arg(long, env = "DEPLOYER_REPO")]
    pub repo: Option<String>,

    /// Deploy key granting read access to the repository
    #[arg(long, env = "DEPLOYER_DEPLOY_KEY", hide_env_values = true)]
    pub deploy_key: Option<String>,

    /// Webhook token
    #[arg(long, env = "DEPLOYER_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Extra variables forwarded untouched
    #[arg(long, env = "DEPLOYER_EXTRA_VARS")]
    pub extra_vars: Option<String>,

    #[command(flatten)]
    pub registry: RegistryArgs,

    /// Request timeout in seconds
    #[arg(long, env = "DEPLOYER_TIMEOUT_SECS")]
    pub timeout_secs: Option<u64>,

    /// Retry once when the service cannot be reached
    #[arg(
        long,
        env = "DEPLOYER_RETRY",
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub retry: Option<bool>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "DEPLOYER_LOG_LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Log as JSON lines
    #[arg(
        long,
        env = "DEPLOYER_LOG_JSON",
        num_args = 0..=1,
        default_missing_value = "true",
        action = ArgAction::Set
    )]
    pub log_json: Option<bool>,

    /// Print build information as JSON and exit
    #[arg(long)]
    pub version_info: bool,
}

/// Container registry credentials
#[derive(Args)]
pub struct RegistryArgs {
    /// Container registry host
    #[arg(id = "registry", long = "registry", env = "DEPLOYER_REGISTRY")]
    pub host: Option<String>,

    #[arg(long = "registry-login", env = "DEPLOYER_REGISTRY_LOGIN")]
    pub login: Option<String>,

    #[arg(
        long = "registry-password",
        env = "DEPLOYER_REGISTRY_PASSWORD",
        hide_env_values = true
    )]
    pub password: Option<String>,

    #[arg(long = "registry-email", env = "DEPLOYER_REGISTRY_EMAIL")]
    pub email: Option<String>,
}

impl RegistryArgs {
    fn is_empty(&self) -> bool {
        self.host.is_none() && self.login.is_none() && self.password.is_none() && self.email.is_none()
    }
}

impl Cli {
    /// Copy every flag that was given onto `config`
    pub fn apply(&self, config: &mut DeployConfig) {
        if let Some(value) = &self.deploy_key {
            config.set_deploy_key(value.as_str());
        }
        if let Some(value) = &self.service {
            config.set_service(value.as_str());
        }
        if let Some(value) = &self.image {
            config.set_image(value.as_str());
        }
        if let Some(value) = &self.host {
            config.set_host(value.as_str());
        }
        if let Some(value) = &self.token {
            config.set_token(value.as_str());
        }
        if let Some(value) = &self.repo {
            config.set_repo(value.as_str());
        }
        if let Some(value) = &self.extra_vars {
            config.set_extra_vars(value.as_str());
        }

        // Flags override individual registry fields; the rest keep the
        // value from the settings file.
        if !self.registry.is_empty() {
            let host = self
                .registry
                .host
                .clone()
                .unwrap_or_else(|| config.registry().to_string());
            let login = self
                .registry
                .login
                .clone()
                .unwrap_or_else(|| config.registry_login().to_string());
            let password = self
                .registry
                .password
                .clone()
                .unwrap_or_else(|| config.registry_password().expose_secret().to_string());
            let email = self
                .registry
                .email
                .clone()
                .unwrap_or_else(|| config.registry_email().to_string());
            config.set_registry(host, login, password, email);
        }
    }

    /// Whether to log as JSON, the flag winning over the settings file
    pub fn log_json(&self, settings: &Settings) -> bool {
        self.log_json.or(settings.log_json).unwrap_or(false)
    }

    /// Copy client tuning flags onto `options`
    pub fn apply_options(&self, options: &mut ClientOptions) {
        if let Some(secs) = self.timeout_secs {
            options.timeout = Duration::from_secs(secs);
        }
        if let Some(retry) = self.retry {
            options.retry.enabled = retry;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_applied_to_config() {
        let cli = Cli::try_parse_from([
            "deployer",
            "--host",
            "deploy.acme.io",
            "--service",
            "shop",
            "--image",
            "v2",
            "--token",
            "whk",
            "--registry",
            "registry.acme.io",
            "--registry-password",
            "pw",
        ])
        .unwrap();

        let mut config = DeployConfig::new();
        config.set_registry("old.io", "ci", "old", "ci@acme.io");
        cli.apply(&mut config);

        assert_eq!(config.host(), "deploy.acme.io");
        assert_eq!(config.service(), "shop");
        assert_eq!(config.image(), "v2");
        assert_eq!(config.token().expose_secret(), "whk");
        assert_eq!(config.registry(), "registry.acme.io");
        assert_eq!(config.registry_login(), "ci");
        assert_eq!(config.registry_password().expose_secret(), "pw");
        assert_eq!(config.registry_email(), "ci@acme.io");
    }

    #[test]
    fn test_absent_flags_keep_defaults() {
        let cli = Cli::try_parse_from(["deployer"]).unwrap();
        let mut config = DeployConfig::new();
        cli.apply(&mut config);
        assert_eq!(config.image(), "master");
        assert_eq!(config.registry(), "");
    }

    #[test]
    fn test_client_flags() {
        let cli = Cli::try_parse_from([
            "deployer",
            "--timeout-secs",
            "3",
            "--retry",
            "--log-level",
            "debug",
        ])
        .unwrap();

        let mut options = ClientOptions::default();
        cli.apply_options(&mut options);
        assert_eq!(options.timeout, Duration::from_secs(3));
        assert!(options.retry.enabled);
        assert_eq!(cli.log_level, Some(LogLevel::Debug));
    }

    #[test]
    fn test_invalid_log_level() {
        assert!(Cli::try_parse_from(["deployer", "--log-level", "loud"]).is_err());
    }

    #[test]
    fn test_registry_and_host_are_separate() {
        let cli = Cli::try_parse_from([
            "deployer",
            "--host",
            "deploy.acme.io",
            "--registry",
            "registry.acme.io",
        ])
        .unwrap();
        assert_eq!(cli.host.as_deref(), Some("deploy.acme.io"));
        assert_eq!(cli.registry.host.as_deref(), Some("registry.acme.io"));
    }

    #[test]
    fn test_bare_switches_enable() {
        let cli = Cli::try_parse_from(["deployer", "--retry", "--log-json"]).unwrap();
        assert_eq!(cli.retry, Some(true));
        assert_eq!(cli.log_json, Some(true));
    }

    #[test]
    fn test_explicit_false_beats_settings_file() {
        let settings = Settings::from_json(r#"{"retry": true, "logJson": true}"#).unwrap();
        let cli =
            Cli::try_parse_from(["deployer", "--retry=false", "--log-json=false"]).unwrap();

        let mut options = ClientOptions::default();
        settings.apply_options(&mut options);
        cli.apply_options(&mut options);
        assert!(!options.retry.enabled);
        assert!(!cli.log_json(&settings));
    }

    #[test]
    fn test_unset_switch_keeps_settings_value() {
        let settings = Settings::from_json(r#"{"retry": true, "logJson": true}"#).unwrap();
        let cli = Cli::try_parse_from(["deployer"]).unwrap();

        let mut options = ClientOptions::default();
        settings.apply_options(&mut options);
        cli.apply_options(&mut options);
        assert!(options.retry.enabled);
        assert!(cli.log_json(&settings));
    }
}
