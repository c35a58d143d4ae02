use crate::{
    analytics::{AnalyticsError, TrackingTag},
    domain::{EmailAddress, MailIdentity},
};
use config::{builder::DefaultState, Config, ConfigBuilder, File, FileFormat};
use derive_getters::Getters;
use secrecy::Secret;
use serde_aux::field_attributes::{
    deserialize_number_from_string, deserialize_option_number_from_string,
};
use std::path::Path;
use url::Url;

/// Retrive the configuration for the application.
///
/// Settings are layered: `configuration/base.yaml`, then the file for the
/// current `APP_ENVIRONMENT` and finally any `APP_*` environment variables,
/// e.g. `APP_EMAIL__ADMIN_EMAIL=me@example.com`.
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let configuration_directory = std::env::current_dir()
        .map_err(|e| config::ConfigError::Foreign(Box::new(e)))?
        .join("configuration");

    let environment: Environment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(config::ConfigError::Message)?;

    file_sources(&configuration_directory, environment)
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}

/// The yaml layers for `environment`, without environment variable overrides.
fn file_sources(directory: &Path, environment: Environment) -> ConfigBuilder<DefaultState> {
    let environment_filename = format!("{}.yaml", environment.as_str());

    Config::builder()
        .add_source(File::new(
            &directory.join("base.yaml").to_string_lossy(),
            FileFormat::Yaml,
        ))
        .add_source(
            File::new(
                &directory.join(environment_filename).to_string_lossy(),
                FileFormat::Yaml,
            )
            .required(false),
        )
}

/// The possible runtime environments for the application.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Local,
    Production,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Local => "local",
            Environment::Production => "production",
        }
    }
}

impl TryFrom<String> for Environment {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{other} is not a supported environment. Use either `local` or `production`."
            )),
        }
    }
}

#[derive(Debug, Clone, serde::Deserialize, Getters)]
pub struct Settings {
    pub application: ApplicationSettings,
    #[serde(default)]
    pub email: EmailSettings,
    #[serde(default)]
    pub analytics: AnalyticsSettings,
}

#[derive(Debug, Clone, serde::Deserialize, Getters)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
    /// Domain shown in the subject line of outgoing emails.
    pub site_name: String,
}

impl ApplicationSettings {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Settings for the mail service used to relay contact submissions.
///
/// Every field is optional so the server can start without them. A contact
/// submission is refused with a configuration error until the required ones
/// are present.
#[derive(Debug, Clone, Default, serde::Deserialize, Getters)]
pub struct EmailSettings {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub port: Option<u16>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub password: Option<Secret<String>>,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub admin_email: Option<String>,
}

impl EmailSettings {
    /// Url of the mail service, with the configured port applied.
    pub fn base_url(&self) -> Result<Url, ConfigurationError> {
        let host = required(&self.host, "email.host")?;
        let mut url = Url::parse(host).map_err(|e| {
            tracing::error!("Unable to parse the mail service host: {e}");
            ConfigurationError::InvalidUrl("email.host")
        })?;
        if let Some(port) = self.port {
            url.set_port(Some(port))
                .map_err(|_| ConfigurationError::InvalidUrl("email.port"))?;
        }

        Ok(url)
    }

    /// The username and password used to authenticate with the mail service.
    pub fn credentials(&self) -> Result<(String, Secret<String>), ConfigurationError> {
        let username = required(&self.username, "email.username")?;
        let password = self
            .password
            .clone()
            .ok_or(ConfigurationError::MissingSetting("email.password"))?;

        Ok((username.to_string(), password))
    }

    /// The identity all outgoing emails are sent with.
    /// The sender address is the username used for the mail service.
    pub fn identity(&self, site_name: &str) -> Result<MailIdentity, ConfigurationError> {
        let display_name = required(&self.display_name, "email.display_name")?;
        let sender = EmailAddress::parse(required(&self.username, "email.username")?.into())
            .map_err(|_| ConfigurationError::InvalidAddress("email.username"))?;
        let admin = EmailAddress::parse(required(&self.admin_email, "email.admin_email")?.into())
            .map_err(|_| ConfigurationError::InvalidAddress("email.admin_email"))?;

        Ok(MailIdentity::new(display_name, sender, admin, site_name))
    }
}

fn required<'a>(
    value: &'a Option<String>,
    name: &'static str,
) -> Result<&'a str, ConfigurationError> {
    match value.as_deref().map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigurationError::MissingSetting(name)),
    }
}

#[derive(Debug, Clone, Default, serde::Deserialize, Getters)]
pub struct AnalyticsSettings {
    #[serde(default)]
    pub tracking_id: Option<String>,
}

impl AnalyticsSettings {
    /// The configured tracking tag, if any.
    pub fn tracking_tag(&self) -> Result<Option<TrackingTag>, AnalyticsError> {
        self.tracking_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(TrackingTag::parse)
            .transpose()
    }
}

/// Problems with the mail settings, detected before any email is composed.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    #[error("Missing required setting `{0}`")]
    MissingSetting(&'static str),
    #[error("Setting `{0}` is not a valid url")]
    InvalidUrl(&'static str),
    #[error("Setting `{0}` is not a valid email address")]
    InvalidAddress(&'static str),
}
