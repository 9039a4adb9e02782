//! Namespace roots, environment key names, and resource defaults.

/// Key prefix for the application sub-namespace of projected properties.
pub const APPLICATION_KEY_PREFIX: &str = "cloud.application.";

/// Key prefix for the services sub-namespace of projected properties.
pub const SERVICES_KEY_PREFIX: &str = "cloud.services.";

/// Projected property name carrying the application id.
pub const APP_ID_PROPERTY: &str = "app-id";

/// Projected property name carrying the application instance id.
pub const INSTANCE_ID_PROPERTY: &str = "instance-id";

/// Environment key overriding the external properties file path.
pub const CONFIG_PATH_ENV_KEY: &str = "CLOUDBIND_CONFIG_PATH";

/// Environment key naming the application.
pub const APP_NAME_ENV_KEY: &str = "CLOUDBIND_APP_NAME";

/// Environment key naming the application instance.
pub const INSTANCE_ID_ENV_KEY: &str = "CLOUDBIND_INSTANCE_ID";

/// Default resource name probed by the configuration file locator.
pub const DEFAULT_CONFIG_RESOURCE: &str = "cloudbind.properties";

/// Resource key whose value is a literal properties file path.
pub const CONFIG_PATH_KEY: &str = "config.path";

/// Resource key whose value is a path template with `${var}` placeholders.
pub const CONFIG_PATH_TEMPLATE_KEY: &str = "config.path.template";

/// Application id used when the platform does not name the application.
pub const UNKNOWN_APP_ID: &str = "<unknown>";
