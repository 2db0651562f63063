use crate::config::ConfigError;
use crate::pushbullet::DeliveryError;

/// Every way a single `pushy` invocation can fail. The display strings are
/// the messages shown to the user.
#[derive(Debug, thiserror::Error)]
pub enum PushyError {
    #[error("Unable to load configuration: {0}")]
    ConfigLoad(#[from] ConfigError),

    #[error("No API key was set for Pushbullet")]
    MissingApiKey,

    #[error("Unable to determine {flag} for the notification: {reason}")]
    FlagRetrieval { flag: &'static str, reason: String },

    #[error("Unable to read notification body from stdin: {0}")]
    StdinRead(#[source] std::io::Error),

    #[error("Unable to send push notification: {0}")]
    Delivery(#[from] DeliveryError),
}
