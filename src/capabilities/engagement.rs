//! Engagement capability: a one-way sink into the customer-engagement
//! SDK hosted by the shell.
//!
//! Every operation is fire-and-forget (`Output = ()`): the core never
//! consumes a reply, so an absent or erroring transport can only ever
//! drop the event, never fail the calling update. Nothing is queued or
//! retried.

use crux_core::capability::{Capability, CapabilityContext, Operation};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttributeValue {
    Text(String),
    Number(f64),
    Flag(bool),
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for AttributeValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

#[allow(clippy::cast_precision_loss)]
impl From<u64> for AttributeValue {
    fn from(value: u64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        Self::Flag(value)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub key: String,
    pub value: AttributeValue,
}

impl Attribute {
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<AttributeValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Notification soft-prompt configuration, serialized with the SDK's
/// field names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SoftPromptConfig {
    pub title_text: String,
    pub body_text: String,
    pub ok_button_text: String,
    pub reject_button_text: String,
    pub ok_button_color: String,
    pub ask_again_time_in_seconds: u32,
    pub service_worker_path: String,
}

impl Default for SoftPromptConfig {
    fn default() -> Self {
        Self {
            title_text: "Turn On Notifications?".into(),
            body_text: "We will only send you relevant and useful updates.".into(),
            ok_button_text: "Allow".into(),
            reject_button_text: "Later".into(),
            ok_button_color: "#0b82ff".into(),
            ask_again_time_in_seconds: 30,
            service_worker_path: "/clevertap_sw.js".into(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "data", rename_all = "snake_case")]
pub enum EngagementOperation {
    /// Associate the device with a signed-in user.
    Identify { attributes: Vec<Attribute> },
    /// Sync profile attributes for the current user.
    UpdateProfile { attributes: Vec<Attribute> },
    /// Record a named custom event.
    Track {
        name: String,
        attributes: Vec<Attribute>,
    },
    /// Show the notification-permission soft prompt.
    NotificationPrompt { config: SoftPromptConfig },
}

impl Operation for EngagementOperation {
    type Output = ();
}

pub struct Engagement<Ev> {
    context: CapabilityContext<EngagementOperation, Ev>,
}

impl<Ev> Capability<Ev> for Engagement<Ev> {
    type Operation = EngagementOperation;
    type MappedSelf<MappedEv> = Engagement<MappedEv>;

    fn map_event<F, NewEv>(&self, f: F) -> Self::MappedSelf<NewEv>
    where
        F: Fn(NewEv) -> Ev + Send + Sync + 'static,
        Ev: 'static,
        NewEv: 'static,
    {
        Engagement::new(self.context.map_event(f))
    }
}

impl<Ev> Engagement<Ev>
where
    Ev: 'static,
{
    #[must_use]
    pub fn new(context: CapabilityContext<EngagementOperation, Ev>) -> Self {
        Self { context }
    }

    fn notify(&self, operation: EngagementOperation) {
        self.context.spawn({
            let context = self.context.clone();
            async move {
                context.notify_shell(operation).await;
            }
        });
    }

    pub fn identify(&self, attributes: Vec<Attribute>) {
        self.notify(EngagementOperation::Identify { attributes });
    }

    pub fn update_profile(&self, attributes: Vec<Attribute>) {
        self.notify(EngagementOperation::UpdateProfile { attributes });
    }

    pub fn track(&self, name: impl Into<String>, attributes: Vec<Attribute>) {
        self.notify(EngagementOperation::Track {
            name: name.into(),
            attributes,
        });
    }

    pub fn request_notification_prompt(&self, config: SoftPromptConfig) {
        self.notify(EngagementOperation::NotificationPrompt { config });
    }
}
