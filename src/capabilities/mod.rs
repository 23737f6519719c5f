mod engagement;

pub use self::engagement::{
    Attribute, AttributeValue, Engagement, EngagementOperation, SoftPromptConfig,
};

pub use crux_core::render::Render;
pub use crux_http::Http;
pub use crux_kv::KeyValue;

use crate::app::App;
use crate::event::Event;

pub type AppHttp = Http<Event>;
pub type AppKeyValue = KeyValue<Event>;
pub type AppRender = Render<Event>;
pub type AppEngagement = Engagement<Event>;

#[derive(crux_core::macros::Effect)]
#[effect(app = "App")]
pub struct Capabilities {
    pub render: Render<Event>,
    pub http: Http<Event>,
    pub key_value: KeyValue<Event>,
    pub engagement: Engagement<Event>,
}
