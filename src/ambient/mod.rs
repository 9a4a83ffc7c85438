pub mod ambient_generator;
pub mod ambient_source;

pub use ambient_generator::{start_ambient_generator, AmbientHandle};
pub use ambient_source::{
    AmbientTemplate, AmbientTier, EventSource, RandomEventSource, ScriptedEventSource, TemplateAction,
};
