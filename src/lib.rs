#![forbid(unsafe_code)]

pub mod completion;
pub mod config;
pub mod curve;
pub mod dom;
pub mod ease;
pub mod engine;
pub mod error;
pub mod eval;
pub mod headless;
pub mod sampler;
pub mod schedule;
pub mod stagger;

pub use completion::Completion;
pub use config::{MorphOptions, ResolvedConfig};
pub use dom::{AttrSetter, Dom};
pub use ease::Ease;
pub use engine::MorphEngine;
pub use error::{MorphError, MorphResult};
pub use headless::{HeadlessDom, StepScheduler};
pub use sampler::EaseSampler;
pub use schedule::Scheduler;
