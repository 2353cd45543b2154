pub mod check_config;
pub mod control_zone;
pub mod forward_state;
pub mod publish_command;
pub mod run_application;

pub use check_config::CheckConfigUseCase;
pub use control_zone::{ControlZoneUseCase, ZoneLightRequest};
pub use forward_state::ForwardStateUseCase;
pub use publish_command::PublishCommandUseCase;
pub use run_application::RunApplicationUseCase;
