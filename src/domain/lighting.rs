//! 照明制御のドメインモデル

pub mod color;
pub mod command;
pub mod zone;

pub use color::*;
pub use command::*;
pub use zone::*;
