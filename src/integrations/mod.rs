//! External service integrations.

pub mod secrets {
    pub use crate::secrets::*;
}

pub mod services {
    pub use crate::services::*;
}
