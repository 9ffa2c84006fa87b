// Domain-layer modules and shared errors/models
pub mod aggregation {
    pub use crate::aggregation::*;
}

pub mod errors {
    pub use crate::errors::*;
}

pub mod lookup {
    pub use crate::lookup::*;
}

pub mod models {
    pub use crate::models::*;
}

pub mod normalize {
    pub use crate::normalize::*;
}

pub mod ocd {
    pub use crate::ocd::*;
}

pub mod validation {
    pub use crate::validation::*;
}
