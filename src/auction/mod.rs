pub mod category;
pub mod model;
pub mod money;
