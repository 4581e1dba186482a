pub mod commands;
pub mod form;
