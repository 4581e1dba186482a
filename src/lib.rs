pub mod app;
pub mod auction;
pub mod auth;
pub mod bidding;
pub mod config;
pub mod database;
pub mod error;
pub mod flash;
pub mod handlers;
pub mod listing;
pub mod scheduler;
pub mod store;
pub mod views;
pub mod watchlist;
