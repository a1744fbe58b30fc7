pub mod auth;
pub mod cart;
pub mod checkout;
pub mod config;
pub mod describe;
pub mod dto;
pub mod error;
pub mod models;
pub mod state;
pub mod storage;
pub mod store;
