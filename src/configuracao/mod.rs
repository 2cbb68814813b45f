// src/configuracao/mod.rs

pub mod app_config;
