pub mod health_controller;
pub mod intercept_controller;
