pub mod app;
pub mod layers;
