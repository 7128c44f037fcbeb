pub mod app;
pub mod events;
pub mod renderer;
pub mod theme;
pub mod ui;
