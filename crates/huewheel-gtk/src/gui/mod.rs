pub mod animator;
pub mod app;
pub mod canvas;
pub mod gestures;
pub mod theme;
