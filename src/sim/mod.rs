pub mod eyes;
pub mod hub;
pub mod intro;
pub mod menu;
pub mod popup;
pub mod save;
pub mod store;
pub mod tween;
