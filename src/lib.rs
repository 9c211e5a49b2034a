#[macro_use]
extern crate tracing;

pub mod game;
pub mod input;
pub mod session;
pub mod shapes;
pub mod spawn;
pub mod store;
pub mod ui;
