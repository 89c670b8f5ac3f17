pub mod board;
pub mod classes;
pub mod health;
pub mod tasks;
