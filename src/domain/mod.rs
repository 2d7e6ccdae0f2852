pub mod letter;
pub mod level;
