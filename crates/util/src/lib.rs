pub mod assert;
pub mod label;
pub mod text;
