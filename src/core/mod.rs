pub mod codec;
pub mod history;
