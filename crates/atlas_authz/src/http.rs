mod denial;

pub use denial::*;
