pub mod clothing;
pub mod gemini;
pub mod generation;
pub mod user;
pub mod wardrobe;

pub use clothing::*;
pub use generation::*;
pub use user::*;
pub use wardrobe::*;
