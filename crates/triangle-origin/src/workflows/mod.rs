pub mod origin;
pub mod reference;
