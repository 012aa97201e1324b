pub mod anchor;
pub mod impl_gui;
pub mod impl_memory;
pub mod interface;
