pub mod impl_console;
#[allow(dead_code)]
pub mod impl_memory;
pub mod interface;
