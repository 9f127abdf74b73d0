// Route handlers, one module per endpoint group.

pub mod analyze;
pub mod history;
pub mod system;
