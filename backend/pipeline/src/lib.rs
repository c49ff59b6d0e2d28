pub mod assembler;
pub mod stage;

pub use assembler::{ProcessRequest, ResponseAssembler};
pub use stage::Stage;
