pub mod generator;
pub mod tac;

pub use tac::{CmpOp, Construct, Opcode, Tag, TacEntry};
