pub mod stage1_plan;
pub mod stage2_retrieve;
pub mod stage3_synthesize;
pub mod stage4_publish;

pub use stage1_plan::*;
pub use stage2_retrieve::*;
pub use stage3_synthesize::*;
pub use stage4_publish::*;
