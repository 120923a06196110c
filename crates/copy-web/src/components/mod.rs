mod code_block;
mod copy_button;
mod section;

pub use code_block::CodeBlock;
pub use copy_button::{COPY_ICON, CopyButton};
pub use section::Section;
