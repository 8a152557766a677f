//! Prompt text used by the orchestrators.
//!
//! - `repl`: system prompt and final-answer instruction for the code REPL
//! - `task`: description of the sub-agent dispatch tool

pub mod repl;
pub mod task;

pub use repl::{REPL_SYSTEM_PROMPT, final_answer_instruction, repl_system_prompt};
pub use task::{
    GENERAL_PURPOSE_DESCRIPTION, TASK_DESCRIPTION_PREFIX, TASK_DESCRIPTION_SUFFIX,
    task_description,
};
