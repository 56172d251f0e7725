//! Editor affordances: run/debug code lenses for integration files and
//! snippet completions for tasks.json. Both are pure functions over
//! document text.

mod codelens;
mod completion;

pub use codelens::{provide_code_lenses, CodeLens, CAMEL_DEBUG_COMMAND_ID, CAMEL_RUN_COMMAND_ID};
pub use completion::{provide_task_completions, Completion};
