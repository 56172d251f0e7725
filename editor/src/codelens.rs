use serde::Serialize;

pub const CAMEL_RUN_COMMAND_ID: &str = "camel.jbang.routes.run";
pub const CAMEL_DEBUG_COMMAND_ID: &str = "camel.jbang.routes.debug";

const TITLE_DEBUG: &str = "Camel Debug with JBang";
const TITLE_RUN: &str = "Camel Run with JBang";
const JBANG_TOOLTIP: &str = "Take care that the integration file is in supported scope of Camel JBang and that jbang CLI is available on system path.";

/// An actionable affordance anchored to the top of a document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CodeLens {
    pub command: &'static str,
    pub title: &'static str,
    pub tooltip: String,
}

/// Offers debug and run lenses when the text looks like a Camel route:
/// it mentions `from` and either `to` or `log`.
pub fn provide_code_lenses(text: &str) -> Vec<CodeLens> {
    if text.contains("from") && (text.contains("to") || text.contains("log")) {
        vec![
            CodeLens {
                command: CAMEL_DEBUG_COMMAND_ID,
                title: TITLE_DEBUG,
                tooltip: format!(
                    "Run integration file with Camel JBang and attach the Camel Debugger.\n{JBANG_TOOLTIP}"
                ),
            },
            CodeLens {
                command: CAMEL_RUN_COMMAND_ID,
                title: TITLE_RUN,
                tooltip: format!("Run integration file with Camel JBang.\n{JBANG_TOOLTIP}"),
            },
        ]
    } else {
        Vec::new()
    }
}
