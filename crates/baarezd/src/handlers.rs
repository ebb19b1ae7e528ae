//! Request handler: routes a prompt and runs the selected tool.

use baarez_common::{BaarezError, FactStore};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::router::{self, Intent, Tool};

/// Error message for prompts no rule can handle
pub const NO_TOOL_AVAILABLE: &str = "No tool available";

/// Body of `POST /agent/query`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryRequest {
    pub prompt: String,
}

/// Successful response of `POST /agent/query`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse {
    pub original_prompt: String,
    pub chosen_tool: String,
    pub tool_input: String,
    pub response: Value,
}

/// Outcome of routing one prompt, discarded after the response is sent
#[derive(Debug, Clone, PartialEq)]
pub struct RouteDecision {
    /// `None` when no rule produced a dispatch
    pub tool: Option<Tool>,
    pub argument: Option<String>,
    /// Tool payload, or the "No tool available" error payload
    pub result: Value,
}

impl RouteDecision {
    pub fn unrecognized() -> Self {
        Self {
            tool: None,
            argument: None,
            result: json!({ "error": NO_TOOL_AVAILABLE }),
        }
    }

    pub fn is_dispatched(&self) -> bool {
        self.tool.is_some()
    }

    /// Shape the success payload; `None` for unrecognized prompts
    pub fn into_response(self, prompt: &str) -> Option<QueryResponse> {
        let tool = self.tool?;
        Some(QueryResponse {
            original_prompt: prompt.to_string(),
            chosen_tool: tool.to_string(),
            tool_input: self.argument.unwrap_or_default(),
            response: self.result,
        })
    }
}

/// Run the tool for an already-routed intent
pub fn execute(store: &FactStore, intent: &Intent) -> Result<Value, BaarezError> {
    let result = match intent {
        Intent::ReadFact { key } => serde_json::to_value(store.get(key)?)?,
        Intent::SaveFact { key, value } => serde_json::to_value(store.save(key, value)?)?,
        Intent::Compute(calc) => {
            let outcome = calc.evaluate();
            match outcome.result() {
                Some(n) => debug!("  {} = {}", calc, n),
                None => warn!("  Calculation {:?} failed", calc),
            }
            serde_json::to_value(outcome)?
        }
    };
    Ok(result)
}

/// Route `prompt` and invoke the resolved tool
pub fn dispatch(store: &FactStore, prompt: &str) -> Result<RouteDecision, BaarezError> {
    let Some(intent) = router::route(prompt) else {
        debug!("No tool for prompt {:?}", prompt);
        return Ok(RouteDecision::unrecognized());
    };

    let tool = intent.tool();
    let argument = intent.tool_input();
    info!("  Dispatching {} ({})", tool, argument);

    let result = execute(store, &intent)?;

    Ok(RouteDecision {
        tool: Some(tool),
        argument: Some(argument),
        result,
    })
}
