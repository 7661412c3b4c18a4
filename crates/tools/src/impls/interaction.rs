//! Conversation-level tools: submit_work and ask_user.

use serde_json::json;

use crate::design_tool::AskUserArgs;
use crate::executor::ToolResult;

pub fn submit_work() -> ToolResult {
    ToolResult::ok("Work submitted successfully. Validation pipeline triggered.")
}

pub fn ask_user(args: &AskUserArgs) -> ToolResult {
    let mut output = format!("Question for the user: {}", args.question);
    if let Some(suggestions) = args.suggestions.as_ref().filter(|s| !s.is_empty()) {
        output.push_str("\nSuggested answers: ");
        output.push_str(&suggestions.join(", "));
    }
    ToolResult::ok(output).with_data(json!({
        "question": args.question,
        "context": args.context,
        "suggestions": args.suggestions,
    }))
}
