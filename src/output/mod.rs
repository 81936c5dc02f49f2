pub mod json;
pub mod text;

use serde_json::Value;

pub fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => eprintln!("Error: failed to render JSON: {e}"),
    }
}

/// Print a `{success: true, data}` envelope.
pub fn print_success(data: Value) {
    print_json(&json::success(data));
}
