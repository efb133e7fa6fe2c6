pub mod content;
pub mod professional;
pub mod user;

pub(crate) fn default_true() -> bool {
    true
}

pub(crate) fn json_list(items: Vec<String>) -> serde_json::Value {
    serde_json::Value::from(items)
}
