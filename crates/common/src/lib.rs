pub mod types;
pub mod utils;

/// Root greeting, suffixed with the deployment environment when it is a known one.
pub fn greeting(environment: &str) -> String {
    let mut message = String::from("Hello, ");
    match environment {
        "dev" => message.push_str(" Development Environment"),
        "prod" => message.push_str(" Production Environment"),
        "qa" => message.push_str(" Test Environment"),
        _ => {}
    }
    message
}
