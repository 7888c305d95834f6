#![forbid(unsafe_code)]

use storefront_demo::logging::{self, LogFormat};

fn main() {
    let format = LogFormat::from_env();
    logging::init(format);

    if let Err(error) = storefront_demo::run_from_env() {
        if format == LogFormat::Json {
            eprintln!(
                "{}",
                serde_json::json!({
                    "status": "error",
                    "error": error.to_string(),
                    "exit_code": error.exit_code(),
                })
            );
        } else {
            eprintln!("{error}");
        }
        std::process::exit(error.exit_code());
    }
}
