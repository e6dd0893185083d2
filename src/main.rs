use annomig::cli::run;
use std::error::Error;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        // Check if this is an internal error (serialization, write failure, etc.)
        let error_str: String = e.to_string();
        if error_str.contains("serialize") || error_str.contains("Failed to write") {
            eprintln!("Internal error: {}", e);
            // Show error chain if available
            let mut source = e.source();
            if source.is_some() {
                eprintln!("\nCaused by:");
                let mut indent = 1;
                while let Some(err) = source {
                    eprintln!("{:indent$}  {}", "", err);
                    source = err.source();
                    indent += 1;
                }
            }
            std::process::exit(2);
        } else {
            // User error
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
