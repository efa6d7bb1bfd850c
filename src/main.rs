//! rfichaje main entrypoint.

use rfichaje::run;
use rfichaje::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        tracing::error!(error = %e, "command failed");
        error(format!("Error: {}", e));
        std::process::exit(1);
    }
}
