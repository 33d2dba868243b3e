use std::io::{self, BufRead, Write};

use log::info;

use claved::ipc;

fn main() -> anyhow::Result<()> {
    // Responses own stdout; diagnostics go to stderr.
    let _logger = flexi_logger::Logger::try_with_env_or_str("info")?
        .log_to_stderr()
        .start()?;
    info!(
        "event=daemon_start status=ok version={}",
        env!("CARGO_PKG_VERSION")
    );

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut state = ipc::AppState::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    for line in stdin.lock().lines() {
        let line = match line {
            Ok(v) => v,
            Err(_) => break,
        };
        if line.trim().is_empty() {
            continue;
        }

        let req: ipc::Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // Can't reply without an id; report and move on.
                let reply = serde_json::json!({
                    "ok": false,
                    "error": { "code": "bad_json", "message": e.to_string() }
                });
                let _ = writeln!(stdout, "{reply}");
                let _ = stdout.flush();
                continue;
            }
        };

        // One request at a time: mutating calls per collection are
        // serialized by construction.
        let resp = runtime.block_on(ipc::handle_request(&mut state, req));
        let _ = writeln!(
            stdout,
            "{}",
            serde_json::to_string(&resp).unwrap_or_else(|_| "{\"ok\":false}".to_string())
        );
        let _ = stdout.flush();
    }

    Ok(())
}
