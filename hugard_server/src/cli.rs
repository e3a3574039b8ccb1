use std::{env, env::VarError};

/// There's no real CLI for the server, so any argument at all prints the help text. Returns true if it did.
pub fn handle_command_line_args() -> bool {
    let has_cli_args = env::args().count() > 1;
    if has_cli_args {
        display_readme();
        display_envs();
    }
    has_cli_args
}

fn display_readme() {
    const README: &str = include_str!("./cli-help.txt");
    println!("\n{README}\n");
}

fn display_envs() {
    // Only the variables listed here are printed. Secrets are deliberately absent.
    const DISPLAY_ENVS: [&str; 12] = [
        "RUST_LOG",
        "HUGARD_HOST",
        "HUGARD_PORT",
        "HUGARD_DATABASE_URL",
        "HUGARD_COMMUNITY_ID",
        "HUGARD_OWNER_ID",
        "HUGARD_POLL_INTERVAL_SECS",
        "HUGARD_PROVIDER_TIMEOUT_SECS",
        "HUGARD_QR_CODE_DIR",
        "HUGARD_HMAC_CHECKS",
        "HUGARD_COINBASE_API_URL",
        "HUGARD_COINBASE_PAY_URL",
    ];

    println!("Current environment values (EXCLUDING variables that contain secrets):");
    DISPLAY_ENVS.iter().for_each(|&name| {
        let val = match env::var(name) {
            Ok(s) => s,
            Err(VarError::NotPresent) => "Not set".into(),
            Err(VarError::NotUnicode(s)) => format!("Invalid value: {}", s.to_string_lossy()),
        };
        println!("  {name:<35} {val:<15}");
    })
}
