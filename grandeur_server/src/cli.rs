use std::{env, env::VarError};

/// The server is configured entirely through environment variables, so any command-line argument (including -h)
/// just prints the help text and the current non-secret configuration.
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
    // An explicit allow-list, so secret-carrying variables can never end up on a terminal
    const DISPLAY_ENVS: [&str; 8] = [
        "RUST_LOG",
        "GRANDEUR_HOST",
        "GRANDEUR_PORT",
        "GRANDEUR_DATABASE_URL",
        "GRANDEUR_FLW_BASE_URL",
        "GRANDEUR_PAYMENT_REDIRECT_URL",
        "GRANDEUR_USE_X_FORWARDED_FOR",
        "GRANDEUR_USE_FORWARDED",
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
