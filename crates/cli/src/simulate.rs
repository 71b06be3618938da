//! Interactive chat simulator: drive the auth flow from the terminal.

use std::io::{self, BufRead, Write};

use {
    vouch_config::{VerifyFlow, VouchConfig},
    vouch_gateway::build_router,
};

const BLUE: &str = "\x1b[94m";
const GREEN: &str = "\x1b[92m";
const YELLOW: &str = "\x1b[93m";
const DIM: &str = "\x1b[2m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

const LOGOUT_REPLY: &str = "👋 You have been logged out. Send any message to start again.";

pub async fn run(config: VouchConfig, phone: Option<String>) -> anyhow::Result<()> {
    let (sessions, router, _mock) = build_router(&config)?;

    println!("\n{BOLD}{}{RESET}", "=".repeat(52));
    println!("  🤖  {} - chat simulator", config.app_name);
    println!("{BOLD}{}{RESET}\n", "=".repeat(52));
    println!("{DIM}Tip: use +15551234567 (known) or +19999999999 (unknown){RESET}");
    println!("{DIM}     type 'quit' to exit, 'switch' to change phone number{RESET}");
    if config.directory.mock && config.verify.flow == VerifyFlow::Otp {
        // The OTP flow reaches the mock directory over HTTP.
        println!(
            "{DIM}     run `vouch gateway` alongside so the mock API at {} is up{RESET}",
            config.directory.base_url
        );
    }
    println!();

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    let mut phone = match phone {
        Some(phone) => phone,
        None => {
            let entered = prompt(
                &mut lines,
                &format!("{YELLOW}Enter phone number to simulate: {RESET}"),
            )?;
            if entered.is_empty() {
                "+19999999999".to_string()
            } else {
                entered
            }
        },
    };
    println!("{DIM}Simulating as {phone}{RESET}\n");

    loop {
        let Some(input) = read_line(&mut lines, &format!("{BLUE}{BOLD}You:{RESET} "))? else {
            break; // EOF
        };
        let input = input.trim().to_string();
        if input.is_empty() {
            continue;
        }

        match input.to_lowercase().as_str() {
            "quit" => break,
            "switch" => {
                phone = prompt(&mut lines, &format!("{YELLOW}New phone number: {RESET}"))?;
                println!("{DIM}Switched to {phone}{RESET}\n");
                continue;
            },
            "logout" => {
                sessions.clear(&phone);
                println!("{GREEN}{BOLD}Agent:{RESET} {LOGOUT_REPLY}\n");
                continue;
            },
            _ => {},
        }

        let reply = router.route(&phone, &input).await;
        println!("{GREEN}{BOLD}Agent:{RESET} {}\n", reply.text);
    }

    println!("{DIM}Goodbye!{RESET}");
    Ok(())
}

fn prompt(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    text: &str,
) -> anyhow::Result<String> {
    Ok(read_line(lines, text)?.unwrap_or_default().trim().to_string())
}

/// Print a prompt and read one line; `None` on EOF.
fn read_line(
    lines: &mut impl Iterator<Item = io::Result<String>>,
    text: &str,
) -> anyhow::Result<Option<String>> {
    print!("{text}");
    io::stdout().flush()?;
    match lines.next() {
        Some(line) => Ok(Some(line?)),
        None => Ok(None),
    }
}
