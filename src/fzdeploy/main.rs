use std::process::ExitCode;

use clap::Parser;
use deploy::{DeployOptions, handle_deploy};
use fzdeploy::{
    PortResolver,
    error::{DeployError, DeployResult},
};
use tracing::error;

mod deploy;

/// Exit code when no port was given and none could be detected
const EXIT_PORT_NOT_FOUND: u8 = 1;
/// Exit code for connection, serial I/O and source file failures. Kept apart
/// from 2, which clap uses for usage errors.
const EXIT_DEPLOY_FAILED: u8 = 3;

fn main() -> ExitCode {
    // Parsed first, the log level depends on --verbose
    let opts = DeployOptions::parse();

    tracing_subscriber::fmt()
        .with_max_level(if opts.verbose {
            tracing::Level::TRACE
        } else {
            tracing::Level::INFO
        })
        .init();

    let result = handle_deploy(opts, &PortResolver::default());
    match &result {
        Err(DeployError::PortNotFound {
            patterns,
            candidates,
        }) => print!("{}", not_found_message(patterns, candidates)),
        Err(e) => error!("{}", e),
        Ok(()) => {}
    }

    ExitCode::from(exit_status(&result))
}

fn exit_status(result: &DeployResult<()>) -> u8 {
    match result {
        Ok(()) => 0,
        Err(DeployError::PortNotFound { .. }) => EXIT_PORT_NOT_FOUND,
        Err(_) => EXIT_DEPLOY_FAILED,
    }
}

fn not_found_message(patterns: &[String], candidates: &[String]) -> String {
    let mut message = String::from("No Flipper found. Pass port as argument.\nChecked patterns:\n");
    for pattern in patterns {
        message.push_str(&format!("  {}\n", pattern));
    }
    if !candidates.is_empty() {
        message.push_str("Serial ports present:\n");
        for candidate in candidates {
            message.push_str(&format!("  {}\n", candidate));
        }
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_not_found_exits_with_one() {
        let result = Err(DeployError::PortNotFound {
            patterns: vec!["/dev/ttyACM*".to_string()],
            candidates: Vec::new(),
        });
        assert_eq!(exit_status(&result), 1);
    }

    #[test]
    fn deploy_failures_exit_with_three() {
        for err in [
            DeployError::Connection("No such file or directory".to_string()),
            DeployError::Communication("Broken pipe".to_string()),
            DeployError::SourceError("Failed to open somfy_blinds.js".to_string()),
            DeployError::ConfigurationError("Invalid port pattern".to_string()),
        ] {
            assert_eq!(exit_status(&Err(err)), EXIT_DEPLOY_FAILED);
        }
        assert_ne!(EXIT_DEPLOY_FAILED, 2);
    }

    #[test]
    fn success_exits_with_zero() {
        assert_eq!(exit_status(&Ok(())), 0);
    }

    #[test]
    fn not_found_message_lists_checked_patterns() {
        let patterns = vec!["/dev/tty.usbmodem*".to_string(), "/dev/ttyACM*".to_string()];
        let message = not_found_message(&patterns, &[]);

        assert_eq!(
            message,
            "No Flipper found. Pass port as argument.\n\
             Checked patterns:\n  /dev/tty.usbmodem*\n  /dev/ttyACM*\n"
        );
    }

    #[test]
    fn not_found_message_lists_present_ports() {
        let message = not_found_message(&["/dev/ttyACM*".to_string()], &["/dev/ttyS0".to_string()]);
        assert!(message.ends_with("Serial ports present:\n  /dev/ttyS0\n"));
    }
}
