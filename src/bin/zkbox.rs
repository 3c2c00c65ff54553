use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};
use zeroize::Zeroizing;

use zkbox::error::Result;
use zkbox::file_ops;
use zkbox::password;

#[derive(Parser, Debug)]
#[command(
    name = "zkbox",
    version,
    about = "password-based file encryption",
    disable_version_flag = true
)]
struct Cli {
    /// Read the password from stdin instead of prompting on the terminal.
    /// Skips the confirmation prompt; the minimum length still applies.
    #[arg(long = "password-stdin", action = ArgAction::SetTrue, global = true)]
    password_stdin: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Encrypt a file
    Encrypt {
        /// Path to the file whose contents is to be encrypted
        #[arg(short = 'i', long = "input")]
        input: PathBuf,
        /// Path to the file to write the encrypted data to
        #[arg(short = 'o', long = "output")]
        output: PathBuf,
        /// Content type to record in the metadata envelope
        #[arg(long = "content-type")]
        content_type: Option<String>,
    },
    /// Decrypt a file
    Decrypt {
        /// Path to the file whose contents is to be decrypted
        #[arg(short = 'i', long = "input")]
        input: PathBuf,
        /// Path to the file to write the decrypted data to
        #[arg(short = 'o', long = "output")]
        output: PathBuf,
    },
}

fn encryption_password(stdin_password: bool, input: &Path) -> Result<Zeroizing<Vec<u8>>> {
    if stdin_password {
        let password = password::read_password_from(&mut std::io::stdin())?;
        password::validate_password_length(&password)?;
        Ok(password)
    } else {
        let mut prompt = password::TerminalPrompt::new();
        let password = password::collect_for_encryption(&mut prompt, &file_ops::file_label(input))?;
        Ok(Zeroizing::new(password.as_bytes().to_vec()))
    }
}

fn decryption_password(stdin_password: bool, input: &Path) -> Result<Option<Zeroizing<Vec<u8>>>> {
    if stdin_password {
        Ok(Some(password::read_password_from(&mut std::io::stdin())?))
    } else {
        let mut prompt = password::TerminalPrompt::new();
        let password = password::collect_for_decryption(&mut prompt, &file_ops::file_label(input))?;
        Ok(password.map(|p| Zeroizing::new(p.as_bytes().to_vec())))
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Encrypt {
            input,
            output,
            content_type,
        } => {
            let password = encryption_password(cli.password_stdin, &input)?;
            file_ops::encrypt_file(&input, &output, content_type.as_deref(), &password)?;
            Ok(ExitCode::SUCCESS)
        }
        Commands::Decrypt { input, output } => {
            let Some(password) = decryption_password(cli.password_stdin, &input)? else {
                eprintln!("no password entered; decryption cancelled");
                return Ok(ExitCode::FAILURE);
            };
            file_ops::decrypt_file(&input, &output, &password)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("zkbox: {}", e);
            let mut source = std::error::Error::source(&e);
            while let Some(inner) = source {
                eprintln!("  caused by: {}", inner);
                source = inner.source();
            }
            ExitCode::FAILURE
        }
    }
}
