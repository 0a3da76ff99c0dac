use clap::Subcommand;
use serde_json::json;

use crate::auth::password_hash;
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum PasswordCommands {
    #[command(about = "Print the stored form of a password, salted the way the console salts it")]
    Hash {
        #[arg(help = "Salt value, the username for user passwords")]
        salt: String,

        #[arg(help = "Raw password")]
        password: String,
    },
}

pub async fn handle(cmd: PasswordCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        PasswordCommands::Hash { salt, password } => {
            let hash = password_hash(&salt, &password);
            match output_format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&json!({ "hash": hash }))?),
                OutputFormat::Text => println!("{}", hash),
            }
            Ok(())
        }
    }
}
